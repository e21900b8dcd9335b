use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

use crate::state::AppState;

/// Internal failure description attached to error responses as an extension.
///
/// Never serialized unless [`attach_error_detail`] runs in development mode.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Copy any [`ErrorDetail`] extension into the JSON body as `"detail"`.
///
/// A no-op outside development mode, or when the body is not a JSON object.
pub async fn attach_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !state.config.environment.is_development() {
        return response;
    }
    let Some(ErrorDetail(detail)) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let (mut parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to buffer error body");
            return Response::from_parts(parts, Body::empty());
        }
    };

    let mut json: Value = match serde_json::from_slice(&bytes) {
        Ok(json) => json,
        Err(_) => return Response::from_parts(parts, Body::from(bytes)),
    };
    let Some(object) = json.as_object_mut() else {
        return Response::from_parts(parts, Body::from(bytes));
    };
    object.insert("detail".into(), Value::String(detail));

    match serde_json::to_vec(&json) {
        Ok(body) => {
            parts.headers.remove(CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(body))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}
