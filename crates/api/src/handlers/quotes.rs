//! Handlers for the `/quotes` resource.
//!
//! Submission, filtered listing, single lookup and the two document
//! exports. All store access goes through the handle in [`AppState`].

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use roofquote_core::export::{csv, pdf};
use roofquote_core::query::{self, ExportParams, ListParams, ListQuery, QuoteFilter};
use roofquote_core::submission;
use serde_json::Value;

use crate::error::AppResult;
use crate::response::{DataResponse, ListResponse, QuoteData, QuoteListData};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// POST /api/quotes
///
/// Validate and persist a quote. Every failing field is reported at once.
pub async fn create_quote(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<QuoteData>>)> {
    let Json(body) = payload?;
    let quote = submission::submit_quote(state.store(), &body, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(QuoteData { quote }))))
}

// ---------------------------------------------------------------------------
// Retrieval
// ---------------------------------------------------------------------------

/// GET /api/quotes
///
/// List quotes. Supports `state`, `roofType`, `page`, `limit`, `sortBy` and
/// `sortOrder` query parameters.
pub async fn list_quotes(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<ListResponse<QuoteListData>>> {
    let Query(params) = params?;
    let list_query = ListQuery::from_params(&params)?;
    let page = query::list_quotes(state.store(), &list_query).await?;

    tracing::debug!(
        results = page.quotes.len(),
        total = page.pagination.total_quotes,
        "Listed quotes",
    );

    Ok(Json(page.into()))
}

/// GET /api/quotes/{id}
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<QuoteData>>> {
    let quote = query::find_quote(state.store(), &id).await?;
    Ok(Json(DataResponse::new(QuoteData { quote })))
}

// ---------------------------------------------------------------------------
// Exports
// ---------------------------------------------------------------------------

/// GET /api/quotes/{id}/pdf
///
/// Render one quote as a downloadable PDF.
pub async fn export_quote_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let quote = query::find_quote(state.store(), &id).await?;
    let document = pdf::render_quote_pdf(&quote);

    tracing::info!(quote_id = %quote.id, bytes = document.len(), "Rendered quote PDF");

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"quote-{}.pdf\"", quote.id),
            ),
        ],
        document,
    ))
}

/// GET /api/quotes/export/csv
///
/// Export every quote matching the optional `state` / `roofType` filters.
pub async fn export_quotes_csv(
    State(state): State<AppState>,
    params: Result<Query<ExportParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let filter = QuoteFilter::from_params(params.state.as_deref(), params.roof_type.as_deref())?;
    let quotes = query::export_quotes(state.store(), &filter).await?;

    tracing::info!(rows = quotes.len(), "Exported quotes CSV");

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"quotes.csv\""),
        ],
        csv::build_quotes_csv(&quotes),
    ))
}
