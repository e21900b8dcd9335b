//! Route definitions for the `/quotes` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::quotes;
use crate::state::AppState;

/// Routes mounted at `/quotes`.
///
/// ```text
/// GET    /              -> list_quotes  (?state, ?roofType, ?page, ?limit, ?sortBy, ?sortOrder)
/// POST   /              -> create_quote
/// GET    /export/csv    -> export_quotes_csv  (?state, ?roofType)
/// GET    /{id}          -> get_quote
/// GET    /{id}/pdf      -> export_quote_pdf
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quotes::list_quotes).post(quotes::create_quote))
        .route("/export/csv", get(quotes::export_quotes_csv))
        .route("/{id}", get(quotes::get_quote))
        .route("/{id}/pdf", get(quotes::export_quote_pdf))
}
