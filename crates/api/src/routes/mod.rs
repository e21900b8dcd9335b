pub mod health;
pub mod quotes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /quotes                    list, submit
/// /quotes/export/csv         CSV export (?state, ?roofType)
/// /quotes/{id}               get
/// /quotes/{id}/pdf           PDF export
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/quotes", quotes::router())
}
