//! Shared response envelope types for API handlers.
//!
//! Successful responses carry `"status": "success"` alongside the payload.
//! Use these instead of ad-hoc `serde_json::json!` to get compile-time type
//! safety and consistent serialization.

use roofquote_core::query::{Pagination, QuotePage};
use roofquote_core::quote::Quote;
use serde::Serialize;

/// Standard `{ "status": "success", "data": T }` envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse::new(QuoteData { quote })))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Listing envelope: `results` is the number of items on this page.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub status: &'static str,
    pub results: usize,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct QuoteData {
    pub quote: Quote,
}

#[derive(Debug, Serialize)]
pub struct QuoteListData {
    pub quotes: Vec<Quote>,
    pub pagination: Pagination,
}

impl From<QuotePage> for ListResponse<QuoteListData> {
    fn from(page: QuotePage) -> Self {
        Self {
            status: "success",
            results: page.quotes.len(),
            data: QuoteListData {
                quotes: page.quotes,
                pagination: page.pagination,
            },
        }
    }
}
