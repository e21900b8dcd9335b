//! The persistence seam.
//!
//! [`QuoteStore`] is the only shared mutable resource in the system. Each
//! operation is a single atomic create or a consistent read; nothing spans
//! more than one call. Handles are built once at startup and passed down
//! explicitly.

mod memory;

pub use memory::MemoryQuoteStore;

use async_trait::async_trait;

use crate::query::{QuoteFilter, QuoteSort, Window};
use crate::quote::Quote;
use crate::types::QuoteId;
use crate::validation::FieldError;

/// Failures surfaced by a store. Never retried by callers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store's own constraints rejected the record.
    #[error("Record rejected by store constraints")]
    Rejected(Vec<FieldError>),

    /// The backend could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("Store operation failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Persist a new quote. Attempted at most once per submission.
    async fn create(&self, quote: &Quote) -> Result<Quote, StoreError>;

    async fn find_by_id(&self, id: QuoteId) -> Result<Option<Quote>, StoreError>;

    /// Quotes matching `filter`, ordered by `sort`, optionally sliced by `window`.
    async fn find(
        &self,
        filter: &QuoteFilter,
        sort: QuoteSort,
        window: Option<Window>,
    ) -> Result<Vec<Quote>, StoreError>;

    /// Total number of quotes matching `filter`, ignoring any window.
    async fn count(&self, filter: &QuoteFilter) -> Result<i64, StoreError>;

    /// One window of matches together with the total match count, both taken
    /// from the same view of the data.
    ///
    /// The default runs [`find`](Self::find) then [`count`](Self::count) and
    /// is only consistent for stores that never change concurrently.
    /// Backends with concurrent writers override it.
    async fn find_page(
        &self,
        filter: &QuoteFilter,
        sort: QuoteSort,
        window: Window,
    ) -> Result<(Vec<Quote>, i64), StoreError> {
        let quotes = self.find(filter, sort, Some(window)).await?;
        let total = self.count(filter).await?;
        Ok((quotes, total))
    }

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Release backend resources. Called once during shutdown.
    async fn close(&self) {}
}
