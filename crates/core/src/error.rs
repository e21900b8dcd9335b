use crate::store::StoreError;
use crate::types::QuoteId;
use crate::validation::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: QuoteId },

    /// One entry per failing field, never just the first.
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Malformed identifier: {0}")]
    MalformedId(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
