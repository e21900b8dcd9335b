//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod quote_repo;

pub use quote_repo::QuoteRepo;
