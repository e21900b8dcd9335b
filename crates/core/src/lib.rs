//! Domain logic for roofing quote intake.
//!
//! This crate has no database dependency. Persistence is reached only
//! through the [`store::QuoteStore`] trait, whose handle callers pass in
//! explicitly.

pub mod error;
pub mod export;
pub mod query;
pub mod quote;
pub mod sanitize;
pub mod store;
pub mod submission;
pub mod types;
pub mod validation;
