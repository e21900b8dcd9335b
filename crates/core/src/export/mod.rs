//! Document renderers for quotes.
//!
//! Both renderers are pure: they take records already selected by the
//! retrieval engine and never query a store themselves.

pub mod csv;
pub mod pdf;
