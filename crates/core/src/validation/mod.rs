//! Quote validation.
//!
//! One rule table ([`rules`]) applied independently by each layer: the
//! submission pipeline evaluates the predicates on raw input, [`schema`]
//! re-applies them to a constructed record before it reaches a store, and
//! the database enforces the static subset with `CHECK` constraints.

pub mod rules;
pub mod schema;

use serde::{Deserialize, Serialize};

/// A single field-level rejection, keyed by the JSON field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
