//! The quote entity and its roof type enum.
//!
//! A [`Quote`] is only ever constructed by the submission pipeline (or read
//! back from a store), so every instance in memory has already passed the
//! field validators once. The date window is never re-checked on read.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{QuoteId, Timestamp};
use crate::validation::schema;

// ---------------------------------------------------------------------------
// Roof type
// ---------------------------------------------------------------------------

/// Roofing system being quoted. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofType {
    Metal,
    #[serde(rename = "TPO")]
    Tpo,
    Foam,
    Other,
}

impl RoofType {
    pub const ALL: [RoofType; 4] = [Self::Metal, Self::Tpo, Self::Foam, Self::Other];

    /// Canonical string form, as stored and as accepted on input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metal => "Metal",
            Self::Tpo => "TPO",
            Self::Foam => "Foam",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for RoofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four roof types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown roof type: {0}")]
pub struct UnknownRoofType(pub String);

impl FromStr for RoofType {
    type Err = UnknownRoofType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownRoofType(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

/// A contractor-submitted roofing project estimate.
///
/// The `Validate` derive is the schema layer of the rule table: stores run
/// [`schema::check_record`] on every record right before persisting it,
/// independently of what the submission pipeline already checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    #[validate(custom(function = schema::person_name))]
    pub contractor_name: String,
    #[validate(custom(function = schema::company_name))]
    pub company: String,
    #[validate(range(exclusive_min = 0.0, max = 1_000_000.0, message = "Roof size must be greater than 0 and at most 1,000,000"))]
    pub roof_size: f64,
    pub roof_type: RoofType,
    #[validate(custom(function = schema::city_name))]
    pub project_city: String,
    #[validate(custom(function = schema::canonical_state))]
    pub project_state: String,
    pub project_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Quote {
    /// `"{city}, {state}"`, computed on demand and never stored.
    pub fn location(&self) -> String {
        format!("{}, {}", self.project_city, self.project_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roof_type_parse_is_exact() {
        assert_eq!("Metal".parse::<RoofType>(), Ok(RoofType::Metal));
        assert_eq!("TPO".parse::<RoofType>(), Ok(RoofType::Tpo));
        assert!("metal".parse::<RoofType>().is_err());
        assert!("Tpo".parse::<RoofType>().is_err());
        assert!(" Foam".parse::<RoofType>().is_err());
    }

    #[test]
    fn roof_type_serializes_to_canonical_form() {
        assert_eq!(serde_json::to_value(RoofType::Tpo).unwrap(), "TPO");
        assert_eq!(serde_json::to_value(RoofType::Other).unwrap(), "Other");
    }

    #[test]
    fn location_joins_city_and_state() {
        let now = chrono::Utc::now();
        let quote = Quote {
            id: QuoteId::now_v7(),
            contractor_name: "John Smith".into(),
            company: "Smith Roofing LLC".into(),
            roof_size: 2500.0,
            roof_type: RoofType::Metal,
            project_city: "Austin".into(),
            project_state: "TX".into(),
            project_date: now.date_naive(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(quote.location(), "Austin, TX");
    }
}
