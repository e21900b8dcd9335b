//! The quote rule table: field metadata, messages, and pure predicates.
//!
//! Every predicate is total and side-effect free. Identical input yields an
//! identical decision regardless of which layer evaluates it.

use std::sync::LazyLock;

use chrono::{DateTime, Months, NaiveDate, Utc};
use regex::Regex;

use crate::quote::RoofType;

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;

/// Inclusive upper bound on roof size (square feet). The lower bound (0) is exclusive.
pub const ROOF_SIZE_MAX: f64 = 1_000_000.0;

/// How far ahead a project may be scheduled, in calendar months.
pub const PROJECT_WINDOW_MONTHS: u32 = 24;

/// The 50 US state codes, in canonical (uppercase) form.
pub const US_STATE_CODES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

/// Letters, whitespace, hyphen, apostrophe.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s\-']+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Field metadata
// ---------------------------------------------------------------------------

/// Per-field entry of the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key (camelCase) used in submissions and error lists.
    pub field: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Message reported when the value is present but fails its rule.
    pub message: &'static str,
}

impl FieldSpec {
    pub fn required_message(&self) -> String {
        format!("{} is required", self.label)
    }
}

pub const CONTRACTOR_NAME: FieldSpec = FieldSpec {
    field: "contractorName",
    label: "Contractor name",
    message: "Contractor name must be 2-100 characters and contain only letters, spaces, hyphens, and apostrophes",
};

pub const COMPANY: FieldSpec = FieldSpec {
    field: "company",
    label: "Company",
    message: "Company name must be 2-100 characters",
};

pub const ROOF_SIZE: FieldSpec = FieldSpec {
    field: "roofSize",
    label: "Roof size",
    message: "Roof size must be greater than 0 and at most 1,000,000",
};

pub const ROOF_TYPE: FieldSpec = FieldSpec {
    field: "roofType",
    label: "Roof type",
    message: "Roof type must be one of: Metal, TPO, Foam, Other",
};

pub const PROJECT_CITY: FieldSpec = FieldSpec {
    field: "projectCity",
    label: "City",
    message: "City must contain only letters, spaces, hyphens, and apostrophes",
};

pub const PROJECT_STATE: FieldSpec = FieldSpec {
    field: "projectState",
    label: "State",
    message: "State must be a valid two-letter US state code",
};

pub const PROJECT_DATE: FieldSpec = FieldSpec {
    field: "projectDate",
    label: "Project date",
    message: "Project date must be a valid date between today and two years from today",
};

/// All validated fields, in form order.
pub const FIELDS: [FieldSpec; 7] = [
    CONTRACTOR_NAME,
    COMPANY,
    ROOF_SIZE,
    ROOF_TYPE,
    PROJECT_CITY,
    PROJECT_STATE,
    PROJECT_DATE,
];

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn char_len_in_bounds(s: &str) -> bool {
    (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&s.chars().count())
}

/// Contractor name: 2-100 chars after trimming, letters/space/hyphen/apostrophe only.
pub fn valid_name(s: &str) -> bool {
    let trimmed = s.trim();
    char_len_in_bounds(trimmed) && NAME_RE.is_match(trimmed)
}

/// Company: 2-100 chars after trimming, any characters.
pub fn valid_company(s: &str) -> bool {
    char_len_in_bounds(s.trim())
}

/// City: non-empty after trimming, letters/space/hyphen/apostrophe only.
pub fn valid_city(s: &str) -> bool {
    NAME_RE.is_match(s.trim())
}

/// Roof size: finite, strictly positive, at most [`ROOF_SIZE_MAX`].
pub fn valid_roof_size(n: f64) -> bool {
    n.is_finite() && n > 0.0 && n <= ROOF_SIZE_MAX
}

/// Roof type: exact, case-sensitive enum membership.
pub fn valid_roof_type(s: &str) -> bool {
    s.parse::<RoofType>().is_ok()
}

/// State code: case-insensitive membership in [`US_STATE_CODES`].
pub fn valid_state_code(s: &str) -> bool {
    s.len() == 2 && US_STATE_CODES.contains(&s.to_ascii_uppercase().as_str())
}

/// Canonical stored form of a state code. Only meaningful after
/// [`valid_state_code`] accepted the input.
pub fn canonical_state_code(s: &str) -> String {
    s.trim().to_ascii_uppercase()
}

/// Parse `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its UTC date.
pub fn parse_project_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

/// Inclusive `(earliest, latest)` project dates relative to `today`.
pub fn project_date_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let latest = today
        .checked_add_months(Months::new(PROJECT_WINDOW_MONTHS))
        .unwrap_or(NaiveDate::MAX);
    (today, latest)
}

pub fn within_project_window(date: NaiveDate, today: NaiveDate) -> bool {
    let (earliest, latest) = project_date_window(today);
    earliest <= date && date <= latest
}

/// Project date: parses as a calendar date and falls inside the window.
pub fn valid_project_date(s: &str, today: NaiveDate) -> bool {
    parse_project_date(s).is_some_and(|d| within_project_window(d, today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn state_table_has_fifty_unique_codes() {
        let mut codes = US_STATE_CODES.to_vec();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 50);
        assert!(!US_STATE_CODES.contains(&"DC"));
    }

    #[test]
    fn name_rules() {
        assert!(valid_name("John Smith"));
        assert!(valid_name("Mary-Jane O'Neil"));
        assert!(valid_name("  Al  "));
        assert!(!valid_name("J"));
        assert!(!valid_name("   "));
        assert!(!valid_name("John3"));
        assert!(!valid_name("Smith & Sons"));
        assert!(valid_name(&"a".repeat(100)));
        assert!(!valid_name(&"a".repeat(101)));
    }

    #[test]
    fn company_allows_any_characters() {
        assert!(valid_company("O'Brien, \"Pro\" Roofing"));
        assert!(valid_company("3M"));
        assert!(!valid_company("X"));
        assert!(!valid_company(&"c".repeat(101)));
    }

    #[test]
    fn city_rules() {
        assert!(valid_city("Austin"));
        assert!(valid_city("Coeur d'Alene"));
        assert!(valid_city("Winston-Salem"));
        assert!(!valid_city(""));
        assert!(!valid_city("St. Louis"));
    }

    #[test]
    fn roof_size_bounds() {
        assert!(!valid_roof_size(0.0));
        assert!(!valid_roof_size(-1.0));
        assert!(valid_roof_size(0.5));
        assert!(valid_roof_size(1_000_000.0));
        assert!(!valid_roof_size(1_000_000.01));
        assert!(!valid_roof_size(f64::NAN));
        assert!(!valid_roof_size(f64::INFINITY));
    }

    #[test]
    fn roof_type_is_case_sensitive() {
        for t in ["Metal", "TPO", "Foam", "Other"] {
            assert!(valid_roof_type(t), "{t} should be accepted");
        }
        assert!(!valid_roof_type("tpo"));
        assert!(!valid_roof_type("Shingle"));
    }

    #[test]
    fn state_code_is_case_insensitive() {
        assert!(valid_state_code("TX"));
        assert!(valid_state_code("tx"));
        assert!(valid_state_code("Ca"));
        assert!(!valid_state_code("ZZ"));
        assert!(!valid_state_code("TEX"));
        assert!(!valid_state_code(""));
        assert_eq!(canonical_state_code(" ca "), "CA");
    }

    #[test]
    fn project_date_parsing() {
        assert_eq!(parse_project_date("2026-11-15"), Some(day("2026-11-15")));
        assert_eq!(
            parse_project_date("2026-11-15T23:30:00-05:00"),
            Some(day("2026-11-16"))
        );
        assert_eq!(parse_project_date("11/15/2026"), None);
        assert_eq!(parse_project_date("2026-02-30"), None);
    }

    #[test]
    fn project_date_window_is_inclusive() {
        let today = day("2026-10-16");
        assert!(within_project_window(today, today));
        assert!(within_project_window(day("2028-10-16"), today));
        assert!(!within_project_window(day("2028-10-17"), today));
        assert!(!within_project_window(day("2026-10-15"), today));
    }

    #[test]
    fn project_date_window_clamps_leap_day() {
        let (_, latest) = project_date_window(day("2028-02-29"));
        assert_eq!(latest, day("2030-02-28"));
    }

    #[test]
    fn valid_project_date_combines_parse_and_window() {
        let today = day("2026-10-16");
        assert!(valid_project_date("2026-12-01", today));
        assert!(!valid_project_date("not a date", today));
        assert!(!valid_project_date("2030-01-01", today));
    }

    #[test]
    fn every_field_has_a_required_message() {
        for spec in FIELDS {
            assert!(spec.required_message().ends_with("is required"));
        }
    }
}
