//! Submission pipeline: raw JSON in, persisted [`Quote`] or a complete list
//! of field errors out.
//!
//! Validation is not fail-fast. Every field is checked and each failing
//! field contributes exactly one [`FieldError`], so a client can fix all of
//! them in a single round trip.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::quote::{Quote, RoofType};
use crate::sanitize::sanitize_text;
use crate::store::QuoteStore;
use crate::types::{QuoteId, Timestamp};
use crate::validation::rules::{self, FieldSpec};
use crate::validation::FieldError;

/// A submission that passed every field validator, not yet assigned an
/// identity.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteDraft {
    pub contractor_name: String,
    pub company: String,
    pub roof_size: f64,
    pub roof_type: RoofType,
    pub project_city: String,
    pub project_state: String,
    pub project_date: NaiveDate,
}

impl QuoteDraft {
    /// Assign identity and timestamps, producing the immutable record.
    pub fn into_quote(self, id: QuoteId, now: Timestamp) -> Quote {
        Quote {
            id,
            contractor_name: self.contractor_name,
            company: self.company,
            roof_size: self.roof_size,
            roof_type: self.roof_type,
            project_city: self.project_city,
            project_state: self.project_state,
            project_date: self.project_date,
            created_at: now,
            updated_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Field extraction
// ---------------------------------------------------------------------------

enum Extracted<T> {
    Missing,
    Invalid,
    Valid(T),
}

/// Record the outcome for one field, pushing an error if it did not pass.
fn settle<T>(errors: &mut Vec<FieldError>, spec: &FieldSpec, outcome: Extracted<T>) -> Option<T> {
    match outcome {
        Extracted::Valid(v) => Some(v),
        Extracted::Missing => {
            errors.push(FieldError::new(spec.field, spec.required_message()));
            None
        }
        Extracted::Invalid => {
            errors.push(FieldError::new(spec.field, spec.message));
            None
        }
    }
}

/// Sanitize a free-text field and run its predicate.
fn free_text(body: &Map<String, Value>, spec: &FieldSpec, valid: fn(&str) -> bool) -> Extracted<String> {
    match body.get(spec.field) {
        None | Some(Value::Null) => Extracted::Missing,
        Some(Value::String(raw)) => {
            let clean = sanitize_text(raw);
            if clean.is_empty() {
                Extracted::Missing
            } else if valid(&clean) {
                Extracted::Valid(clean)
            } else {
                Extracted::Invalid
            }
        }
        Some(_) => Extracted::Invalid,
    }
}

/// Form posts send numbers as strings; accept both.
fn roof_size(body: &Map<String, Value>) -> Extracted<f64> {
    let parsed = match body.get(rules::ROOF_SIZE.field) {
        None | Some(Value::Null) => return Extracted::Missing,
        Some(Value::String(s)) if s.trim().is_empty() => return Extracted::Missing,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(n) if rules::valid_roof_size(n) => Extracted::Valid(n),
        _ => Extracted::Invalid,
    }
}

fn roof_type(body: &Map<String, Value>) -> Extracted<RoofType> {
    match body.get(rules::ROOF_TYPE.field) {
        None | Some(Value::Null) => Extracted::Missing,
        Some(Value::String(s)) if s.is_empty() => Extracted::Missing,
        Some(Value::String(s)) => s
            .parse::<RoofType>()
            .map_or(Extracted::Invalid, Extracted::Valid),
        Some(_) => Extracted::Invalid,
    }
}

fn project_state(body: &Map<String, Value>) -> Extracted<String> {
    match body.get(rules::PROJECT_STATE.field) {
        None | Some(Value::Null) => Extracted::Missing,
        Some(Value::String(s)) if s.trim().is_empty() => Extracted::Missing,
        Some(Value::String(s)) if rules::valid_state_code(s.trim()) => {
            Extracted::Valid(rules::canonical_state_code(s))
        }
        Some(_) => Extracted::Invalid,
    }
}

fn project_date(body: &Map<String, Value>, today: NaiveDate) -> Extracted<NaiveDate> {
    match body.get(rules::PROJECT_DATE.field) {
        None | Some(Value::Null) => Extracted::Missing,
        Some(Value::String(s)) if s.trim().is_empty() => Extracted::Missing,
        Some(Value::String(s)) => match rules::parse_project_date(s) {
            Some(d) if rules::within_project_window(d, today) => Extracted::Valid(d),
            _ => Extracted::Invalid,
        },
        Some(_) => Extracted::Invalid,
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Validate a raw submission against every field rule.
///
/// `today` anchors the project date window; the check happens here, once,
/// and is never repeated for stored records.
pub fn validate_submission(raw: &Value, today: NaiveDate) -> Result<QuoteDraft, Vec<FieldError>> {
    let Some(body) = raw.as_object() else {
        return Err(vec![FieldError::new(
            "body",
            "Request body must be a JSON object",
        )]);
    };

    let mut errors = Vec::new();

    let contractor_name = settle(
        &mut errors,
        &rules::CONTRACTOR_NAME,
        free_text(body, &rules::CONTRACTOR_NAME, rules::valid_name),
    );
    let company = settle(
        &mut errors,
        &rules::COMPANY,
        free_text(body, &rules::COMPANY, rules::valid_company),
    );
    let roof_size = settle(&mut errors, &rules::ROOF_SIZE, roof_size(body));
    let roof_type = settle(&mut errors, &rules::ROOF_TYPE, roof_type(body));
    let project_city = settle(
        &mut errors,
        &rules::PROJECT_CITY,
        free_text(body, &rules::PROJECT_CITY, rules::valid_city),
    );
    let project_state = settle(&mut errors, &rules::PROJECT_STATE, project_state(body));
    let project_date = settle(&mut errors, &rules::PROJECT_DATE, project_date(body, today));

    match (
        contractor_name,
        company,
        roof_size,
        roof_type,
        project_city,
        project_state,
        project_date,
    ) {
        (
            Some(contractor_name),
            Some(company),
            Some(roof_size),
            Some(roof_type),
            Some(project_city),
            Some(project_state),
            Some(project_date),
        ) if errors.is_empty() => Ok(QuoteDraft {
            contractor_name,
            company,
            roof_size,
            roof_type,
            project_city,
            project_state,
            project_date,
        }),
        _ => Err(errors),
    }
}

/// Validate, construct and persist a quote with a single store call.
///
/// Store failures are returned as-is; the pipeline never retries.
pub async fn submit_quote(
    store: &dyn QuoteStore,
    raw: &Value,
    now: Timestamp,
) -> Result<Quote, CoreError> {
    let draft = validate_submission(raw, now.date_naive()).map_err(CoreError::Validation)?;
    let quote = draft.into_quote(QuoteId::now_v7(), now);

    let stored = store.create(&quote).await?;

    tracing::info!(
        quote_id = %stored.id,
        project_state = %stored.project_state,
        roof_type = %stored.roof_type,
        "Quote submitted",
    );

    Ok(stored)
}
