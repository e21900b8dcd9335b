//! Record-level schema check applied by stores before persisting.
//!
//! The custom functions below are wired into `Quote`'s `Validate` derive.
//! They re-evaluate the [`rules`] predicates on the constructed record, so a
//! caller that bypasses the submission pipeline is still rejected.

use std::borrow::Cow;

use chrono::NaiveDate;
use validator::{Validate, ValidationError, ValidationErrors};

use super::rules::{self, FieldSpec};
use super::FieldError;
use crate::quote::Quote;

fn rule_error(code: &'static str, spec: &FieldSpec) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(spec.message))
}

pub fn person_name(value: &str) -> Result<(), ValidationError> {
    if rules::valid_name(value) && value.trim() == value {
        Ok(())
    } else {
        Err(rule_error("person_name", &rules::CONTRACTOR_NAME))
    }
}

pub fn company_name(value: &str) -> Result<(), ValidationError> {
    if rules::valid_company(value) && value.trim() == value {
        Ok(())
    } else {
        Err(rule_error("company_name", &rules::COMPANY))
    }
}

pub fn city_name(value: &str) -> Result<(), ValidationError> {
    if rules::valid_city(value) && value.trim() == value {
        Ok(())
    } else {
        Err(rule_error("city_name", &rules::PROJECT_CITY))
    }
}

/// Stored state codes must already be in canonical uppercase form.
pub fn canonical_state(value: &str) -> Result<(), ValidationError> {
    if rules::valid_state_code(value) && rules::canonical_state_code(value) == value {
        Ok(())
    } else {
        Err(rule_error("canonical_state", &rules::PROJECT_STATE))
    }
}

/// Map a struct field name reported by `validator` to its JSON key.
fn json_field(name: &str) -> &str {
    match name {
        "contractor_name" => rules::CONTRACTOR_NAME.field,
        "roof_size" => rules::ROOF_SIZE.field,
        "roof_type" => rules::ROOF_TYPE.field,
        "project_city" => rules::PROJECT_CITY.field,
        "project_state" => rules::PROJECT_STATE.field,
        "project_date" => rules::PROJECT_DATE.field,
        other => other,
    }
}

fn to_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(json_field(field), message)
            })
        })
        .collect();
    sort_in_form_order(&mut out);
    out
}

/// Position of a JSON key in the form layout; unknown keys sort last.
fn form_position(field: &str) -> usize {
    rules::FIELDS
        .iter()
        .position(|spec| spec.field == field)
        .unwrap_or(rules::FIELDS.len())
}

/// Order errors the way the submission pipeline reports them.
fn sort_in_form_order(errors: &mut [FieldError]) {
    errors.sort_by_key(|e| form_position(&e.field));
}

/// Run the schema rules plus the date window (evaluated against `today`).
///
/// Only called on the create path; stored records are never re-validated.
/// Stores pass the record's own `created_at` date so the window matches the
/// one the submission pipeline used.
pub fn check_record(quote: &Quote, today: NaiveDate) -> Result<(), Vec<FieldError>> {
    let mut errors = match quote.validate() {
        Ok(()) => Vec::new(),
        Err(e) => to_field_errors(&e),
    };

    if !rules::within_project_window(quote.project_date, today) {
        errors.push(FieldError::new(
            rules::PROJECT_DATE.field,
            rules::PROJECT_DATE.message,
        ));
    }

    sort_in_form_order(&mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
