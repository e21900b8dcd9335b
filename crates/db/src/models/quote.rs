//! Row model for the `quotes` table.

use roofquote_core::quote::{Quote, RoofType, UnknownRoofType};
use roofquote_core::types::{QuoteId, Timestamp};
use sqlx::FromRow;

/// A row from the `quotes` table.
#[derive(Debug, Clone, FromRow)]
pub struct QuoteRow {
    pub id: QuoteId,
    pub contractor_name: String,
    pub company: String,
    pub roof_size: f64,
    pub roof_type: String,
    pub project_city: String,
    pub project_state: String,
    pub project_date: chrono::NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<QuoteRow> for Quote {
    type Error = UnknownRoofType;

    fn try_from(row: QuoteRow) -> Result<Self, Self::Error> {
        Ok(Quote {
            id: row.id,
            roof_type: row.roof_type.parse::<RoofType>()?,
            contractor_name: row.contractor_name,
            company: row.company,
            roof_size: row.roof_size,
            project_city: row.project_city,
            project_state: row.project_state,
            project_date: row.project_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
