//! [`QuoteStore`] implementation over a Postgres pool.

use async_trait::async_trait;
use roofquote_core::query::{QuoteFilter, QuoteSort, Window};
use roofquote_core::quote::Quote;
use roofquote_core::store::{QuoteStore, StoreError};
use roofquote_core::types::QuoteId;
use roofquote_core::validation::rules::{self, FieldSpec};
use roofquote_core::validation::{schema, FieldError};

use crate::models::quote::QuoteRow;
use crate::repositories::QuoteRepo;
use crate::DbPool;

/// Postgres-backed quote store. Cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct PgQuoteStore {
    pool: DbPool,
}

impl PgQuoteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl QuoteStore for PgQuoteStore {
    async fn create(&self, quote: &Quote) -> Result<Quote, StoreError> {
        schema::check_record(quote, quote.created_at.date_naive()).map_err(StoreError::Rejected)?;

        let row = QuoteRepo::create(&self.pool, quote)
            .await
            .map_err(map_sqlx_error)?;
        to_quote(row)
    }

    async fn find_by_id(&self, id: QuoteId) -> Result<Option<Quote>, StoreError> {
        QuoteRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(to_quote)
            .transpose()
    }

    async fn find(
        &self,
        filter: &QuoteFilter,
        sort: QuoteSort,
        window: Option<Window>,
    ) -> Result<Vec<Quote>, StoreError> {
        QuoteRepo::find(&self.pool, filter, sort, window)
            .await
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(to_quote)
            .collect()
    }

    async fn count(&self, filter: &QuoteFilter) -> Result<i64, StoreError> {
        QuoteRepo::count(&self.pool, filter)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_page(
        &self,
        filter: &QuoteFilter,
        sort: QuoteSort,
        window: Window,
    ) -> Result<(Vec<Quote>, i64), StoreError> {
        let (rows, total) = QuoteRepo::find_page(&self.pool, filter, sort, window)
            .await
            .map_err(map_sqlx_error)?;
        let quotes = rows.into_iter().map(to_quote).collect::<Result<Vec<_>, _>>()?;
        Ok((quotes, total))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

fn to_quote(row: QuoteRow) -> Result<Quote, StoreError> {
    let id = row.id;
    Quote::try_from(row).map_err(|e| StoreError::Backend(format!("quote {id}: {e}")))
}

/// Translate a sqlx error into the store taxonomy.
///
/// CHECK violations (SQLSTATE 23514) carry the constraint name, which maps
/// back to the field it guards.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(err.to_string())
        }
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) => StoreError::Unavailable(err.to_string()),
        sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23514") => {
            let spec = db_err.constraint().and_then(constraint_field);
            match spec {
                Some(spec) => StoreError::Rejected(vec![FieldError::new(spec.field, spec.message)]),
                None => StoreError::Backend(err.to_string()),
            }
        }
        other => StoreError::Backend(other.to_string()),
    }
}

fn constraint_field(constraint: &str) -> Option<FieldSpec> {
    match constraint {
        "ck_quotes_contractor_name" => Some(rules::CONTRACTOR_NAME),
        "ck_quotes_company" => Some(rules::COMPANY),
        "ck_quotes_roof_size" => Some(rules::ROOF_SIZE),
        "ck_quotes_roof_type" => Some(rules::ROOF_TYPE),
        "ck_quotes_project_city" => Some(rules::PROJECT_CITY),
        "ck_quotes_project_state" => Some(rules::PROJECT_STATE),
        _ => None,
    }
}
