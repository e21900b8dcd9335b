//! Repository for the `quotes` table.

use roofquote_core::query::{QuoteFilter, QuoteSort, SortField, Window};
use roofquote_core::quote::Quote;
use roofquote_core::types::QuoteId;
use sqlx::PgPool;

use crate::models::quote::QuoteRow;

/// Column list for `quotes` queries.
const COLUMNS: &str = "\
    id, contractor_name, company, roof_size, roof_type, \
    project_city, project_state, project_date, created_at, updated_at";

/// Provides data access for quotes.
pub struct QuoteRepo;

impl QuoteRepo {
    /// Insert a fully constructed quote. Identity and timestamps come from
    /// the caller, not from column defaults.
    pub async fn create(pool: &PgPool, quote: &Quote) -> Result<QuoteRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO quotes ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuoteRow>(&query)
            .bind(quote.id)
            .bind(&quote.contractor_name)
            .bind(&quote.company)
            .bind(quote.roof_size)
            .bind(quote.roof_type.as_str())
            .bind(&quote.project_city)
            .bind(&quote.project_state)
            .bind(quote.project_date)
            .bind(quote.created_at)
            .bind(quote.updated_at)
            .fetch_one(pool)
            .await
    }

    /// Find a quote by its ID.
    pub async fn find_by_id(pool: &PgPool, id: QuoteId) -> Result<Option<QuoteRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quotes WHERE id = $1");
        sqlx::query_as::<_, QuoteRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Query quotes with filtering, ordering and an optional offset/limit window.
    pub async fn find(
        pool: &PgPool,
        filter: &QuoteFilter,
        sort: QuoteSort,
        window: Option<Window>,
    ) -> Result<Vec<QuoteRow>, sqlx::Error> {
        let (query, bind_values) = select_sql(filter, sort, window);

        let mut q = sqlx::query_as::<_, QuoteRow>(&query);
        for value in &bind_values {
            q = q.bind(value);
        }
        if let Some(w) = window {
            q = q.bind(w.limit).bind(w.offset);
        }
        q.fetch_all(pool).await
    }

    /// Count quotes matching the given filter (for pagination metadata).
    pub async fn count(pool: &PgPool, filter: &QuoteFilter) -> Result<i64, sqlx::Error> {
        let (query, bind_values) = count_sql(filter);

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for value in &bind_values {
            q = q.bind(value);
        }
        q.fetch_one(pool).await
    }

    /// One window of rows plus the total match count, read from a single
    /// snapshot so the two always agree.
    pub async fn find_page(
        pool: &PgPool,
        filter: &QuoteFilter,
        sort: QuoteSort,
        window: Window,
    ) -> Result<(Vec<QuoteRow>, i64), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let (query, bind_values) = select_sql(filter, sort, Some(window));
        let mut q = sqlx::query_as::<_, QuoteRow>(&query);
        for value in &bind_values {
            q = q.bind(value);
        }
        let rows = q
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&mut *tx)
            .await?;

        let (query, bind_values) = count_sql(filter);
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        for value in &bind_values {
            q = q.bind(value);
        }
        let total = q.fetch_one(&mut *tx).await?;

        tx.commit().await?;
        Ok((rows, total))
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// `SELECT` statement plus filter binds. When `window` is set the statement
/// ends in `LIMIT`/`OFFSET` placeholders the caller binds after the filters.
fn select_sql(filter: &QuoteFilter, sort: QuoteSort, window: Option<Window>) -> (String, Vec<String>) {
    let (where_clause, bind_values, bind_idx) = build_quote_filter(filter);

    let mut query = format!(
        "SELECT {COLUMNS} FROM quotes {where_clause} ORDER BY {}",
        order_by(sort)
    );
    if window.is_some() {
        query.push_str(&format!(" LIMIT ${bind_idx} OFFSET ${}", bind_idx + 1));
    }
    (query, bind_values)
}

fn count_sql(filter: &QuoteFilter) -> (String, Vec<String>) {
    let (where_clause, bind_values, _) = build_quote_filter(filter);
    (
        format!("SELECT COUNT(*)::BIGINT AS count FROM quotes {where_clause}"),
        bind_values,
    )
}

/// Build a WHERE clause and bind values from a [`QuoteFilter`].
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
/// The `where_clause` is empty if no filters are active, or starts with `WHERE `.
fn build_quote_filter(filter: &QuoteFilter) -> (String, Vec<String>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<String> = Vec::new();

    if let Some(ref state) = filter.state {
        conditions.push(format!("project_state = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(state.clone());
    }

    if let Some(roof_type) = filter.roof_type {
        conditions.push(format!("roof_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(roof_type.as_str().to_string());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// ORDER BY expression. Text columns use byte-order collation so results
/// sort the same way as the in-memory store; `id` breaks ties.
fn order_by(sort: QuoteSort) -> String {
    let direction = sort.order.sql();
    let column = match sort.field {
        SortField::ContractorName
        | SortField::Company
        | SortField::ProjectCity
        | SortField::ProjectState
        | SortField::RoofType => format!("{} COLLATE \"C\"", sort.field.column()),
        _ => sort.field.column().to_string(),
    };
    format!("{column} {direction}, id {direction}")
}
