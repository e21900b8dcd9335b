//! Retrieval and filter engine.
//!
//! Translates raw query parameters into a [`QuoteFilter`], [`QuoteSort`] and
//! [`PageRequest`]. The filter is a pure function of its inputs and is the
//! only definition of "which quotes match", shared by the listing view, the
//! CSV export and the single-quote lookup.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::quote::{Quote, RoofType};
use crate::store::QuoteStore;
use crate::types::QuoteId;
use crate::validation::rules;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Treat absent and blank parameters the same way.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Query string of the listing endpoint, exactly as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub state: Option<String>,
    pub roof_type: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Query string of the CSV export endpoint. No pagination.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    pub state: Option<String>,
    pub roof_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Conjunction of the optional state and roof type constraints.
/// An absent constraint matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    /// Canonical uppercase state code.
    pub state: Option<String>,
    pub roof_type: Option<RoofType>,
}

impl QuoteFilter {
    /// Build a filter from raw parameters. The state is matched
    /// case-insensitively and normalized to uppercase; the roof type must be
    /// an exact enum member.
    pub fn from_params(state: Option<&str>, roof_type: Option<&str>) -> Result<Self, CoreError> {
        let state = match present(state) {
            Some(s) if rules::valid_state_code(s) => Some(rules::canonical_state_code(s)),
            Some(s) => {
                return Err(CoreError::InvalidQuery(format!(
                    "'{s}' is not a valid US state code"
                )))
            }
            None => None,
        };

        let roof_type = present(roof_type)
            .map(|s| {
                s.parse::<RoofType>().map_err(|_| {
                    CoreError::InvalidQuery(format!(
                        "'{s}' is not a valid roof type (expected Metal, TPO, Foam or Other)"
                    ))
                })
            })
            .transpose()?;

        Ok(Self { state, roof_type })
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        self.state
            .as_deref()
            .map_or(true, |s| quote.project_state == s)
            && self.roof_type.map_or(true, |t| quote.roof_type == t)
    }
}

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    ProjectDate,
    RoofSize,
    ContractorName,
    Company,
    ProjectCity,
    ProjectState,
    RoofType,
}

impl SortField {
    const ALL: [SortField; 9] = [
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::ProjectDate,
        Self::RoofSize,
        Self::ContractorName,
        Self::Company,
        Self::ProjectCity,
        Self::ProjectState,
        Self::RoofType,
    ];

    /// Query parameter spelling.
    pub fn key(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::ProjectDate => "projectDate",
            Self::RoofSize => "roofSize",
            Self::ContractorName => "contractorName",
            Self::Company => "company",
            Self::ProjectCity => "projectCity",
            Self::ProjectState => "projectState",
            Self::RoofType => "roofType",
        }
    }

    /// Column name in the `quotes` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::ProjectDate => "project_date",
            Self::RoofSize => "roof_size",
            Self::ContractorName => "contractor_name",
            Self::Company => "company",
            Self::ProjectCity => "project_city",
            Self::ProjectState => "project_state",
            Self::RoofType => "roof_type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Resolved sort. Ties are broken by id in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for QuoteSort {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl QuoteSort {
    pub fn from_params(sort_by: Option<&str>, sort_order: Option<&str>) -> Result<Self, CoreError> {
        let defaults = Self::default();

        let field = match present(sort_by) {
            Some(key) => SortField::ALL
                .into_iter()
                .find(|f| f.key() == key)
                .ok_or_else(|| CoreError::InvalidQuery(format!("Cannot sort by '{key}'")))?,
            None => defaults.field,
        };

        let order = match present(sort_order).map(str::to_ascii_lowercase).as_deref() {
            Some("asc" | "ascending") => SortOrder::Asc,
            Some("desc" | "descending") => SortOrder::Desc,
            Some(other) => {
                return Err(CoreError::InvalidQuery(format!(
                    "Sort order must be 'asc' or 'desc', got '{other}'"
                )))
            }
            None => defaults.order,
        };

        Ok(Self { field, order })
    }

    pub fn compare(&self, a: &Quote, b: &Quote) -> Ordering {
        let primary = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::ProjectDate => a.project_date.cmp(&b.project_date),
            SortField::RoofSize => a.roof_size.total_cmp(&b.roof_size),
            SortField::ContractorName => a.contractor_name.cmp(&b.contractor_name),
            SortField::Company => a.company.cmp(&b.company),
            SortField::ProjectCity => a.project_city.cmp(&b.project_city),
            SortField::ProjectState => a.project_state.cmp(&b.project_state),
            SortField::RoofType => a.roof_type.as_str().cmp(b.roof_type.as_str()),
        };
        let ordering = primary.then_with(|| a.id.cmp(&b.id));
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Offset/limit slice handed to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

fn parse_positive(name: &str, value: Option<&str>, default: i64) -> Result<i64, CoreError> {
    match present(value) {
        None => Ok(default),
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(CoreError::InvalidQuery(format!(
                "'{name}' must be a positive integer, got '{raw}'"
            ))),
        },
    }
}

impl PageRequest {
    /// Parse `page` and `limit`. Both must be >= 1 and `limit` may not
    /// exceed [`MAX_PAGE_LIMIT`]. The accepted limit is exactly the one used
    /// for slicing and for `totalPages`.
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Result<Self, CoreError> {
        let page = parse_positive("page", page, 1)?;
        let limit = parse_positive("limit", limit, DEFAULT_PAGE_LIMIT)?;
        if limit > MAX_PAGE_LIMIT {
            return Err(CoreError::InvalidQuery(format!(
                "'limit' must be at most {MAX_PAGE_LIMIT}, got {limit}"
            )));
        }
        Ok(Self { page, limit })
    }

    pub fn window(&self) -> Window {
        Window {
            offset: (self.page - 1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }
}

/// Pagination metadata, always derived from the unsliced match count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_quotes: i64,
    pub has_more: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total_quotes: i64) -> Self {
        let total_pages = if total_quotes <= 0 {
            0
        } else {
            (total_quotes + request.limit - 1) / request.limit
        };
        Self {
            current_page: request.page,
            total_pages,
            total_quotes,
            has_more: request.page.saturating_mul(request.limit) < total_quotes,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Fully resolved listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: QuoteFilter,
    pub sort: QuoteSort,
    pub page: PageRequest,
}

impl ListQuery {
    pub fn from_params(params: &ListParams) -> Result<Self, CoreError> {
        Ok(Self {
            filter: QuoteFilter::from_params(params.state.as_deref(), params.roof_type.as_deref())?,
            sort: QuoteSort::from_params(params.sort_by.as_deref(), params.sort_order.as_deref())?,
            page: PageRequest::from_params(params.page.as_deref(), params.limit.as_deref())?,
        })
    }
}

/// One page of quotes plus metadata.
#[derive(Debug, Clone, Serialize)]
pub struct QuotePage {
    pub quotes: Vec<Quote>,
    pub pagination: Pagination,
}

pub async fn list_quotes(store: &dyn QuoteStore, query: &ListQuery) -> Result<QuotePage, CoreError> {
    let (quotes, total) = store
        .find_page(&query.filter, query.sort, query.page.window())
        .await?;

    Ok(QuotePage {
        quotes,
        pagination: Pagination::new(query.page, total),
    })
}

/// Every quote matching `filter`, newest first, unpaginated.
pub async fn export_quotes(
    store: &dyn QuoteStore,
    filter: &QuoteFilter,
) -> Result<Vec<Quote>, CoreError> {
    Ok(store.find(filter, QuoteSort::default(), None).await?)
}

/// Parse an identifier taken from a request path.
pub fn parse_quote_id(raw: &str) -> Result<QuoteId, CoreError> {
    QuoteId::parse_str(raw.trim()).map_err(|_| CoreError::MalformedId(raw.to_string()))
}

/// Resolve a single quote by raw identifier.
///
/// Distinguishes a malformed identifier from one that simply has no record.
pub async fn find_quote(store: &dyn QuoteStore, raw_id: &str) -> Result<Quote, CoreError> {
    let id = parse_quote_id(raw_id)?;
    store
        .find_by_id(id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Quote", id })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::store::MemoryQuoteStore;

    fn quote(state: &str, roof_type: RoofType, roof_size: f64) -> Quote {
        let now = Utc::now();
        Quote {
            id: QuoteId::now_v7(),
            contractor_name: "Pat Lee".into(),
            company: "Lee Roofing".into(),
            roof_size,
            roof_type,
            project_city: "Tulsa".into(),
            project_state: state.into(),
            project_date: (now + Duration::days(5)).date_naive(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn seeded_store() -> MemoryQuoteStore {
        let store = MemoryQuoteStore::new();
        let seeds = [
            ("TX", RoofType::Metal, 100.0),
            ("TX", RoofType::Tpo, 200.0),
            ("CA", RoofType::Metal, 300.0),
            ("OK", RoofType::Foam, 400.0),
            ("TX", RoofType::Metal, 500.0),
        ];
        for (state, roof_type, size) in seeds {
            store.create(&quote(state, roof_type, size)).await.unwrap();
        }
        store
    }

    // --- Filter ---

    #[test]
    fn filter_normalizes_state_to_uppercase() {
        let lower = QuoteFilter::from_params(Some("ca"), None).unwrap();
        let upper = QuoteFilter::from_params(Some("CA"), None).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.state.as_deref(), Some("CA"));
    }

    #[test]
    fn blank_filters_are_absent() {
        let filter = QuoteFilter::from_params(Some(""), Some("  ")).unwrap();
        assert_eq!(filter, QuoteFilter::default());
    }

    #[test]
    fn invalid_filter_values_are_rejected() {
        assert_matches!(
            QuoteFilter::from_params(Some("ZZ"), None),
            Err(CoreError::InvalidQuery(_))
        );
        assert_matches!(
            QuoteFilter::from_params(None, Some("metal")),
            Err(CoreError::InvalidQuery(_))
        );
    }

    #[test]
    fn filter_is_a_conjunction() {
        let filter = QuoteFilter::from_params(Some("TX"), Some("Metal")).unwrap();
        assert!(filter.matches(&quote("TX", RoofType::Metal, 1.0)));
        assert!(!filter.matches(&quote("TX", RoofType::Foam, 1.0)));
        assert!(!filter.matches(&quote("CA", RoofType::Metal, 1.0)));
        assert!(QuoteFilter::default().matches(&quote("CA", RoofType::Foam, 1.0)));
    }

    // --- Sort ---

    #[test]
    fn sort_defaults_to_newest_first() {
        assert_eq!(QuoteSort::from_params(None, None).unwrap(), QuoteSort::default());
        assert_eq!(QuoteSort::default().field, SortField::CreatedAt);
        assert_eq!(QuoteSort::default().order, SortOrder::Desc);
    }

    #[test]
    fn sort_params_parse() {
        let sort = QuoteSort::from_params(Some("roofSize"), Some("ASC")).unwrap();
        assert_eq!(sort.field, SortField::RoofSize);
        assert_eq!(sort.order, SortOrder::Asc);
        assert_matches!(
            QuoteSort::from_params(Some("id; DROP TABLE quotes"), None),
            Err(CoreError::InvalidQuery(_))
        );
        assert_matches!(
            QuoteSort::from_params(None, Some("sideways")),
            Err(CoreError::InvalidQuery(_))
        );
    }

    // --- Pagination ---

    #[test]
    fn page_request_defaults_and_bounds() {
        assert_eq!(PageRequest::from_params(None, None).unwrap(), PageRequest::default());
        assert_eq!(
            PageRequest::from_params(Some("2"), Some("100")).unwrap(),
            PageRequest { page: 2, limit: MAX_PAGE_LIMIT }
        );
        assert_matches!(
            PageRequest::from_params(Some("0"), None),
            Err(CoreError::InvalidQuery(_))
        );
        assert_matches!(
            PageRequest::from_params(None, Some("ten")),
            Err(CoreError::InvalidQuery(_))
        );
    }

    #[test]
    fn limit_above_maximum_is_rejected_not_rewritten() {
        assert_matches!(
            PageRequest::from_params(Some("1"), Some("500")),
            Err(CoreError::InvalidQuery(ref msg)) if msg.contains("at most 100")
        );
        assert_matches!(
            PageRequest::from_params(None, Some("101")),
            Err(CoreError::InvalidQuery(_))
        );

        // Metadata always reflects the limit the client asked for.
        let req = PageRequest::from_params(Some("1"), Some("100")).unwrap();
        let p = Pagination::new(req, 250);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_more);
    }

    #[test]
    fn window_offsets_by_page() {
        let req = PageRequest { page: 3, limit: 10 };
        assert_eq!(req.window(), Window { offset: 20, limit: 10 });
    }

    #[test]
    fn pagination_uses_total_count() {
        let p = Pagination::new(PageRequest { page: 1, limit: 10 }, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_more);

        let last = Pagination::new(PageRequest { page: 3, limit: 10 }, 25);
        assert!(!last.has_more);

        let exact = Pagination::new(PageRequest { page: 2, limit: 5 }, 10);
        assert_eq!(exact.total_pages, 2);
        assert!(!exact.has_more);

        let empty = Pagination::new(PageRequest::default(), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_more);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let json = serde_json::to_value(Pagination::new(PageRequest::default(), 3)).unwrap();
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["totalQuotes"], 3);
        assert_eq!(json["hasMore"], false);
    }

    // --- Store-backed queries ---

    #[tokio::test]
    async fn list_quotes_pages_through_filtered_results() {
        let store = seeded_store().await;
        let query = ListQuery {
            filter: QuoteFilter::from_params(Some("tx"), Some("Metal")).unwrap(),
            sort: QuoteSort::from_params(Some("roofSize"), Some("asc")).unwrap(),
            page: PageRequest { page: 1, limit: 1 },
        };

        let page = list_quotes(&store, &query).await.unwrap();
        assert_eq!(page.quotes.len(), 1);
        assert_eq!(page.quotes[0].roof_size, 100.0);
        assert_eq!(page.pagination.total_quotes, 2);
        assert_eq!(page.pagination.total_pages, 2);
        assert!(page.pagination.has_more);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let store = seeded_store().await;
        let query = ListQuery {
            page: PageRequest { page: 9, limit: 10 },
            ..ListQuery::default()
        };

        let page = list_quotes(&store, &query).await.unwrap();
        assert!(page.quotes.is_empty());
        assert_eq!(page.pagination.total_quotes, 5);
        assert!(!page.pagination.has_more);
    }

    #[tokio::test]
    async fn export_matches_listing_for_same_filter() {
        let store = seeded_store().await;
        let filter = QuoteFilter::from_params(Some("TX"), None).unwrap();
        let listing = list_quotes(
            &store,
            &ListQuery {
                filter: filter.clone(),
                page: PageRequest { page: 1, limit: MAX_PAGE_LIMIT },
                ..ListQuery::default()
            },
        )
        .await
        .unwrap();
        let exported = export_quotes(&store, &filter).await.unwrap();

        let mut a: Vec<_> = listing.quotes.iter().map(|q| q.id).collect();
        let mut b: Vec<_> = exported.iter().map(|q| q.id).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(b.len(), 3);
    }

    #[tokio::test]
    async fn find_quote_distinguishes_malformed_from_missing() {
        let store = seeded_store().await;
        assert_matches!(
            find_quote(&store, "not-a-uuid").await,
            Err(CoreError::MalformedId(_))
        );
        let missing = QuoteId::now_v7();
        assert_matches!(
            find_quote(&store, &missing.to_string()).await,
            Err(CoreError::NotFound { id, .. }) if id == missing
        );
    }
}
