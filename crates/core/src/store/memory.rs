use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{QuoteStore, StoreError};
use crate::query::{QuoteFilter, QuoteSort, Window};
use crate::quote::Quote;
use crate::types::QuoteId;
use crate::validation::schema;

/// Process-local store backed by a vector. Data is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryQuoteStore {
    quotes: RwLock<Vec<Quote>>,
}

impl MemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteStore for MemoryQuoteStore {
    async fn create(&self, quote: &Quote) -> Result<Quote, StoreError> {
        schema::check_record(quote, quote.created_at.date_naive()).map_err(StoreError::Rejected)?;

        let mut quotes = self.quotes.write().await;
        if quotes.iter().any(|q| q.id == quote.id) {
            return Err(StoreError::Backend(format!("duplicate quote id {}", quote.id)));
        }
        quotes.push(quote.clone());
        Ok(quote.clone())
    }

    async fn find_by_id(&self, id: QuoteId) -> Result<Option<Quote>, StoreError> {
        let quotes = self.quotes.read().await;
        Ok(quotes.iter().find(|q| q.id == id).cloned())
    }

    async fn find(
        &self,
        filter: &QuoteFilter,
        sort: QuoteSort,
        window: Option<Window>,
    ) -> Result<Vec<Quote>, StoreError> {
        let quotes = self.quotes.read().await;
        Ok(select(&quotes, filter, sort, window))
    }

    async fn count(&self, filter: &QuoteFilter) -> Result<i64, StoreError> {
        let quotes = self.quotes.read().await;
        count_matches(&quotes, filter)
    }

    async fn find_page(
        &self,
        filter: &QuoteFilter,
        sort: QuoteSort,
        window: Window,
    ) -> Result<(Vec<Quote>, i64), StoreError> {
        let quotes = self.quotes.read().await;
        let page = select(&quotes, filter, sort, Some(window));
        let total = count_matches(&quotes, filter)?;
        Ok((page, total))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn select(quotes: &[Quote], filter: &QuoteFilter, sort: QuoteSort, window: Option<Window>) -> Vec<Quote> {
    let mut matched: Vec<Quote> = quotes.iter().filter(|q| filter.matches(q)).cloned().collect();
    matched.sort_by(|a, b| sort.compare(a, b));

    match window {
        Some(w) => matched
            .into_iter()
            .skip(usize::try_from(w.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(w.limit).unwrap_or(0))
            .collect(),
        None => matched,
    }
}

fn count_matches(quotes: &[Quote], filter: &QuoteFilter) -> Result<i64, StoreError> {
    let n = quotes.iter().filter(|q| filter.matches(q)).count();
    i64::try_from(n).map_err(|e| StoreError::Backend(e.to_string()))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;
    use crate::quote::RoofType;

    fn quote(state: &str, roof_type: RoofType, minutes_ago: i64) -> Quote {
        let created = Utc::now() - Duration::minutes(minutes_ago);
        Quote {
            id: QuoteId::now_v7(),
            contractor_name: "Jane Roe".into(),
            company: "Roe Roofing".into(),
            roof_size: 1200.0,
            roof_type,
            project_city: "Denver".into(),
            project_state: state.into(),
            project_date: (Utc::now() + Duration::days(10)).date_naive(),
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn create_then_find_by_id() {
        let store = MemoryQuoteStore::new();
        let q = quote("CO", RoofType::Foam, 0);
        let stored = store.create(&q).await.unwrap();
        assert_eq!(stored, q);
        assert_eq!(store.find_by_id(q.id).await.unwrap(), Some(q));
        assert_eq!(store.find_by_id(QuoteId::now_v7()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn create_rejects_records_failing_the_schema() {
        let store = MemoryQuoteStore::new();
        let mut q = quote("CO", RoofType::Foam, 0);
        q.roof_size = -5.0;

        let err = store.create(&q).await.unwrap_err();
        assert_matches!(err, StoreError::Rejected(ref errors) if errors[0].field == "roofSize");
        assert_eq!(store.count(&QuoteFilter::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_id_is_a_backend_error() {
        let store = MemoryQuoteStore::new();
        let q = quote("CO", RoofType::Foam, 0);
        store.create(&q).await.unwrap();
        assert_matches!(store.create(&q).await, Err(StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn find_filters_sorts_and_windows() {
        let store = MemoryQuoteStore::new();
        let oldest = quote("TX", RoofType::Metal, 30);
        let middle = quote("TX", RoofType::Metal, 20);
        let newest = quote("TX", RoofType::Metal, 10);
        let other = quote("CA", RoofType::Metal, 5);
        for q in [&oldest, &newest, &other, &middle] {
            store.create(q).await.unwrap();
        }

        let filter = QuoteFilter {
            state: Some("TX".into()),
            roof_type: None,
        };
        let all = store.find(&filter, QuoteSort::default(), None).await.unwrap();
        let ids: Vec<_> = all.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![newest.id, middle.id, oldest.id]);

        let page = store
            .find(&filter, QuoteSort::default(), Some(Window { offset: 1, limit: 1 }))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, middle.id);

        assert_eq!(store.count(&filter).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn find_page_reports_window_and_total_together() {
        let store = MemoryQuoteStore::new();
        for minutes in [40, 30, 20, 10] {
            store.create(&quote("WA", RoofType::Tpo, minutes)).await.unwrap();
        }
        store.create(&quote("OR", RoofType::Tpo, 5)).await.unwrap();

        let filter = QuoteFilter {
            state: Some("WA".into()),
            roof_type: None,
        };
        let (page, total) = store
            .find_page(&filter, QuoteSort::default(), Window { offset: 2, limit: 3 })
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(total, 4);
        assert!(page.iter().all(|q| q.project_state == "WA"));
    }

    #[tokio::test]
    async fn record_dated_by_its_creation_day_is_accepted() {
        let store = MemoryQuoteStore::new();
        let mut q = quote("CO", RoofType::Foam, 24 * 60);
        q.project_date = q.created_at.date_naive();
        assert!(store.create(&q).await.is_ok());
    }
}
