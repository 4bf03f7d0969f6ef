//! # store::memory
//!
//! Process-local [`QuoteStore`] backed by a `RwLock<HashMap>`.  Used when no
//! database is configured, and by the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::QuoteStore;
use crate::models::Quote;

#[derive(Debug, Default)]
pub struct InMemoryQuoteStore {
    quotes: RwLock<HashMap<String, Quote>>,
}

impl InMemoryQuoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteStore for InMemoryQuoteStore {
    async fn get(&self, instrument: &str) -> anyhow::Result<Option<Quote>> {
        Ok(self.quotes.read().await.get(instrument).cloned())
    }

    /// Unconditional; ordering is decided by the caller.
    async fn put(&self, quote: &Quote) -> anyhow::Result<bool> {
        self.quotes
            .write()
            .await
            .insert(quote.instrument.clone(), quote.clone());
        Ok(true)
    }

    /// Sorted by instrument so that `GET /price` output is stable.
    async fn list(&self) -> anyhow::Result<Vec<Quote>> {
        let mut quotes: Vec<Quote> = self.quotes.read().await.values().cloned().collect();
        quotes.sort_by(|a, b| a.instrument.cmp(&b.instrument));
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TickParser;

    fn quote(raw: &str) -> Quote {
        Quote::from(TickParser::default().parse(raw).unwrap())
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = InMemoryQuoteStore::new();
        assert!(store.get("EUR/USD").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_by_instrument() {
        let store = InMemoryQuoteStore::new();
        assert!(store.put(&quote("1,EUR/USD,1.1,1.2,01-06-2020 12:00:00:000")).await.unwrap());
        assert!(store.put(&quote("2,EUR/USD,1.3,1.4,01-06-2020 12:00:01:000")).await.unwrap());

        let stored = store.get("EUR/USD").await.unwrap().unwrap();
        assert_eq!(stored.external_id, 2);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_key_is_exact_instrument() {
        let store = InMemoryQuoteStore::new();
        store.put(&quote("1,EUR/USD,1.1,1.2,01-06-2020 12:00:00:000")).await.unwrap();

        assert!(store.get("EUR-USD").await.unwrap().is_none());
        assert!(store.get("eur/usd").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorted_by_instrument() {
        let store = InMemoryQuoteStore::new();
        store.put(&quote("1,USD/JPY,1,1,01-06-2020 12:00:00:000")).await.unwrap();
        store.put(&quote("2,EUR/JPY,1,1,01-06-2020 12:00:00:000")).await.unwrap();
        store.put(&quote("3,GBP/USD,1,1,01-06-2020 12:00:00:000")).await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.instrument)
            .collect();
        assert_eq!(names, ["EUR/JPY", "GBP/USD", "USD/JPY"]);
    }
}
