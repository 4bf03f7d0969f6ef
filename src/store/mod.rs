//! # store
//!
//! The keyed quote store: one [`Quote`] per instrument.
//!
//! The pipeline only ever needs `get` and `put` on a single instrument key;
//! `list` backs the read API.  Keys are the instrument string exactly as it
//! appears in the feed, separator included (`"EUR/USD"`).

use async_trait::async_trait;

use crate::models::Quote;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryQuoteStore;

#[async_trait]
pub trait QuoteStore: Send + Sync {
    async fn get(&self, instrument: &str) -> anyhow::Result<Option<Quote>>;

    /// Insert or fully replace the quote stored under `quote.instrument`.
    ///
    /// Returns `false` when the store declined the write because it already
    /// holds a quote at least as recent.
    async fn put(&self, quote: &Quote) -> anyhow::Result<bool>;

    async fn list(&self) -> anyhow::Result<Vec<Quote>>;
}
