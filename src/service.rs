//! # service
//!
//! **PriceService** — the ingestion pipeline and the read accessors, assembled
//! once at startup around one injected [`QuoteStore`].
//!
//! ```text
//! raw ─▶ TickParser ─▶ SpreadAdjuster ─▶ [lock instrument] ─▶ store.get
//!                                                              │
//!                                              merge ◀─────────┘
//!                                                │ Replace
//!                                                ▼
//!                                           store.put
//! ```
//!
//! The read-compare-write on the store is serialised per instrument with an
//! async mutex, so two ticks for the same pair can never interleave between
//! `get` and `put` inside this process.  Different instruments run fully in
//! parallel.  A lock lives only while some tick for its instrument is in
//! flight, so arbitrary instrument names cannot grow the lock map.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::engine::{merge, MergeOutcome, SpreadAdjuster, TickParser};
use crate::error::IngestError;
use crate::models::{ParsedTick, Quote};
use crate::store::QuoteStore;

// ─── Outcome ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The tick was newer than the stored quote (or the first one) and is now
    /// the stored quote.
    Stored(Quote),
    /// An equal-or-newer quote was already stored; the tick was dropped.
    Stale,
}

// ─── Counters ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct PipelineStats {
    received: AtomicU64,
    stored:   AtomicU64,
    stale:    AtomicU64,
    rejected: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub received: u64,
    pub stored:   u64,
    pub stale:    u64,
    pub rejected: u64,
}

impl PipelineStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            stored:   self.stored.load(Ordering::Relaxed),
            stale:    self.stale.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
        }
    }
}

// ─── Service ──────────────────────────────────────────────────────────────────

pub struct PriceService {
    parser:   TickParser,
    adjuster: SpreadAdjuster,
    store:    Arc<dyn QuoteStore>,
    /// One lock per instrument with an ingest in flight.
    locks:    Mutex<HashMap<String, Arc<Mutex<()>>>>,
    stats:    PipelineStats,
}

impl PriceService {
    pub fn new(parser: TickParser, adjuster: SpreadAdjuster, store: Arc<dyn QuoteStore>) -> Self {
        Self {
            parser,
            adjuster,
            store,
            locks: Mutex::new(HashMap::new()),
            stats: PipelineStats::default(),
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Run one raw tick through the pipeline.
    ///
    /// Validation errors abort before the store is touched.  Store errors are
    /// returned as-is; nothing is retried.
    pub async fn ingest(&self, raw: &str) -> Result<IngestOutcome, IngestError> {
        self.stats.received.fetch_add(1, Ordering::Relaxed);

        let tick = match self.parser.parse(raw).and_then(|t| self.adjuster.adjust(t)) {
            Ok(tick) => tick,
            Err(e) => {
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                return Err(e.into());
            }
        };

        let instrument = tick.instrument.clone();
        let lock = self.acquire_lock(&instrument).await;
        let outcome = {
            let _guard = lock.lock().await;
            self.merge_into_store(tick).await
        };
        self.release_lock(&instrument, lock).await;

        match &outcome {
            Ok(IngestOutcome::Stored(quote)) => {
                self.stats.stored.fetch_add(1, Ordering::Relaxed);
                info!(
                    instrument  = %quote.instrument,
                    external_id = quote.external_id,
                    bid         = %quote.bid,
                    ask         = %quote.ask,
                    "💱 Quote stored"
                );
            }
            Ok(IngestOutcome::Stale) => {
                self.stats.stale.fetch_add(1, Ordering::Relaxed);
                debug!(raw, "Stale tick dropped — stored quote is newer");
            }
            Err(_) => {}
        }

        outcome
    }

    /// Read, decide, write.  Must run under the instrument's lock.
    async fn merge_into_store(&self, tick: ParsedTick) -> Result<IngestOutcome, IngestError> {
        let existing = self.store.get(&tick.instrument).await.map_err(IngestError::Store)?;

        match merge(existing.as_ref(), tick) {
            MergeOutcome::Replace(quote) => {
                let written = self.store.put(&quote).await.map_err(IngestError::Store)?;
                if written {
                    Ok(IngestOutcome::Stored(quote))
                } else {
                    Ok(IngestOutcome::Stale)
                }
            }
            MergeOutcome::Stale => Ok(IngestOutcome::Stale),
        }
    }

    /// Every stored quote, in store order.
    pub async fn all(&self) -> anyhow::Result<Vec<Quote>> {
        self.store.list().await
    }

    /// The stored quote for `instrument`, if any.  Absence is not an error.
    pub async fn by_instrument(&self, instrument: &str) -> anyhow::Result<Option<Quote>> {
        self.store.get(instrument).await
    }

    async fn acquire_lock(&self, instrument: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(instrument.to_string()).or_default().clone()
    }

    /// Drop the map entry once no other ingest holds or waits on it, so the
    /// map only ever contains instruments with a tick in flight.
    async fn release_lock(&self, instrument: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        // one reference in the map, one here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(instrument);
        }
    }

    #[cfg(test)]
    async fn tracked_instruments(&self) -> usize {
        self.locks.lock().await.len()
    }
}
