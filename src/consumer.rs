//! # consumer
//!
//! **Tick Consumer** — the ingestion entry point.  The upstream feed hands it
//! one raw tick string per message; the consumer runs it through
//! [`PriceService::ingest`].
//!
//! Messages arrive over a `tokio::sync::mpsc` channel.  `main` fills that
//! channel from stdin when `PRICE_FEED_STDIN=true`, and any other producer
//! (a broker client, a replay tool) can hold a [`mpsc::Sender`] as well.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::IngestError;
use crate::service::{IngestOutcome, PriceService};

/// Capacity of the channel between feed readers and the consumer.
pub const FEED_CHANNEL_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct TickConsumer {
    service: Arc<PriceService>,
}

impl TickConsumer {
    pub fn new(service: Arc<PriceService>) -> Self {
        Self { service }
    }

    /// Handle a single feed message.  Errors go back to the caller untouched.
    pub async fn on_message(&self, raw: &str) -> Result<IngestOutcome, IngestError> {
        self.service.ingest(raw).await
    }

    /// Drain `rx` until every sender is dropped.
    ///
    /// A bad tick is logged and skipped; it never stops the loop.
    pub async fn run(self, mut rx: mpsc::Receiver<String>) {
        info!("📥 Tick consumer started");

        while let Some(raw) = rx.recv().await {
            match self.on_message(&raw).await {
                Ok(IngestOutcome::Stored(_)) | Ok(IngestOutcome::Stale) => {}
                Err(IngestError::Validation(e)) => {
                    warn!(raw = %raw, error = %e, "Rejected tick");
                }
                Err(e) => {
                    warn!(raw = %raw, error = %e, "Tick not ingested — store failure");
                }
            }
        }

        info!("📥 Tick consumer stopped — feed channel closed");
    }
}

/// Forward every non-blank line of `reader` into the feed channel.
///
/// Returns when the reader hits EOF or the consumer has gone away.
pub async fn forward_lines<R>(reader: R, tx: mpsc::Sender<String>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if tx.send(line).await.is_err() {
            debug!("Feed channel closed — stop reading");
            break;
        }
    }

    Ok(())
}
