//! # models::tick
//!
//! Defines [`ParsedTick`], the typed form of one raw price line received on the
//! feed (`externalId,instrument,bid,ask,eventTime`).
//!
//! A `ParsedTick` only lives for the duration of one pipeline run: the parser
//! builds it, the spread adjuster rewrites its prices and the merger turns it
//! into a [`Quote`](super::Quote) or drops it.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;

/// `chrono` rendition of the feed timestamp pattern `dd-MM-yyyy HH:mm:ss:SSS`.
pub const EVENT_TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S:%3f";

/// A validated price tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTick {
    /// Sequence number assigned by the upstream feed.  Carried through to the
    /// stored quote but never used for ordering.
    pub external_id: i32,

    /// Currency pair exactly as received, e.g. `"EUR/USD"`.
    pub instrument: String,

    pub bid: Decimal,
    pub ask: Decimal,

    /// Time the tick was produced upstream, millisecond precision.
    pub event_time: DateTime<FixedOffset>,
}
