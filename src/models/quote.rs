//! # models::quote
//!
//! [`Quote`] is the persisted, spread-adjusted latest price for one instrument.
//! There is at most one `Quote` per instrument in the store.
//!
//! [`QuoteView`] is the JSON body served by the read API.  All of its fields
//! are optional so that an unknown instrument can be answered with an
//! all-`null` placeholder instead of an error.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::tick::{ParsedTick, EVENT_TIME_FORMAT};

// ─── Quote ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Store key.
    pub instrument: String,

    /// Sequence id of the tick that produced this quote.
    pub external_id: i32,

    pub bid: Decimal,
    pub ask: Decimal,

    #[serde(serialize_with = "serialize_event_time")]
    pub event_time: DateTime<FixedOffset>,
}

impl From<ParsedTick> for Quote {
    fn from(tick: ParsedTick) -> Self {
        Self {
            instrument:  tick.instrument,
            external_id: tick.external_id,
            bid:         tick.bid,
            ask:         tick.ask,
            event_time:  tick.event_time,
        }
    }
}

fn serialize_event_time<S>(time: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format(EVENT_TIME_FORMAT))
}

// ─── QuoteView ────────────────────────────────────────────────────────────────

/// Read-side representation of a [`Quote`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    pub instrument:  Option<String>,
    pub external_id: Option<i32>,
    pub bid:         Option<Decimal>,
    pub ask:         Option<Decimal>,
    pub event_time:  Option<String>,
}

impl QuoteView {
    /// The placeholder returned for an instrument that has never been quoted.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<Quote> for QuoteView {
    fn from(quote: Quote) -> Self {
        Self {
            instrument:  Some(quote.instrument),
            external_id: Some(quote.external_id),
            bid:         Some(quote.bid),
            ask:         Some(quote.ask),
            event_time:  Some(quote.event_time.format(EVENT_TIME_FORMAT).to_string()),
        }
    }
}

impl From<Option<Quote>> for QuoteView {
    fn from(quote: Option<Quote>) -> Self {
        quote.map(Self::from).unwrap_or_else(Self::empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn make_quote() -> Quote {
        Quote {
            instrument:  "EUR/USD".into(),
            external_id: 1,
            bid:         dec!(1.0710),
            ask:         dec!(1.3695),
            event_time:  FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2020, 6, 1, 12, 1, 1)
                .unwrap()
                + chrono::Duration::milliseconds(1),
        }
    }

    #[test]
    fn test_quote_json_uses_feed_time_format_and_decimal_strings() {
        let json = serde_json::to_value(make_quote()).unwrap();
        assert_eq!(json["instrument"], "EUR/USD");
        assert_eq!(json["externalId"], 1);
        assert_eq!(json["bid"], "1.0710");
        assert_eq!(json["ask"], "1.3695");
        assert_eq!(json["eventTime"], "01-06-2020 12:01:01:001");
    }

    #[test]
    fn test_empty_view_serializes_all_null() {
        let json = serde_json::to_value(QuoteView::empty()).unwrap();
        for key in ["instrument", "externalId", "bid", "ask", "eventTime"] {
            assert!(json[key].is_null(), "{key} should be null");
        }
    }

    #[test]
    fn test_view_from_missing_quote_is_empty() {
        assert_eq!(QuoteView::from(None), QuoteView::empty());
        assert_eq!(QuoteView::from(Some(make_quote())).instrument.as_deref(), Some("EUR/USD"));
    }
}
