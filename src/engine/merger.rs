//! # engine::merger
//!
//! **Quote Merger** — last-writer-wins by embedded event time.
//!
//! Ticks can arrive out of order; the one carrying the latest `event_time`
//! is the one that ends up in the store.  A tick whose time is equal to or
//! older than the stored quote is dropped without error.

use crate::models::{ParsedTick, Quote};

// ─── Merge Outcome ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Caller must write this quote to the store.
    Replace(Quote),
    /// Incoming tick is not newer than what is stored — nothing to do.
    Stale,
}

/// Decide whether an adjusted tick supersedes the stored quote.
///
/// The replacement is built entirely from `incoming`; nothing is carried over
/// from `existing`.
pub fn merge(existing: Option<&Quote>, incoming: ParsedTick) -> MergeOutcome {
    match existing {
        Some(current) if incoming.event_time <= current.event_time => MergeOutcome::Stale,
        _ => MergeOutcome::Replace(Quote::from(incoming)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parser::TickParser;
    use rust_decimal_macros::dec;

    fn tick(id: i32, time: &str) -> ParsedTick {
        TickParser::default()
            .parse(&format!("{id},GBP/USD,1.2500,1.2560,01-06-2020 {time}"))
            .unwrap()
    }

    #[test]
    fn test_first_tick_is_accepted() {
        let incoming = tick(3, "12:01:02:001");
        assert_eq!(merge(None, incoming.clone()), MergeOutcome::Replace(Quote::from(incoming)));
    }

    #[test]
    fn test_newer_tick_replaces_every_field() {
        let stored = Quote::from(tick(3, "12:01:02:001"));
        let mut incoming = tick(5, "12:02:02:100");
        incoming.bid = dec!(1.1000);
        incoming.ask = dec!(1.4000);

        match merge(Some(&stored), incoming.clone()) {
            MergeOutcome::Replace(quote) => {
                assert_eq!(quote.external_id, 5);
                assert_eq!(quote.bid, dec!(1.1000));
                assert_eq!(quote.ask, dec!(1.4000));
                assert_eq!(quote.event_time, incoming.event_time);
            }
            MergeOutcome::Stale => panic!("newer tick must replace"),
        }
    }

    #[test]
    fn test_older_tick_is_stale() {
        let stored = Quote::from(tick(5, "12:02:02:100"));
        assert_eq!(merge(Some(&stored), tick(4, "12:01:02:100")), MergeOutcome::Stale);
    }

    #[test]
    fn test_equal_time_is_stale() {
        let stored = Quote::from(tick(5, "12:02:02:100"));
        assert_eq!(merge(Some(&stored), tick(6, "12:02:02:100")), MergeOutcome::Stale);
    }

    #[test]
    fn test_one_millisecond_later_wins() {
        let stored = Quote::from(tick(5, "12:02:02:100"));
        assert!(matches!(
            merge(Some(&stored), tick(6, "12:02:02:101")),
            MergeOutcome::Replace(_)
        ));
    }

    #[test]
    fn test_sequence_id_does_not_order() {
        // a lower external id with a later time still wins
        let stored = Quote::from(tick(9, "12:00:00:000"));
        assert!(matches!(
            merge(Some(&stored), tick(1, "12:00:00:001")),
            MergeOutcome::Replace(_)
        ));
    }
}
