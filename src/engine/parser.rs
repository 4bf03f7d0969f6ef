//! # engine::parser
//!
//! **Tick Parser** — turns one raw feed line into a [`ParsedTick`].
//!
//! Wire format (one tick per line, whitespace around fields is ignored):
//!
//! ```text
//! externalId,instrument,bid,ask,dd-MM-yyyy HH:mm:ss:SSS
//! 1, EUR/USD, 1.1900,1.2450,01-06-2020 12:01:01:001
//! ```

use std::str::FromStr;

use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::{ParsedTick, EVENT_TIME_FORMAT};

const FIELD_COUNT: usize = 5;

/// Stateless parser bound to the reference offset in which feed timestamps
/// are expressed.
#[derive(Debug, Clone, Copy)]
pub struct TickParser {
    offset: FixedOffset,
}

impl TickParser {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Parse a raw tick line.
    ///
    /// Field count is checked first (`MalformedInput`), then blank fields
    /// (`MissingField`), then the typed conversions (`MalformedInput`).
    pub fn parse(&self, raw: &str) -> Result<ParsedTick, ValidationError> {
        let fields: Vec<&str> = raw.split(',').map(str::trim).collect();

        if fields.len() != FIELD_COUNT {
            debug!(count = fields.len(), "Tick rejected — wrong field count");
            return Err(ValidationError::MalformedInput);
        }
        if fields.iter().any(|f| f.is_empty()) {
            return Err(ValidationError::MissingField);
        }

        let external_id = fields[0]
            .parse::<i32>()
            .map_err(|e| malformed("externalId", fields[0], e))?;
        let instrument = fields[1].to_string();
        let bid = Decimal::from_str(fields[2]).map_err(|e| malformed("bid", fields[2], e))?;
        let ask = Decimal::from_str(fields[3]).map_err(|e| malformed("ask", fields[3], e))?;

        let event_time = NaiveDateTime::parse_from_str(fields[4], EVENT_TIME_FORMAT)
            .map_err(|e| malformed("eventTime", fields[4], e))?
            .and_local_timezone(self.offset)
            .single()
            .ok_or(ValidationError::MalformedInput)?;

        Ok(ParsedTick { external_id, instrument, bid, ask, event_time })
    }
}

impl Default for TickParser {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

fn malformed(field: &str, value: &str, err: impl std::fmt::Display) -> ValidationError {
    debug!(field, value, error = %err, "Tick rejected — unparsable field");
    ValidationError::MalformedInput
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn valid_fields() -> Vec<String> {
        ["1", "EUR/USD", "1.1900", "1.2450", "01-06-2020 12:01:01:001"]
            .iter()
            .map(|f| f.to_string())
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn test_any_field_count_but_five_is_malformed(
            fields in prop::collection::vec("[^,]{0,12}", 0..12)
                .prop_filter("exactly five fields", |f| f.len() != 5 && !f.is_empty()),
        ) {
            let raw = fields.join(",");
            prop_assert_eq!(TickParser::default().parse(&raw), Err(ValidationError::MalformedInput));
        }

        #[test]
        fn test_any_blank_field_is_missing(
            blank_at in 0usize..5,
            padding in "[ \t]{0,4}",
            others in prop::collection::vec("[^,]{0,12}", 5),
        ) {
            // arbitrary junk elsewhere must not mask the blank field
            let mut fields = others;
            fields[blank_at] = padding;
            let raw = fields.join(",");
            prop_assert_eq!(TickParser::default().parse(&raw), Err(ValidationError::MissingField));
        }

        #[test]
        fn test_blank_field_in_otherwise_valid_tick_is_missing(
            blank_at in 0usize..5,
            padding in "[ \t]{0,4}",
        ) {
            let mut fields = valid_fields();
            fields[blank_at] = padding;
            prop_assert_eq!(
                TickParser::default().parse(&fields.join(",")),
                Err(ValidationError::MissingField)
            );
        }
    }
}
