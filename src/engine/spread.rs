//! # engine::spread
//!
//! **Spread Adjuster** — widens an incoming tick into a dealable quote by
//! shaving a fixed fraction off the bid and adding it to the ask.
//!
//! ```text
//! bid' = round(round(bid) × (1 − spread))
//! ask' = round(round(ask) × (1 + spread))
//! ```
//!
//! `round` is half-down (a trailing 5 goes toward zero) at [`SpreadConfig::scale`]
//! decimal places, and the result always carries exactly that scale.  A price
//! too large to be carried exactly is rejected rather than clipped.  The raw
//! prices are normalised to the same scale before the multiplication so that
//! results match the prices historically published by the feed.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::error::ValidationError;
use crate::models::ParsedTick;

/// Default spread (10 %).
pub const DEFAULT_SPREAD: Decimal = Decimal::from_parts(1, 0, 0, false, 1);
/// Default number of decimal places of an adjusted price.
pub const DEFAULT_SCALE: u32 = 4;

/// Largest scale a `Decimal` can represent.
const MAX_SCALE: u32 = 28;

const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointTowardZero;

// ─── Config ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpreadConfigError {
    #[error("spread must be in [0, 1), got {0}")]
    SpreadOutOfRange(Decimal),

    #[error("scale plus spread decimal places must be at most 28, got scale {0}")]
    ScaleTooLarge(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadConfig {
    spread: Decimal,
    scale:  u32,
}

impl SpreadConfig {
    pub fn new(spread: Decimal, scale: u32) -> Result<Self, SpreadConfigError> {
        if spread.is_sign_negative() || spread >= Decimal::ONE {
            return Err(SpreadConfigError::SpreadOutOfRange(spread));
        }
        if scale.saturating_add(spread.scale()) > MAX_SCALE {
            return Err(SpreadConfigError::ScaleTooLarge(scale));
        }
        Ok(Self { spread, scale })
    }

    pub fn spread(&self) -> Decimal {
        self.spread
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self { spread: DEFAULT_SPREAD, scale: DEFAULT_SCALE }
    }
}

// ─── Adjuster ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct SpreadAdjuster {
    scale:           u32,
    bid_multiplier:  Decimal,
    ask_multiplier:  Decimal,
}

impl SpreadAdjuster {
    pub fn new(config: SpreadConfig) -> Self {
        Self {
            scale:          config.scale,
            bid_multiplier: Decimal::ONE - config.spread,
            ask_multiplier: Decimal::ONE + config.spread,
        }
    }

    /// Replace bid/ask with their spread-adjusted values.  Every other field
    /// passes through unchanged.
    ///
    /// Fails with `MalformedInput` when a price is too large for its adjusted
    /// value to be carried exactly at the configured scale.
    pub fn adjust(&self, mut tick: ParsedTick) -> Result<ParsedTick, ValidationError> {
        tick.bid = self.apply(tick.bid, self.bid_multiplier)?;
        tick.ask = self.apply(tick.ask, self.ask_multiplier)?;
        Ok(tick)
    }

    fn apply(&self, price: Decimal, multiplier: Decimal) -> Result<Decimal, ValidationError> {
        let normalised = self.round(price).ok_or(ValidationError::MalformedInput)?;

        // checked_mul silently drops fractional digits once the mantissa is
        // full; only an untruncated product is rounded
        let product = normalised
            .checked_mul(multiplier)
            .filter(|p| p.is_zero() || p.scale() == normalised.scale() + multiplier.scale())
            .ok_or(ValidationError::MalformedInput)?;

        self.round(product).ok_or(ValidationError::MalformedInput)
    }

    /// `None` when the value cannot be padded to the full scale.
    fn round(&self, value: Decimal) -> Option<Decimal> {
        let mut rounded = value.round_dp_with_strategy(self.scale, ROUNDING);
        // round_dp never adds trailing zeros; pad up to the fixed scale
        rounded.rescale(self.scale);
        (rounded.scale() == self.scale).then_some(rounded)
    }
}

impl Default for SpreadAdjuster {
    fn default() -> Self {
        Self::new(SpreadConfig::default())
    }
}
