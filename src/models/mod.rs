//! Domain models shared across the quote pipeline.

pub mod quote;
pub mod tick;

pub use quote::{Quote, QuoteView};
pub use tick::{ParsedTick, EVENT_TIME_FORMAT};
