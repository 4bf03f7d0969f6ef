//! The quote pipeline's decision logic: parse, adjust, merge.
//!
//! Everything in here is pure; store access lives in [`crate::service`].

pub mod merger;
pub mod parser;
pub mod spread;

pub use merger::{merge, MergeOutcome};
pub use parser::TickParser;
pub use spread::SpreadAdjuster;
