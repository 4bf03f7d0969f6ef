//! # config
//!
//! Runtime configuration, read once at startup from environment variables
//! (optionally via `.env`).
//!
//! | Variable                   | Default        | Description                              |
//! |----------------------------|----------------|------------------------------------------|
//! | `BIND_ADDR`                | `0.0.0.0:8080` | Address Axum listens on                  |
//! | `PRICE_SPREAD`             | `0.1`          | Spread fraction applied to bid / ask     |
//! | `PRICE_SCALE`              | `4`            | Decimal places of adjusted prices        |
//! | `PRICE_UTC_OFFSET_MINUTES` | `0`            | Offset in which tick timestamps are read |
//! | `PRICE_FEED_STDIN`         | `false`        | Read raw ticks line by line from stdin   |
//! | `DATABASE_URL`             | —              | PostgreSQL store (`postgres` feature)    |

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use chrono::FixedOffset;
use rust_decimal::Decimal;

use crate::engine::spread::{SpreadConfig, DEFAULT_SCALE, DEFAULT_SPREAD};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr:    SocketAddr,
    pub spread:       SpreadConfig,
    /// Reference offset of the feed's `eventTime` field.
    pub tick_offset:  FixedOffset,
    pub feed_stdin:   bool,
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes the process
    /// environment, tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse()
            .context("BIND_ADDR is not a socket address")?;

        let spread = match lookup("PRICE_SPREAD") {
            Some(v) => Decimal::from_str(v.trim()).context("PRICE_SPREAD is not a decimal")?,
            None => DEFAULT_SPREAD,
        };
        let scale = parse_or(&lookup, "PRICE_SCALE", DEFAULT_SCALE)?;
        let spread = SpreadConfig::new(spread, scale)?;

        let offset_minutes: i32 = parse_or(&lookup, "PRICE_UTC_OFFSET_MINUTES", 0)?;
        let tick_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("PRICE_UTC_OFFSET_MINUTES out of range: {offset_minutes}"))?;

        let feed_stdin = parse_or(&lookup, "PRICE_FEED_STDIN", false)?;

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());

        Ok(Self { bind_addr, spread, tick_offset, feed_stdin, database_url })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(v) => v.trim().parse().with_context(|| format!("{key} has an invalid value: {v}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.spread, SpreadConfig::default());
        assert_eq!(cfg.tick_offset.local_minus_utc(), 0);
        assert!(!cfg.feed_stdin);
        assert!(cfg.database_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("PRICE_SPREAD", "0.05"),
            ("PRICE_SCALE", "5"),
            ("PRICE_UTC_OFFSET_MINUTES", "60"),
            ("PRICE_FEED_STDIN", "true"),
            ("DATABASE_URL", "postgres://localhost/quotes"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.spread.spread(), dec!(0.05));
        assert_eq!(cfg.spread.scale(), 5);
        assert_eq!(cfg.tick_offset.local_minus_utc(), 3600);
        assert!(cfg.feed_stdin);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/quotes"));
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(config(&[("PRICE_SPREAD", "ten")]).is_err());
        assert!(config(&[("PRICE_SPREAD", "1.5")]).is_err());
        assert!(config(&[("PRICE_SCALE", "-1")]).is_err());
        assert!(config(&[("PRICE_UTC_OFFSET_MINUTES", "100000")]).is_err());
        assert!(config(&[("BIND_ADDR", "nowhere")]).is_err());
    }

    #[test]
    fn test_blank_database_url_ignored() {
        assert!(config(&[("DATABASE_URL", "  ")]).unwrap().database_url.is_none());
    }
}
