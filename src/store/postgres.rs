//! # store::postgres — PostgreSQL quote store
//!
//! Enabled with `--features postgres` and selected at startup when
//! `DATABASE_URL` is set.
//!
//! ## Setup
//! 1. Create a database
//! 2. Set `DATABASE_URL` in `.env`
//! 3. Start the service; `migrations/001_init.sql` is applied on connect
//!
//! `put` is an upsert guarded on `event_time`, so a second process writing
//! the same instrument can never move a stored quote backwards in time.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use super::QuoteStore;
use crate::models::Quote;

// ─── Pool Init ────────────────────────────────────────────────────────────────

/// Create the pool and run the embedded migration.
pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    run_migrations(&pool).await?;

    info!("✅ PostgreSQL connected and migrations applied");
    Ok(pool)
}

async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(include_str!("../../migrations/001_init.sql"))
        .execute(pool)
        .await
        .context("Failed to run migration 001_init.sql")?;

    Ok(())
}

// ─── Store ────────────────────────────────────────────────────────────────────

pub struct PgQuoteStore {
    pool: PgPool,
}

impl PgQuoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct QuoteRow {
    instrument:  String,
    external_id: i32,
    bid:         Decimal,
    ask:         Decimal,
    event_time:  DateTime<Utc>,
    utc_offset:  i32,
}

impl TryFrom<QuoteRow> for Quote {
    type Error = anyhow::Error;

    fn try_from(row: QuoteRow) -> anyhow::Result<Self> {
        let offset = FixedOffset::east_opt(row.utc_offset)
            .with_context(|| format!("invalid utc_offset {} for {}", row.utc_offset, row.instrument))?;

        Ok(Quote {
            instrument:  row.instrument,
            external_id: row.external_id,
            bid:         row.bid,
            ask:         row.ask,
            event_time:  row.event_time.with_timezone(&offset),
        })
    }
}

#[async_trait]
impl QuoteStore for PgQuoteStore {
    async fn get(&self, instrument: &str) -> anyhow::Result<Option<Quote>> {
        let row = sqlx::query_as::<_, QuoteRow>(
            r#"
            SELECT instrument, external_id, bid, ask, event_time, utc_offset
            FROM quotes
            WHERE instrument = $1
            "#,
        )
        .bind(instrument)
        .fetch_optional(&self.pool)
        .await
        .context("get quote failed")?;

        row.map(Quote::try_from).transpose()
    }

    async fn put(&self, quote: &Quote) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO quotes (instrument, external_id, bid, ask, event_time, utc_offset)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (instrument) DO UPDATE SET
              external_id = EXCLUDED.external_id,
              bid         = EXCLUDED.bid,
              ask         = EXCLUDED.ask,
              event_time  = EXCLUDED.event_time,
              utc_offset  = EXCLUDED.utc_offset
            WHERE quotes.event_time < EXCLUDED.event_time
            "#,
        )
        .bind(&quote.instrument)
        .bind(quote.external_id)
        .bind(quote.bid)
        .bind(quote.ask)
        .bind(quote.event_time.with_timezone(&Utc))
        .bind(quote.event_time.offset().local_minus_utc())
        .execute(&self.pool)
        .await
        .context("put quote failed")?;

        // 0 rows: the time guard kept a newer row written by another process
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> anyhow::Result<Vec<Quote>> {
        let rows = sqlx::query_as::<_, QuoteRow>(
            r#"
            SELECT instrument, external_id, bid, ask, event_time, utc_offset
            FROM quotes
            ORDER BY instrument
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("list quotes failed")?;

        rows.into_iter().map(Quote::try_from).collect()
    }
}
