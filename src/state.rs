//! # state
//!
//! Shared application state injected into every Axum handler.
//!
//! * `Arc<AppState>` is cloned cheaply into handlers via `axum::extract::State`.
//! * The state holds no mutable data of its own; quotes live in the store
//!   behind [`PriceService`], pipeline counters live in the service.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::service::PriceService;

// ─── AppState ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    /// Ingestion pipeline and read accessors.
    pub prices: Arc<PriceService>,

    /// Process start, reported by `/health`.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(prices: Arc<PriceService>) -> Self {
        Self { prices, started_at: Utc::now() }
    }
}

/// Convenience type alias so callers can write `SharedState` instead of the
/// full generic form.
pub type SharedState = Arc<AppState>;

/// Wrap the service in shared state ready for injection into the router.
pub fn build_state(prices: Arc<PriceService>) -> SharedState {
    Arc::new(AppState::new(prices))
}
