//! # routes::price
//!
//! Read API over the quote store, plus raw tick submission.
//!
//! ## Endpoints
//!
//! | Method | Path                  | Description                                     |
//! |--------|-----------------------|-------------------------------------------------|
//! | GET    | `/price`              | Every stored quote                              |
//! | GET    | `/price/{instrument}` | One quote; `GBP-USD` is looked up as `GBP/USD`  |
//! | POST   | `/price`              | `text/plain` raw tick, run through the pipeline |

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::{Quote, QuoteView},
    service::IngestOutcome,
    state::SharedState,
};

/// Instrument names contain `/`, which cannot travel inside a single path
/// segment, so clients send `-` in its place.
pub fn instrument_from_path(segment: &str) -> String {
    segment.replace('-', "/")
}

// ─── GET /price ───────────────────────────────────────────────────────────────

pub async fn get_all_prices(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Quote>>, AppError> {
    Ok(Json(state.prices.all().await?))
}

// ─── GET /price/{instrument} ──────────────────────────────────────────────────

/// Unknown instruments answer `200` with an all-`null` body.
pub async fn get_price_by_instrument(
    State(state): State<SharedState>,
    Path(instrument): Path<String>,
) -> Result<Json<QuoteView>, AppError> {
    let instrument = instrument_from_path(&instrument);
    let quote = state.prices.by_instrument(&instrument).await?;
    Ok(Json(QuoteView::from(quote)))
}

// ─── POST /price ──────────────────────────────────────────────────────────────

pub async fn post_tick(
    State(state): State<SharedState>,
    raw: String,
) -> Result<impl IntoResponse, AppError> {
    let body = match state.prices.ingest(raw.trim_end()).await? {
        IngestOutcome::Stored(quote) => json!({
            "ok":     true,
            "action": "STORED",
            "quote":  quote,
        }),
        IngestOutcome::Stale => json!({
            "ok":     true,
            "action": "STALE",
        }),
    };

    Ok(Json(body))
}
