//! # routes::health

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use crate::state::SharedState;

// ─── GET /health ──────────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let stats = state.prices.stats();
    let uptime_secs = (Utc::now() - state.started_at).num_seconds();

    Json(json!({
        "ok":          true,
        "uptime_secs": uptime_secs,
        "ticks":       stats,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SpreadAdjuster, TickParser};
    use crate::service::PriceService;
    use crate::state::build_state;
    use crate::store::InMemoryQuoteStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_reports_counters() {
        let service = Arc::new(PriceService::new(
            TickParser::default(),
            SpreadAdjuster::default(),
            Arc::new(InMemoryQuoteStore::new()),
        ));
        service.ingest("1,EUR/USD,1.19,1.245,01-06-2020 12:01:01:001").await.unwrap();
        let _ = service.ingest("bad").await;

        let resp = health_check(State(build_state(service))).await.into_response();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["ok"], true);
        assert_eq!(json["ticks"]["received"], 2);
        assert_eq!(json["ticks"]["stored"], 1);
        assert_eq!(json["ticks"]["rejected"], 1);
    }
}
