//! HTTP surface: read access to stored quotes, raw tick submission, health.

pub mod health;
pub mod price;

use axum::{
    routing::get,
    Router,
};

use crate::state::SharedState;

/// Build the application router (without middleware layers).
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/price",              get(price::get_all_prices).post(price::post_tick))
        .route("/price/:instrument",  get(price::get_price_by_instrument))
        .route("/health",             get(health::health_check))
        .with_state(state)
}
