//! Axum router wiring.
//!
//! Exposes a single scrape route at the configured path; everything else is 404.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState, path: &str) -> Router {
    Router::new()
        .route(path, get(ops::metrics))
        .with_state(state)
}
