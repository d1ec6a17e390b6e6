//! Quoting service for custom concrete swimming pool construction.
//!
//! Exposes a JSON API that turns pool dimensions into a full quote:
//! basic dimensions, earthworks, concrete and formwork quantities, and
//! costs scaled from one of the builtin commercial-proposal profiles.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod quote;

pub use error::{AppError, Result};

/// Shared application state. The profile store is immutable after
/// startup, so handlers share it behind an `Arc` with no locking.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<quote::ProfileStore>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(quote::ProfileStore::builtin()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the application router with all quoting routes and middleware.
pub fn app(state: AppState) -> axum::Router {
    quote::router(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive())
}
