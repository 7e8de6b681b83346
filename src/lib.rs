//! Pricing service for cleaning-service proposals.
//!
//! Exposes the pricing engine as a library and as an Axum HTTP API.

pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;
pub mod routes;

use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::cache::AppCache;
use crate::error::AppError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api/pricing", pricing::router())
        .fallback(|| async { AppError::NotFound })
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
