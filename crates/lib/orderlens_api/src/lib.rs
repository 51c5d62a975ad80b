//! # orderlens_api
//!
//! HTTP API library for OrderLens.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use http::{HeaderValue, Method};
use orderlens_core::llm::ChatModel;
use orderlens_core::summary::OrderSummary;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::{ANY_ORIGIN, ApiConfig};
use crate::handlers::{chat, convert, health};

/// Shared application state passed to all handlers.
///
/// The order summary is computed once at startup and never changes.
#[derive(Clone)]
pub struct AppState {
    /// Rendered order statistics.
    pub summary: Arc<OrderSummary>,
    /// Language model used by the chat endpoint.
    pub model: Arc<dyn ChatModel>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_allow_origin);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/chat", post(chat::chat_handler))
        .route("/csv-to-json/", get(convert::csv_to_json_handler))
        .route("/csv-to-json", get(convert::csv_to_json_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for a single origin with credentials, or for any origin without
/// credentials when `origin` is `*`.
///
/// An origin that is not a valid header value allows no cross-origin requests.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request());

    if origin == ANY_ORIGIN {
        return layer.allow_origin(AllowOrigin::any());
    }

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin).allow_credentials(true),
        Err(_) => {
            warn!(origin, "invalid CORS origin, cross-origin requests disabled");
            layer
        }
    }
}
