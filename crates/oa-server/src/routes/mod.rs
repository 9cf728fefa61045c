//! API route definitions and router builder.

pub mod chat;
pub mod classify;
pub mod farm_data;
pub mod health;
pub mod history;
pub mod predict;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/classify", post(classify::classify))
        .route("/predict", post(predict::predict))
        .route("/chat", post(chat::chat))
        .route("/explain", post(chat::explain))
        .route("/history", get(history::summary))
        .route("/farm-data/template", get(farm_data::template));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
