use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::api::{handle_reservation_webhook, AppState};
use crate::handlers::health::health_check;

// Requests run to completion: a webhook cut short after an insert would lose the new event id
pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handle_reservation_webhook))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
