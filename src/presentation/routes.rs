// Router assembly
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{chart_image, favicon, health_check, index, refresh};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(health_check))
        .route("/favicon.ico", get(favicon))
        .route("/charts/:file", get(chart_image))
        .route("/refresh", post(refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
