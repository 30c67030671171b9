// HTTP request handlers
use crate::application::render_service::{report_date, RenderReport};
use crate::presentation::app_state::AppState;
use crate::presentation::listing::render_listing;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;

fn content_type(file_name: &str) -> &'static str {
    match file_name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Browsers ask for this on every page load; there is no icon to serve.
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Listing page for yesterday's charts
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let report = state.render_service.last_report().await;
    Html(render_listing(report_date(), report.as_ref()))
}

/// Serve a stored chart image
pub async fn chart_image(
    Path(file_name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.repository.load_chart(&file_name).await {
        Ok(Some(bytes)) => (
            [(header::CONTENT_TYPE, content_type(&file_name))],
            bytes,
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Error loading chart {}: {:#}", file_name, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Re-render every site for yesterday right away
pub async fn refresh(State(state): State<Arc<AppState>>) -> Json<RenderReport> {
    let report = state
        .render_service
        .render_all(report_date(), &state.suffixes)
        .await;
    Json(report)
}
