// Main entry point - Dependency injection, refresh task and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tracing_subscriber::EnvFilter;

use crate::application::render_service::{report_date, RenderService};
use crate::application::site_repository::SiteRepository;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::file_repository::FileRepository;
use crate::infrastructure::svg_renderer::SvgChartRenderer;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

/// Re-renders every site on a fixed cadence. Runs for the life of the process.
fn spawn_refresh_task(service: RenderService, suffixes: Arc<Vec<String>>, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let report = service.render_all(report_date(), &suffixes).await;
            tracing::info!(
                "Refreshed charts for {}: {} rendered, {} without data",
                report.date,
                report.rendered().count(),
                report.missing().count()
            );
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository and renderer (infrastructure layer)
    let repository: Arc<dyn SiteRepository> = Arc::new(FileRepository::new(
        config.storage.data_dir.clone(),
        config.storage.chart_dir.clone(),
    ));
    let renderer = Arc::new(SvgChartRenderer::new(config.chart.width, config.chart.height));

    // Create services (application layer)
    let render_service = RenderService::new(repository.clone(), renderer);
    let suffixes = Arc::new(config.sites.suffixes.clone());
    spawn_refresh_task(render_service.clone(), suffixes.clone(), config.refresh.interval());

    let state = Arc::new(AppState {
        render_service,
        repository,
        suffixes,
    });

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting sensor-charts service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
