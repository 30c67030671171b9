// Render service - Parses and charts every configured site for a day
use crate::application::chart_renderer::ChartRenderer;
use crate::application::chart_scaler::{scale, ScaleError};
use crate::application::log_parser::parse_lines;
use crate::application::site_repository::SiteRepository;
use crate::domain::chart::SiteDay;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SiteOutcome {
    Rendered { file_name: String },
    NoData,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteResult {
    pub suffix: String,
    #[serde(flatten)]
    pub outcome: SiteOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub date: NaiveDate,
    pub sites: Vec<SiteResult>,
}

impl RenderReport {
    pub fn rendered(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sites.iter().filter_map(|s| match &s.outcome {
            SiteOutcome::Rendered { file_name } => Some((s.suffix.as_str(), file_name.as_str())),
            _ => None,
        })
    }

    pub fn missing(&self) -> impl Iterator<Item = &SiteResult> {
        self.sites
            .iter()
            .filter(|s| !matches!(s.outcome, SiteOutcome::Rendered { .. }))
    }
}

/// The day whose logs are complete: yesterday in local time.
pub fn report_date() -> NaiveDate {
    let today = Local::now().date_naive();
    today.pred_opt().unwrap_or(today)
}

#[derive(Clone)]
pub struct RenderService {
    repository: Arc<dyn SiteRepository>,
    renderer: Arc<dyn ChartRenderer>,
    render_lock: Arc<Mutex<()>>,
    last_report: Arc<RwLock<Option<RenderReport>>>,
}

impl RenderService {
    pub fn new(repository: Arc<dyn SiteRepository>, renderer: Arc<dyn ChartRenderer>) -> Self {
        Self {
            repository,
            renderer,
            render_lock: Arc::new(Mutex::new(())),
            last_report: Arc::new(RwLock::new(None)),
        }
    }

    /// Renders one chart per suffix. Callers are serialized; a failing site is
    /// recorded and the remaining sites still render.
    pub async fn render_all(&self, date: NaiveDate, suffixes: &[String]) -> RenderReport {
        let _guard = self.render_lock.lock().await;

        let mut sites = Vec::with_capacity(suffixes.len());
        for suffix in suffixes {
            let day = SiteDay::new(date, suffix.clone());
            let outcome = match self.render_site(&day).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Failed to render {}: {:#}", day, e);
                    SiteOutcome::Failed {
                        reason: format!("{:#}", e),
                    }
                }
            };
            sites.push(SiteResult {
                suffix: suffix.clone(),
                outcome,
            });
        }

        let report = RenderReport { date, sites };
        *self.last_report.write().await = Some(report.clone());
        report
    }

    pub async fn last_report(&self) -> Option<RenderReport> {
        self.last_report.read().await.clone()
    }

    async fn render_site(&self, day: &SiteDay) -> anyhow::Result<SiteOutcome> {
        let Some(lines) = self.repository.read_log(day).await? else {
            tracing::info!("No log file for {}, skipping", day);
            return Ok(SiteOutcome::NoData);
        };

        let series = parse_lines(&lines);
        let layout = match scale(&series) {
            Ok(layout) => layout,
            Err(ScaleError::NoData) => {
                tracing::info!("No valid samples for {}", day);
                return Ok(SiteOutcome::NoData);
            }
        };

        let renderer = self.renderer.clone();
        let label = day.suffix.clone();
        let image = tokio::task::spawn_blocking(move || renderer.render(&series, &layout, &label))
            .await
            .context("render task panicked")??;

        let file_name = self.repository.store_chart(day, &image).await?;
        tracing::info!("Chart saved as {}", file_name);
        Ok(SiteOutcome::Rendered { file_name })
    }
}
