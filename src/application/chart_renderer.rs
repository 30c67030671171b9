// Renderer trait - Draws a scaled Series into an image
use crate::domain::chart::{ChartImage, ChartLayout};
use crate::domain::reading::Series;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart backend error: {0}")]
    Backend(String),
}

/// Each call owns its drawing surface; implementations keep no figure state
/// between calls.
pub trait ChartRenderer: Send + Sync {
    fn render(
        &self,
        series: &Series,
        layout: &ChartLayout,
        label: &str,
    ) -> Result<ChartImage, RenderError>;
}
