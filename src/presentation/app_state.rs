// Application state for HTTP handlers
use crate::application::render_service::RenderService;
use crate::application::site_repository::SiteRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub render_service: RenderService,
    pub repository: Arc<dyn SiteRepository>,
    pub suffixes: Arc<Vec<String>>,
}
