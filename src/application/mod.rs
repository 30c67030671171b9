// Application layer - Use cases and the ports they depend on
pub mod chart_renderer;
pub mod chart_scaler;
pub mod log_parser;
pub mod render_service;
pub mod site_repository;
