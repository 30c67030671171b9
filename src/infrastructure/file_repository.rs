// Filesystem repository implementation
use crate::application::site_repository::SiteRepository;
use crate::domain::chart::{ChartImage, SiteDay};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Only rendered charts are served; logs may share the directory.
const CHART_EXTENSION: &str = "svg";

#[derive(Debug, Clone)]
pub struct FileRepository {
    data_dir: PathBuf,
    chart_dir: PathBuf,
}

impl FileRepository {
    pub fn new(data_dir: PathBuf, chart_dir: PathBuf) -> Self {
        Self {
            data_dir,
            chart_dir,
        }
    }

    /// Accepts only chart files directly inside the chart directory.
    fn is_chart_file_name(name: &str) -> bool {
        !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(['/', '\\'])
            && Path::new(name).extension().is_some_and(|ext| ext == CHART_EXTENSION)
    }
}

#[async_trait]
impl SiteRepository for FileRepository {
    async fn read_log(&self, day: &SiteDay) -> Result<Option<Vec<String>>> {
        let path = self.data_dir.join(day.log_file_name());
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("File {} does not exist", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        // Loggers occasionally leave stray bytes; bad lines get dropped by the parser.
        let text = String::from_utf8_lossy(&bytes);
        Ok(Some(text.lines().map(str::to_string).collect()))
    }

    async fn store_chart(&self, day: &SiteDay, image: &ChartImage) -> Result<String> {
        tokio::fs::create_dir_all(&self.chart_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.chart_dir.display()))?;

        let file_name = day.chart_file_name(image.extension);
        let path = self.chart_dir.join(&file_name);
        tokio::fs::write(&path, &image.bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(file_name)
    }

    async fn load_chart(&self, file_name: &str) -> Result<Option<Vec<u8>>> {
        if !Self::is_chart_file_name(file_name) {
            return Ok(None);
        }

        let path = self.chart_dir.join(file_name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}
