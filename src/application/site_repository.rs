// Repository trait for site log and chart storage
use crate::domain::chart::{ChartImage, SiteDay};
use async_trait::async_trait;

#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Read the raw log lines for a site's day. `None` when no log exists.
    async fn read_log(&self, day: &SiteDay) -> anyhow::Result<Option<Vec<String>>>;

    /// Persist a rendered chart, returning the file name it is served under.
    async fn store_chart(&self, day: &SiteDay, image: &ChartImage) -> anyhow::Result<String>;

    /// Load a previously stored chart by file name.
    async fn load_chart(&self, file_name: &str) -> anyhow::Result<Option<Vec<u8>>>;
}
