use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

const CONFIG_FILE: &str = "config/sensor-charts";
const ENV_PREFIX: &str = "SENSOR_CHARTS";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub sites: SiteSettings,
    pub refresh: RefreshSettings,
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub chart_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteSettings {
    pub suffixes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    pub interval_secs: u64,
}

impl RefreshSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

fn with_defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("storage.data_dir", "data")?
        .set_default("storage.chart_dir", "data")?
        .set_default("sites.suffixes", vec!["office", "factory"])?
        .set_default("refresh.interval_secs", 60_i64)?
        .set_default("chart.width", 1500_i64)?
        .set_default("chart.height", 2000_i64)?)
}

/// Defaults, then `config/sensor-charts.*` if present, then
/// `SENSOR_CHARTS__SECTION__KEY` environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = with_defaults()?
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("sites.suffixes")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
