// Chart domain models
use chrono::NaiveDate;
use std::fmt;

/// Seconds from midnight to 23:59:59, the right edge of every time axis.
pub const DAY_END_SECS: f64 = 86_399.0;

/// Rounds `value` up to the next multiple of `step`.
///
/// An exact multiple still moves up a full step: `round_up(10.0, 0.5)` is `10.5`.
/// Existing charts were scaled this way, so it is kept.
pub fn round_up(value: f64, step: f64) -> f64 {
    (value / step + 1.0).floor() * step
}

/// Closed axis range with explicit tick positions.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
}

impl AxisSpec {
    /// Ticks at `min`, `min + step`, ... up to and including `max`.
    pub fn stepped(min: f64, max: f64, step: f64) -> Self {
        let count = ((max - min) / step + 1e-9).floor() as usize;
        let ticks = (0..=count).map(|i| min + i as f64 * step).collect();
        Self { min, max, ticks }
    }

    /// `intervals` equal divisions of `min..=max`.
    pub fn divided(min: f64, max: f64, intervals: usize) -> Self {
        let step = (max - min) / intervals as f64;
        let ticks = (0..=intervals).map(|i| min + i as f64 * step).collect();
        Self { min, max, ticks }
    }

    pub fn interval(&self) -> Option<f64> {
        match self.ticks.as_slice() {
            [first, second, ..] => Some(second - first),
            _ => None,
        }
    }
}

/// Axis parameters for the three stacked panels of a site chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub time: AxisSpec,
    pub co_tvoc: AxisSpec,
    pub temperature: AxisSpec,
    pub humidity: AxisSpec,
    pub particulates: AxisSpec,
}

/// Identifies one site's log and chart for one day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteDay {
    pub date: NaiveDate,
    pub suffix: String,
}

impl SiteDay {
    pub fn new(date: NaiveDate, suffix: impl Into<String>) -> Self {
        Self {
            date,
            suffix: suffix.into(),
        }
    }

    /// `2024-05-01-office`
    pub fn stem(&self) -> String {
        format!("{}-{}", self.date.format("%Y-%m-%d"), self.suffix)
    }

    pub fn log_file_name(&self) -> String {
        format!("{}.txt", self.stem())
    }

    pub fn chart_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.stem(), extension)
    }
}

impl fmt::Display for SiteDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stem())
    }
}

/// Rendered chart bytes plus the extension they should be stored under.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}
