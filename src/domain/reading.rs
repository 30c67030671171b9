// Sensor reading domain models
use chrono::NaiveTime;
use std::fmt;

/// The six metrics charted per site, in log-field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Pm25,
    Pm10,
    Temperature,
    Humidity,
    Tvoc,
    Co,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Pm25,
        Metric::Pm10,
        Metric::Temperature,
        Metric::Humidity,
        Metric::Tvoc,
        Metric::Co,
    ];

    /// Position of this metric inside the comma-separated numeric field.
    pub fn field_index(self) -> usize {
        11 + self.slot()
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Pm25 => "PM2.5",
            Metric::Pm10 => "PM10",
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Tvoc => "TVOC",
            Metric::Co => "CO",
        }
    }

    fn slot(self) -> usize {
        match self {
            Metric::Pm25 => 0,
            Metric::Pm10 => 1,
            Metric::Temperature => 2,
            Metric::Humidity => 3,
            Metric::Tvoc => 4,
            Metric::Co => 5,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One sample: a timestamp with a value (or gap) for every metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub time: NaiveTime,
    pub values: [Option<f64>; 6],
}

impl Reading {
    pub fn new(time: NaiveTime, values: [f64; 6]) -> Self {
        Self {
            time,
            values: values.map(Some),
        }
    }

    /// All-absent sample used to break plotted lines across an outage.
    pub fn gap(time: NaiveTime) -> Self {
        Self {
            time,
            values: [None; 6],
        }
    }
}

/// One site's day of samples. Every metric column stays index-aligned with
/// `timestamps`; the only way in is `push`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    timestamps: Vec<NaiveTime>,
    columns: [Vec<Option<f64>>; 6],
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, reading: Reading) {
        self.timestamps.push(reading.time);
        for (column, value) in self.columns.iter_mut().zip(reading.values) {
            column.push(value);
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveTime] {
        &self.timestamps
    }

    pub fn values(&self, metric: Metric) -> &[Option<f64>] {
        &self.columns[metric.slot()]
    }

    /// Largest present value across the given metrics.
    pub fn max_present(&self, metrics: &[Metric]) -> Option<f64> {
        metrics
            .iter()
            .flat_map(|m| self.values(*m).iter().flatten().copied())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_field_indices_follow_log_layout() {
        let indices: Vec<usize> = Metric::ALL.iter().map(|m| m.field_index()).collect();
        assert_eq!(indices, vec![11, 12, 13, 14, 15, 16]);
        assert_eq!(Metric::Pm25.to_string(), "PM2.5");
    }

    #[test]
    fn test_push_keeps_columns_aligned() {
        let mut series = Series::new();
        series.push(Reading::new(at(0, 0, 0), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        series.push(Reading::gap(at(0, 0, 1)));

        assert_eq!(series.len(), 2);
        for metric in Metric::ALL {
            assert_eq!(series.values(metric).len(), 2);
            assert_eq!(series.values(metric)[1], None);
        }
        assert_eq!(series.values(Metric::Co), &[Some(6.0), None]);
        assert_eq!(series.timestamps(), &[at(0, 0, 0), at(0, 0, 1)]);
    }

    #[test]
    fn test_max_present_skips_gaps() {
        let mut series = Series::new();
        series.push(Reading::new(at(1, 0, 0), [10.0, 40.0, 20.0, 50.0, 0.3, 1.2]));
        series.push(Reading::gap(at(1, 0, 1)));
        series.push(Reading::new(at(1, 10, 0), [15.0, 35.0, 21.0, 55.0, 2.7, 0.9]));

        assert_eq!(series.max_present(&[Metric::Co, Metric::Tvoc]), Some(2.7));
        assert_eq!(series.max_present(&[Metric::Pm25]), Some(15.0));

        let mut gaps = Series::new();
        gaps.push(Reading::gap(at(2, 0, 0)));
        assert_eq!(gaps.max_present(&[Metric::Co, Metric::Tvoc]), None);
    }
}
