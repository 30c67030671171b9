// Chart scaler - Deterministic axis bounds for a site's day of readings
use crate::domain::chart::{round_up, AxisSpec, ChartLayout, DAY_END_SECS};
use crate::domain::reading::{Metric, Series};
use thiserror::Error;

const TIME_TICK_SECS: f64 = 2.0 * 3600.0;

const CO_TVOC_FLOOR: f64 = 2.0;
const CO_TVOC_STEP: f64 = 0.5;
const CO_TVOC_INTERVALS: usize = 10;

const PM_FLOOR: f64 = 100.0;
const PM_STEP: f64 = 5.0;
const PM_SMALL_INTERVAL: f64 = 10.0;

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("no data to plot")]
    NoData,
}

/// Time axis covering the whole day: a tick every two hours plus 23:59:59.
pub fn time_axis() -> AxisSpec {
    let mut ticks: Vec<f64> = (0..12).map(|i| i as f64 * TIME_TICK_SECS).collect();
    ticks.push(DAY_END_SECS);
    AxisSpec {
        min: 0.0,
        max: DAY_END_SECS,
        ticks,
    }
}

pub fn co_tvoc_axis(series: &Series) -> AxisSpec {
    let max = series
        .max_present(&[Metric::Co, Metric::Tvoc])
        .map_or(CO_TVOC_FLOOR, |v| v.max(CO_TVOC_FLOOR));
    let upper = round_up(max, CO_TVOC_STEP);
    AxisSpec::divided(0.0, upper, CO_TVOC_INTERVALS)
}

pub fn temperature_axis() -> AxisSpec {
    AxisSpec::stepped(0.0, 40.0, 5.0)
}

pub fn humidity_axis() -> AxisSpec {
    AxisSpec::stepped(0.0, 100.0, 10.0)
}

pub fn particulate_axis(series: &Series) -> AxisSpec {
    let max = series
        .max_present(&[Metric::Pm25, Metric::Pm10])
        .map_or(PM_FLOOR, |v| v.max(PM_FLOOR));
    let upper = round_up(max, PM_STEP);
    let interval = if upper <= PM_FLOOR {
        PM_SMALL_INTERVAL
    } else {
        round_up(upper / 10.0, PM_STEP)
    };
    AxisSpec::stepped(0.0, upper, interval)
}

/// Computes every axis for the three-panel chart of `series`.
pub fn scale(series: &Series) -> Result<ChartLayout, ScaleError> {
    if series.is_empty() {
        return Err(ScaleError::NoData);
    }

    Ok(ChartLayout {
        time: time_axis(),
        co_tvoc: co_tvoc_axis(series),
        temperature: temperature_axis(),
        humidity: humidity_axis(),
        particulates: particulate_axis(series),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::Reading;
    use chrono::NaiveTime;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn series_of(readings: &[[f64; 6]]) -> Series {
        let mut series = Series::new();
        for (i, values) in readings.iter().enumerate() {
            series.push(Reading::new(at(i as u32, 0), *values));
        }
        series
    }

    #[test]
    fn test_empty_series_has_no_data() {
        assert_eq!(scale(&Series::new()), Err(ScaleError::NoData));
    }

    #[test]
    fn test_all_gaps_fall_back_to_defaults() {
        let mut series = Series::new();
        series.push(Reading::gap(at(3, 0)));

        let layout = scale(&series).unwrap();
        assert_eq!(layout.co_tvoc.max, 2.5);
        assert_eq!(layout.co_tvoc.ticks.len(), 11);
        assert_eq!(layout.particulates.max, 105.0);
    }

    #[test]
    fn test_time_axis_spans_the_day() {
        let axis = time_axis();
        assert_eq!(axis.ticks.len(), 13);
        assert_eq!(axis.ticks[1], 7200.0);
        assert_eq!(axis.ticks[11], 22.0 * 3600.0);
        assert_eq!(axis.ticks[12], 86_399.0);
    }

    #[test]
    fn test_co_tvoc_axis_tracks_larger_metric() {
        // TVOC 3.2 beats CO 1.1
        let series = series_of(&[[0.0, 0.0, 20.0, 50.0, 3.2, 1.1]]);
        let axis = co_tvoc_axis(&series);

        assert_eq!(axis.max, 3.5);
        assert_eq!(axis.ticks.len(), 11);
        assert!((axis.interval().unwrap() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_co_tvoc_axis_never_below_floor() {
        let series = series_of(&[[0.0, 0.0, 20.0, 50.0, 0.2, 0.1]]);
        assert_eq!(co_tvoc_axis(&series).max, 2.5);
    }

    #[test]
    fn test_fixed_climate_axes() {
        let temperature = temperature_axis();
        assert_eq!(temperature.max, 40.0);
        assert_eq!(temperature.interval(), Some(5.0));

        let humidity = humidity_axis();
        assert_eq!(humidity.max, 100.0);
        assert_eq!(humidity.ticks.len(), 11);
    }

    #[test]
    fn test_particulate_axis_for_quiet_day() {
        let series = series_of(&[[12.0, 35.0, 20.0, 50.0, 0.2, 0.1]]);
        let axis = particulate_axis(&series);

        // 100 floor rounds up to 105, so the tick interval is round_up(10.5, 5)
        assert_eq!(axis.max, 105.0);
        assert_eq!(axis.interval(), Some(15.0));
        assert_eq!(axis.ticks.last(), Some(&105.0));
    }

    #[test]
    fn test_particulate_axis_for_polluted_day() {
        let series = series_of(&[[180.0, 233.0, 20.0, 50.0, 0.2, 0.1]]);
        let axis = particulate_axis(&series);

        assert_eq!(axis.max, 235.0);
        assert_eq!(axis.interval(), Some(25.0));
        assert_eq!(axis.ticks.len(), 10);
        assert_eq!(axis.ticks.last(), Some(&225.0));
    }
}
