// Log parser - Turns raw daily log lines into a gap-aware Series
use crate::domain::reading::{Metric, Reading, Series};
use chrono::{Duration, NaiveTime, Timelike};
use thiserror::Error;

/// Minimum number of comma-separated numerics a usable line carries.
pub const MIN_NUMERIC_FIELDS: usize = 17;

/// Samples further apart than this get a gap marker between them.
pub const MAX_SAMPLE_GAP_SECS: i64 = 300;

const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Error, PartialEq)]
pub enum ParseLineError {
    #[error("expected at least 3 fields, found {0}")]
    TooFewFields(usize),
    #[error("expected at least 17 readings, found {0}")]
    TooFewReadings(usize),
    #[error("invalid time '{value}': {source}")]
    InvalidTime {
        value: String,
        source: chrono::ParseError,
    },
    #[error("invalid time '{0}': second out of range")]
    LeapSecond(String),
    #[error("invalid {metric} value '{value}'")]
    InvalidValue { metric: Metric, value: String },
}

/// Parses one log line into a full reading.
pub fn parse_line(line: &str) -> Result<Reading, ParseLineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(ParseLineError::TooFewFields(fields.len()));
    }

    let readings: Vec<&str> = fields[2].split(',').collect();
    if readings.len() < MIN_NUMERIC_FIELDS {
        return Err(ParseLineError::TooFewReadings(readings.len()));
    }

    let time = NaiveTime::parse_from_str(fields[1], TIME_FORMAT).map_err(|source| {
        ParseLineError::InvalidTime {
            value: fields[1].to_string(),
            source,
        }
    })?;
    // chrono reads ":60" as a leap second; log clocks never emit one
    if time.nanosecond() >= 1_000_000_000 {
        return Err(ParseLineError::LeapSecond(fields[1].to_string()));
    }

    let mut values = [0.0; 6];
    for (slot, metric) in values.iter_mut().zip(Metric::ALL) {
        let raw = readings[metric.field_index()];
        *slot = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseLineError::InvalidValue {
                metric,
                value: raw.to_string(),
            })?;
    }

    Ok(Reading::new(time, values))
}

/// Builds a Series from a day's lines, skipping anything malformed.
///
/// When two consecutive good samples are more than five minutes apart, an
/// all-absent sample one second after the earlier one is inserted so the
/// plotted lines break across the outage.
pub fn parse_lines<I, S>(lines: I) -> Series
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut series = Series::new();
    let mut previous: Option<NaiveTime> = None;
    let mut skipped = 0usize;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let reading = match parse_line(line) {
            Ok(reading) => reading,
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping line {}: {} ({:?})", index + 1, e, line.trim_end());
                continue;
            }
        };

        if let Some(prev) = previous {
            if (reading.time - prev).num_seconds() > MAX_SAMPLE_GAP_SECS {
                series.push(Reading::gap(prev + Duration::seconds(1)));
            }
        }

        previous = Some(reading.time);
        series.push(reading);
    }

    tracing::debug!("Parsed {} samples, skipped {} lines", series.len(), skipped);
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(time: &str, pm25: f64, co: f64) -> String {
        let mut values: Vec<String> = (0..17).map(|i| format!("{}", i as f64 * 0.5)).collect();
        values[11] = pm25.to_string();
        values[16] = co.to_string();
        format!("2024-05-01 {} {}", time, values.join(","))
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_extracts_fields_11_to_16_in_order() {
        let raw = "dev 08:15:00 0,1,2,3,4,5,6,7,8,9,10,12.5,30.1,24.6,55.0,0.42,1.7,99";
        let reading = parse_line(raw).unwrap();

        assert_eq!(reading.time, at(8, 15, 0));
        assert_eq!(
            reading.values,
            [Some(12.5), Some(30.1), Some(24.6), Some(55.0), Some(0.42), Some(1.7)]
        );
    }

    #[test]
    fn test_rejects_short_lines() {
        assert_eq!(parse_line("only two"), Err(ParseLineError::TooFewFields(2)));
        assert_eq!(
            parse_line("d 10:00:00 1,2,3"),
            Err(ParseLineError::TooFewReadings(3))
        );
        // 16 entries is one short
        let sixteen = (0..16).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
        assert_eq!(
            parse_line(&format!("d 10:00:00 {}", sixteen)),
            Err(ParseLineError::TooFewReadings(16))
        );
    }

    #[test]
    fn test_rejects_bad_time_and_values() {
        let bad_time = line("10:00", 1.0, 1.0);
        assert!(matches!(
            parse_line(&bad_time),
            Err(ParseLineError::InvalidTime { .. })
        ));

        let bad_value = "d 10:00:00 0,1,2,3,4,5,6,7,8,9,10,11,12,13,x,15,16";
        assert_eq!(
            parse_line(bad_value),
            Err(ParseLineError::InvalidValue {
                metric: Metric::Humidity,
                value: "x".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_second_sixty() {
        let raw = "d 10:00:60 0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16";
        assert_eq!(
            parse_line(raw),
            Err(ParseLineError::LeapSecond("10:00:60".to_string()))
        );
        assert!(parse_line("d 10:00:59 0,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16").is_ok());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        for raw in ["inf", "-inf", "NaN", "infinity"] {
            let text = format!("d 10:00:00 0,1,2,3,4,5,6,7,8,9,10,{},12,13,14,15,16", raw);
            assert_eq!(
                parse_line(&text),
                Err(ParseLineError::InvalidValue {
                    metric: Metric::Pm25,
                    value: raw.to_string()
                })
            );
        }

        // the bad line is dropped and the axis stays finite
        let lines = vec![
            line("10:00:00", 20.0, 0.5),
            "d 10:01:00 0,1,2,3,4,5,6,7,8,9,10,inf,12,13,14,15,inf".to_string(),
        ];
        let series = parse_lines(&lines);
        assert_eq!(series.len(), 1);
        assert_eq!(series.max_present(&[Metric::Pm25, Metric::Co]), Some(20.0));
    }

    #[test]
    fn test_inserts_one_gap_marker_after_long_outage() {
        let lines = vec![line("10:00:00", 1.0, 0.1), line("10:05:01", 2.0, 0.2)];
        let series = parse_lines(&lines);

        assert_eq!(series.len(), 3);
        assert_eq!(series.timestamps()[1], at(10, 0, 1));
        assert!(Metric::ALL.iter().all(|m| series.values(*m)[1].is_none()));
        assert_eq!(series.values(Metric::Pm25), &[Some(1.0), None, Some(2.0)]);
    }

    #[test]
    fn test_no_gap_marker_at_exactly_five_minutes() {
        let lines = vec![line("10:00:00", 1.0, 0.1), line("10:05:00", 2.0, 0.2)];
        let series = parse_lines(&lines);

        assert_eq!(series.len(), 2);
        assert!(series.values(Metric::Co).iter().all(Option::is_some));
    }

    #[test]
    fn test_skips_malformed_lines_without_stopping() {
        let lines = vec![
            line("09:00:00", 5.0, 0.5),
            "garbage".to_string(),
            line("9:0x:00", 6.0, 0.6),
            "d 09:01:00 1,2,3".to_string(),
            line("09:02:00", 7.0, 0.7),
            String::new(),
        ];
        let series = parse_lines(&lines);

        assert_eq!(series.len(), 2);
        assert_eq!(series.timestamps(), &[at(9, 0, 0), at(9, 2, 0)]);
        assert_eq!(series.values(Metric::Co), &[Some(0.5), Some(0.7)]);
    }

    #[test]
    fn test_skipped_line_does_not_reset_gap_tracking() {
        let lines = vec![
            line("12:00:00", 1.0, 0.1),
            "d 12:03:00 broken".to_string(),
            line("12:10:00", 2.0, 0.2),
        ];
        let series = parse_lines(&lines);

        assert_eq!(series.len(), 3);
        assert_eq!(series.timestamps()[1], at(12, 0, 1));
    }

    #[test]
    fn test_three_lines_with_six_minute_gap() {
        let lines = vec![
            line("07:00:00", 1.0, 0.1),
            line("07:04:00", 2.0, 0.2),
            line("07:10:00", 3.0, 0.3),
        ];
        let series = parse_lines(&lines);

        assert_eq!(series.len(), 4);
        assert_eq!(
            series.timestamps(),
            &[at(7, 0, 0), at(7, 4, 0), at(7, 4, 1), at(7, 10, 0)]
        );
    }

    #[test]
    fn test_empty_input_gives_empty_series() {
        let series = parse_lines(Vec::<String>::new());
        assert!(series.is_empty());
    }
}
