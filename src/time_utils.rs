use chrono::{DateTime, Datelike, NaiveDate};

use crate::domain::timeline::value_objects::TimeWindow;

const MAX_TICKS: usize = 240;

/// Parse a `YYYY-MM-DD` claim date into UTC-midnight milliseconds.
pub fn parse_claim_date(date: &str) -> Option<f64> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let midnight = day.and_hms_opt(0, 0, 0)?.and_utc();
    Some(midnight.timestamp_millis() as f64)
}

fn to_date(timestamp: f64) -> Option<NaiveDate> {
    if !timestamp.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(timestamp as i64).map(|dt| dt.date_naive())
}

/// `March 15, 2016`
pub fn format_claim_date(timestamp: f64) -> String {
    to_date(timestamp)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_default()
}

/// Format an axis label according to zoom level (UTC).
///
/// - `zoom >= 4.0` -> `Mar 2016`
/// - `1.5 <= zoom < 4.0` -> `Q1 2016`
/// - `zoom < 1.5` -> `2016`
pub fn format_time_label(timestamp: f64, zoom: f64) -> String {
    let Some(date) = to_date(timestamp) else {
        return String::new();
    };
    if zoom >= 4.0 {
        date.format("%b %Y").to_string()
    } else if zoom >= 1.5 {
        format!("Q{} {}", date.month0() / 3 + 1, date.year())
    } else {
        date.year().to_string()
    }
}

/// Tick timestamps inside `window`, stepping by the label granularity for `zoom`.
pub fn axis_ticks(window: TimeWindow, zoom: f64) -> Vec<f64> {
    let months_per_tick = if zoom >= 4.0 {
        1
    } else if zoom >= 1.5 {
        3
    } else {
        12
    };
    let (Some(start), Some(_)) = (to_date(window.start), to_date(window.end)) else {
        return Vec::new();
    };
    let first_month = (start.month0() / months_per_tick) * months_per_tick;
    let mut year = start.year();
    let mut month0 = first_month;
    let mut ticks = Vec::new();
    while ticks.len() < MAX_TICKS {
        let Some(tick) = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp_millis() as f64)
        else {
            break;
        };
        if tick > window.end {
            break;
        }
        if tick >= window.start {
            ticks.push(tick);
        }
        month0 += months_per_tick;
        if month0 >= 12 {
            month0 -= 12;
            year += 1;
        }
    }
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_labels_by_zoom() {
        let ts = parse_claim_date("2016-03-15").unwrap();
        assert_eq!(format_time_label(ts, 5.0), "Mar 2016");
        assert_eq!(format_time_label(ts, 2.0), "Q1 2016");
        assert_eq!(format_time_label(ts, 0.5), "2016");
        assert_eq!(format_claim_date(ts), "March 15, 2016");
    }

    #[test]
    fn yearly_ticks_at_low_zoom() {
        let window = TimeWindow {
            start: parse_claim_date("2014-06-01").unwrap(),
            end: parse_claim_date("2017-02-01").unwrap(),
        };
        let labels: Vec<String> =
            axis_ticks(window, 1.0).into_iter().map(|t| format_time_label(t, 1.0)).collect();
        assert_eq!(labels, vec!["2015", "2016", "2017"]);
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_claim_date("2016-13-01").is_none());
        assert!(parse_claim_date("yesterday").is_none());
    }
}
