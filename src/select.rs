//! Calendar-date selection over a [`TimeSeries`].

use chrono::NaiveDate;
use crate::error::{QueryError, Result};
use crate::models::TimeSeries;

// ---

/// Readings recorded on one calendar date. May be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySelection {
    // ---
    pub date: NaiveDate,
    pub readings: TimeSeries,
}

/// Keep the readings whose date component equals `date`, in series order.
/// Time of day is ignored.
pub fn select_date(series: &TimeSeries, date: NaiveDate) -> DaySelection {
    // ---
    let readings = series
        .iter()
        .filter(|r| r.timestamp.date() == date)
        .copied()
        .collect();

    DaySelection { date, readings }
}

/// Parse a user-supplied date argument. Only `YYYY-MM-DD` is accepted.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    // ---
    let bytes = text.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(invalid_date());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| invalid_date())
}

fn invalid_date() -> QueryError {
    QueryError::usage("Invalid format. Use: YYYY-MM-DD")
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::Reading;

    fn reading(day: u32, hour: u32) -> Reading {
        // ---
        Reading {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            temperature: day as f64,
            humidity: hour as f64,
            gas_level: 0.0,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_selects_by_date_ignoring_time() {
        // ---
        let series = TimeSeries::new(vec![reading(1, 0), reading(2, 9), reading(1, 23)]);
        let day = select_date(&series, ymd(2024, 1, 1));

        assert_eq!(day.date, ymd(2024, 1, 1));
        assert_eq!(day.readings.len(), 2);
        assert!(day.readings.iter().all(|r| r.temperature == 1.0));
        // series order kept
        assert_eq!(day.readings.as_slice()[0].humidity, 0.0);
        assert_eq!(day.readings.as_slice()[1].humidity, 23.0);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        // ---
        let series = TimeSeries::new(vec![reading(1, 10)]);
        assert!(select_date(&series, ymd(2024, 1, 3)).readings.is_empty());
        assert!(select_date(&TimeSeries::default(), ymd(2024, 1, 3))
            .readings
            .is_empty());
    }

    #[test]
    fn test_two_dates_union_recovers_series() {
        // ---
        let series = TimeSeries::new(vec![
            reading(1, 8),
            reading(2, 8),
            reading(1, 9),
            reading(2, 9),
            reading(2, 9),
        ]);
        let d1 = select_date(&series, ymd(2024, 1, 1)).readings;
        let d2 = select_date(&series, ymd(2024, 1, 2)).readings;

        assert_eq!(d1.len() + d2.len(), series.len());
        for r in &series {
            let in_d1 = d1.iter().filter(|x| *x == r).count();
            let in_d2 = d2.iter().filter(|x| *x == r).count();
            let in_series = series.iter().filter(|x| *x == r).count();
            assert_eq!(in_d1 + in_d2, in_series);
        }
    }

    #[test]
    fn test_parse_date_accepts_strict_shape() {
        // ---
        assert_eq!(parse_date("2024-01-01").unwrap(), ymd(2024, 1, 1));
        assert_eq!(parse_date("2024-02-29").unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn test_parse_date_rejects_other_shapes() {
        // ---
        for text in [
            "",
            "2024-1-1",
            "2024/01/01",
            "01-01-2024",
            "2024-01-01 ",
            "2024-01-32",
            "2023-02-29",
            "+024-01-01",
            "today",
        ] {
            let err = parse_date(text).unwrap_err();
            assert!(
                matches!(err, QueryError::Usage(_)),
                "expected usage error for {text:?}"
            );
        }
    }
}
