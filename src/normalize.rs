//! Row normalizer: raw records in, clean [`TimeSeries`] out.
//!
//! A row either yields a complete [`Reading`] or is dropped whole. Nothing
//! here returns an error; bad input only makes the series shorter.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, trace};

use crate::models::{RawRow, Reading, TimeSeries};

// ---

/// Accepted timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Column names of the source sheet. Compared after trimming both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    // ---
    pub timestamp: String,
    pub temperature: String,
    pub humidity: String,
    pub gas_level: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        // ---
        Self {
            timestamp: "Fecha y Hora".to_string(),
            temperature: "Temperatura (°C)".to_string(),
            humidity: "Humedad (%)".to_string(),
            gas_level: "Gas (ADC)".to_string(),
        }
    }
}

/// Turn raw rows into a time series, keeping source order.
pub fn normalize(rows: &[RawRow], columns: &ColumnNames) -> TimeSeries {
    // ---
    let series: TimeSeries = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let reading = parse_row(row, columns);
            if reading.is_none() {
                trace!(index, "dropping invalid row");
            }
            reading
        })
        .collect();

    debug!(
        total = rows.len(),
        kept = series.len(),
        dropped = rows.len() - series.len(),
        "normalized raw rows"
    );
    series
}

/// Validate one row. `None` if any of the four columns is missing or bad.
fn parse_row(row: &RawRow, columns: &ColumnNames) -> Option<Reading> {
    // ---
    let cells: HashMap<&str, &Value> = row.iter().map(|(k, v)| (k.trim(), v)).collect();
    let cell = |name: &str| cells.get(name.trim()).copied();

    Some(Reading {
        timestamp: parse_timestamp(cell(columns.timestamp.as_str())?)?,
        temperature: parse_number(cell(columns.temperature.as_str())?)?,
        humidity: parse_number(cell(columns.humidity.as_str())?)?,
        gas_level: parse_number(cell(columns.gas_level.as_str())?)?,
    })
}

fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    // ---
    let text = value.as_str()?.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

fn parse_number(value: &Value) -> Option<f64> {
    // ---
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use serde_json::json;

    fn raw(ts: Value, t: Value, h: Value, g: Value) -> RawRow {
        // ---
        let value = json!({
            "Fecha y Hora": ts,
            "Temperatura (°C)": t,
            "Humedad (%)": h,
            "Gas (ADC)": g,
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn scenario_rows() -> Vec<RawRow> {
        // ---
        vec![
            raw(json!("2024-01-01 10:00"), json!("20.5"), json!("55"), json!("300")),
            raw(json!("2024-01-01 12:00"), json!("22.0"), json!("abc"), json!("310")),
            raw(json!("2024-01-02 09:00"), json!("19.0"), json!("60"), json!("290")),
        ]
    }

    #[test]
    fn test_scenario_drops_bad_humidity_row() {
        // ---
        let series = normalize(&scenario_rows(), &ColumnNames::default());
        assert_eq!(series.len(), 2);

        let first = series.as_slice()[0];
        assert_eq!(first.temperature, 20.5);
        assert_eq!(first.humidity, 55.0);
        assert_eq!(first.gas_level, 300.0);
        assert_eq!(first.timestamp.hour(), 10);

        let second = series.as_slice()[1];
        assert_eq!(
            second.timestamp.date(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_each_bad_field_drops_only_its_row() {
        // ---
        let good = || raw(json!("2024-01-01 10:00"), json!(1), json!(2), json!(3));
        let bad = [
            raw(json!("yesterday"), json!(1), json!(2), json!(3)),
            raw(json!("2024-01-01 10:00"), json!(""), json!(2), json!(3)),
            raw(json!("2024-01-01 10:00"), json!(1), json!(null), json!(3)),
            raw(json!("2024-01-01 10:00"), json!(1), json!(2), json!("NaN")),
            raw(json!("2024-13-01 10:00"), json!(1), json!(2), json!(3)),
            raw(json!("2024-01-01 10:00"), json!(true), json!(2), json!(3)),
        ];

        for bad_row in bad {
            let rows = vec![good(), bad_row.clone(), good()];
            let series = normalize(&rows, &ColumnNames::default());
            assert_eq!(series.len(), 2, "row should be dropped alone: {bad_row:?}");
        }
    }

    #[test]
    fn test_missing_column_drops_row() {
        // ---
        let mut row = raw(json!("2024-01-01 10:00"), json!(1), json!(2), json!(3));
        row.remove("Gas (ADC)");
        assert!(normalize(&[row], &ColumnNames::default()).is_empty());
    }

    #[test]
    fn test_column_names_are_trimmed() {
        // ---
        let value = json!({
            "  Fecha y Hora ": "2024-01-01 10:00:30",
            "Temperatura (°C)  ": " 20.5 ",
            " Humedad (%)": 55,
            "Gas (ADC)": 300.0,
        });
        let Value::Object(row) = value else { unreachable!() };

        let series = normalize(&[row], &ColumnNames::default());
        assert_eq!(series.len(), 1);
        assert_eq!(series.as_slice()[0].temperature, 20.5);
        assert_eq!(series.as_slice()[0].timestamp.second(), 30);
    }

    #[test]
    fn test_iso_timestamp_accepted() {
        // ---
        let row = raw(json!("2024-01-01T10:00:00"), json!(1), json!(2), json!(3));
        assert_eq!(normalize(&[row], &ColumnNames::default()).len(), 1);
    }

    #[test]
    fn test_custom_columns() {
        // ---
        let columns = ColumnNames {
            timestamp: "ts".into(),
            temperature: "t".into(),
            humidity: "h".into(),
            gas_level: "g".into(),
        };
        let Value::Object(row) = json!({"ts": "2024-01-01 10:00", "t": "1", "h": "2", "g": "3"})
        else {
            unreachable!()
        };
        assert_eq!(normalize(&[row], &columns).len(), 1);
    }

    #[test]
    fn test_empty_input_yields_empty_series() {
        // ---
        assert!(normalize(&[], &ColumnNames::default()).is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        // ---
        let rows = scenario_rows();
        let columns = ColumnNames::default();
        assert_eq!(normalize(&rows, &columns), normalize(&rows, &columns));
    }
}
