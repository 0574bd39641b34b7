//! Data models for the air-quality query engine.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

// ---

/// One raw record as handed over by a row source: column name to cell value.
///
/// Column names are kept exactly as the source reports them; trimming happens
/// in the normalizer.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// The three measured quantities carried by every reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Temperature,
    Humidity,
    GasLevel,
}

impl Field {
    // ---
    pub const ALL: [Field; 3] = [Field::Temperature, Field::Humidity, Field::GasLevel];

    pub fn name(self) -> &'static str {
        // ---
        match self {
            Field::Temperature => "temperature",
            Field::Humidity => "humidity",
            Field::GasLevel => "gas_level",
        }
    }

    /// Display unit used in text replies.
    pub fn unit(self) -> &'static str {
        // ---
        match self {
            Field::Temperature => "°C",
            Field::Humidity => "%",
            Field::GasLevel => "ADC",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Validated sensor sample. All four fields are always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    // ---
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub humidity: f64,
    pub gas_level: f64,
}

impl Reading {
    // ---
    pub fn value(&self, field: Field) -> f64 {
        // ---
        match field {
            Field::Temperature => self.temperature,
            Field::Humidity => self.humidity,
            Field::GasLevel => self.gas_level,
        }
    }
}

/// Readings in source row order. Not sorted, not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries {
    // ---
    readings: Vec<Reading>,
}

impl TimeSeries {
    // ---
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    /// The most recently appended reading.
    pub fn last(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Values of one field across the series, in order.
    pub fn values(&self, field: Field) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(move |r| r.value(field))
    }

    pub fn as_slice(&self) -> &[Reading] {
        &self.readings
    }
}

impl FromIterator<Reading> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::NaiveDate;

    fn reading_at(hour: u32, temperature: f64) -> Reading {
        // ---
        Reading {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            temperature,
            humidity: 50.0,
            gas_level: 300.0,
        }
    }

    #[test]
    fn test_value_by_field() {
        // ---
        let r = reading_at(10, 21.5);
        assert_eq!(r.value(Field::Temperature), 21.5);
        assert_eq!(r.value(Field::Humidity), 50.0);
        assert_eq!(r.value(Field::GasLevel), 300.0);
    }

    #[test]
    fn test_last_is_last_appended_not_newest_timestamp() {
        // ---
        let series = TimeSeries::new(vec![reading_at(12, 1.0), reading_at(8, 2.0)]);
        assert_eq!(series.last().unwrap().temperature, 2.0);
    }

    #[test]
    fn test_duplicates_retained() {
        // ---
        let series: TimeSeries = vec![reading_at(9, 1.0), reading_at(9, 1.0)]
            .into_iter()
            .collect();
        assert_eq!(series.len(), 2);
        assert_eq!(series.values(Field::Temperature).sum::<f64>(), 2.0);
    }

    #[test]
    fn test_field_names_and_units() {
        // ---
        assert_eq!(Field::GasLevel.to_string(), "gas_level");
        assert_eq!(Field::Temperature.unit(), "°C");
        assert_eq!(
            serde_json::to_value(Field::GasLevel).unwrap(),
            serde_json::json!("gas_level")
        );
    }
}
