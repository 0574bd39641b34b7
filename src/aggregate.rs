//! Aggregation of readings into per-field statistics.
//!
//! `latest` always looks at the full series. The date-scoped modes work on a
//! [`DaySelection`] and refuse an empty one. Inside a non-empty selection,
//! each field is reduced on its own; a field with nothing usable comes back
//! as `None` instead of failing the whole result.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{QueryError, Result};
use crate::models::{Field, Reading, TimeSeries};
use crate::select::DaySelection;

// ---

/// Statistic requested by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Latest,
    Mean,
    Max,
    Min,
}

impl Mode {
    // ---
    pub fn name(self) -> &'static str {
        // ---
        match self {
            Mode::Latest => "latest",
            Mode::Mean => "mean",
            Mode::Max => "max",
            Mode::Min => "min",
        }
    }
}

/// Statistics computed over a day selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayStat {
    Mean,
    Max,
    Min,
}

impl DayStat {
    // ---
    /// Reduce one field's values. Non-finite values are skipped.
    fn reduce(self, values: impl Iterator<Item = f64>) -> Option<f64> {
        // ---
        let finite = values.filter(|v| v.is_finite());
        match self {
            DayStat::Max => finite.reduce(f64::max),
            DayStat::Min => finite.reduce(f64::min),
            DayStat::Mean => {
                let (sum, count) = finite.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
                (count > 0).then(|| sum / count as f64)
            }
        }
    }
}

impl TryFrom<Mode> for DayStat {
    type Error = QueryError;

    fn try_from(mode: Mode) -> Result<Self> {
        // ---
        match mode {
            Mode::Mean => Ok(DayStat::Mean),
            Mode::Max => Ok(DayStat::Max),
            Mode::Min => Ok(DayStat::Min),
            Mode::Latest => Err(QueryError::Internal(
                "latest is not computed over a day selection".to_string(),
            )),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        // ---
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(Mode::Latest),
            "mean" => Ok(Mode::Mean),
            "max" => Ok(Mode::Max),
            "min" => Ok(Mode::Min),
            other => Err(QueryError::usage(format!(
                "Unknown mode '{other}'. Use one of: latest, mean, max, min"
            ))),
        }
    }
}

/// Per-field result. `None` means no data for that field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatisticSet {
    // ---
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub gas_level: Option<f64>,
}

impl StatisticSet {
    // ---
    pub fn get(&self, field: Field) -> Option<f64> {
        // ---
        match field {
            Field::Temperature => self.temperature,
            Field::Humidity => self.humidity,
            Field::GasLevel => self.gas_level,
        }
    }

    fn from_fn(mut f: impl FnMut(Field) -> Option<f64>) -> Self {
        // ---
        Self {
            temperature: f(Field::Temperature),
            humidity: f(Field::Humidity),
            gas_level: f(Field::GasLevel),
        }
    }
}

impl From<&Reading> for StatisticSet {
    fn from(r: &Reading) -> Self {
        Self::from_fn(|field| Some(r.value(field)))
    }
}

/// Min, mean and max of one field over a day. Chart input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSummary {
    // ---
    pub field: Field,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub max: Option<f64>,
}

/// Statistics for a chart: one (min, mean, max) triple per field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartStats {
    // ---
    pub date: NaiveDate,
    pub fields: Vec<FieldSummary>,
}

/// Newest reading overall, by append order.
pub fn latest(series: &TimeSeries) -> Result<&Reading> {
    series.last().ok_or(QueryError::NoDataAvailable)
}

/// Compute `mode` for a query.
///
/// `day` is required for mean/max/min and ignored by latest.
pub fn aggregate(
    mode: Mode,
    series: &TimeSeries,
    day: Option<&DaySelection>,
) -> Result<StatisticSet> {
    // ---
    match (mode, day) {
        (Mode::Latest, _) => latest(series).map(StatisticSet::from),
        (_, Some(day)) => summarize(DayStat::try_from(mode)?, day),
        (_, None) => Err(QueryError::Internal(format!(
            "{mode} aggregation requires a date selection"
        ))),
    }
}

/// Reduce every field of a non-empty day selection with `stat`.
fn summarize(stat: DayStat, day: &DaySelection) -> Result<StatisticSet> {
    // ---
    if day.readings.is_empty() {
        return Err(QueryError::NoDataForDate(day.date));
    }
    Ok(StatisticSet::from_fn(|field| {
        stat.reduce(day.readings.values(field))
    }))
}

/// Min/mean/max triples for every field of a day.
pub fn chart_stats(day: &DaySelection) -> Result<ChartStats> {
    // ---
    let min = summarize(DayStat::Min, day)?;
    let mean = summarize(DayStat::Mean, day)?;
    let max = summarize(DayStat::Max, day)?;

    let fields = Field::ALL
        .iter()
        .map(|&field| FieldSummary {
            field,
            min: min.get(field),
            mean: mean.get(field),
            max: max.get(field),
        })
        .collect();

    Ok(ChartStats {
        date: day.date,
        fields,
    })
}
