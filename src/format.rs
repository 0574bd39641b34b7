//! Text replies for the command surface.

use chrono::NaiveDate;

use crate::aggregate::{Mode, StatisticSet};
use crate::error::QueryError;
use crate::models::{Field, Reading};

// ---

const FIELD_LABELS: [(Field, &str, &str); 3] = [
    (Field::Temperature, "🌡️", "Temp"),
    (Field::Humidity, "💧", "Humidity"),
    (Field::GasLevel, "🫧", "Gas"),
];

pub fn help_text() -> String {
    // ---
    [
        "🤖 AirQualityBot",
        "",
        "✅ Welcome",
        "",
        "💻 Available commands:",
        "",
        "/latest – Latest reading",
        "/mean YYYY-MM-DD – Daily averages",
        "/max YYYY-MM-DD – Daily maximums",
        "/min YYYY-MM-DD – Daily minimums",
        "/chart YYYY-MM-DD – Daily statistics chart",
    ]
    .join("\n")
}

/// Latest reading, raw values.
pub fn latest_text(reading: &Reading) -> String {
    // ---
    let mut lines = vec!["📍 Latest reading:".to_string()];
    for (field, icon, label) in FIELD_LABELS {
        lines.push(format!(
            "{icon} {label}: {} {}",
            reading.value(field),
            field.unit()
        ));
    }
    lines.push(format!("🕒 {}", reading.timestamp));
    lines.join("\n")
}

/// Heading naming the statistic and the date.
pub fn daily_label(mode: Mode, date: NaiveDate) -> String {
    // ---
    match mode {
        Mode::Mean => format!("📊 Averages for {date}:"),
        Mode::Max => format!("📈 Maximums for {date}:"),
        Mode::Min => format!("📉 Minimums for {date}:"),
        Mode::Latest => "📍 Latest reading:".to_string(),
    }
}

/// Daily statistic, two decimals, `no data` for absent fields.
pub fn daily_text(mode: Mode, date: NaiveDate, stats: &StatisticSet) -> String {
    // ---
    let mut lines = vec![daily_label(mode, date)];
    for (field, icon, label) in FIELD_LABELS {
        let value = match stats.get(field) {
            Some(v) => format!("{v:.2} {}", field.unit()),
            None => "no data".to_string(),
        };
        lines.push(format!("{icon} {label}: {value}"));
    }
    lines.join("\n")
}

pub fn chart_title(date: NaiveDate) -> String {
    format!("Statistics for {date}")
}

/// User-facing message for a failed query. Internal details are not exposed.
pub fn error_text(err: &QueryError) -> String {
    // ---
    match err {
        QueryError::Usage(msg) => msg.clone(),
        QueryError::NoDataAvailable => "No data available.".to_string(),
        QueryError::NoDataForDate(date) => format!("No data recorded for {date}."),
        QueryError::Internal(_) | QueryError::Unexpected(_) => {
            "An internal error occurred while processing the data.".to_string()
        }
    }
}
