//! One fetch-normalize-select-aggregate cycle per call.
//!
//! Nothing is cached between calls; every query re-reads the source.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::aggregate::{self, ChartStats, Mode, StatisticSet};
use crate::error::Result;
use crate::models::{Reading, TimeSeries};
use crate::normalize::{normalize, ColumnNames};
use crate::select::select_date;
use crate::source::RowSource;

// ---

#[derive(Clone)]
pub struct QueryService {
    // ---
    source: Arc<dyn RowSource>,
    columns: Arc<ColumnNames>,
}

impl QueryService {
    // ---
    pub fn new(source: Arc<dyn RowSource>, columns: ColumnNames) -> Self {
        Self {
            source,
            columns: Arc::new(columns),
        }
    }

    pub fn source_kind(&self) -> &'static str {
        self.source.kind()
    }

    /// Fetch and normalize the full series.
    pub async fn series(&self) -> Result<TimeSeries> {
        // ---
        let rows = self.source.fetch_rows().await?;
        Ok(normalize(&rows, &self.columns))
    }

    /// Newest reading overall.
    pub async fn latest(&self) -> Result<Reading> {
        // ---
        let series = self.series().await?;
        aggregate::latest(&series).copied()
    }

    /// `mode` over the readings of `date`. For [`Mode::Latest`] the date is
    /// ignored.
    pub async fn daily(&self, mode: Mode, date: NaiveDate) -> Result<StatisticSet> {
        // ---
        let series = self.series().await?;
        let day = select_date(&series, date);
        tracing::debug!(%date, matched = day.readings.len(), "selected readings");
        aggregate::aggregate(mode, &series, Some(&day))
    }

    /// Min/mean/max triples of `date` for the chart renderer.
    pub async fn chart(&self, date: NaiveDate) -> Result<ChartStats> {
        // ---
        let series = self.series().await?;
        let day = select_date(&series, date);
        tracing::debug!(%date, matched = day.readings.len(), "selected readings");
        aggregate::chart_stats(&day)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::error::QueryError;
    use crate::models::RawRow;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct StaticSource(Vec<RawRow>);

    #[async_trait]
    impl RowSource for StaticSource {
        async fn fetch_rows(&self) -> anyhow::Result<Vec<RawRow>> {
            Ok(self.0.clone())
        }

        fn kind(&self) -> &'static str {
            "static"
        }
    }

    struct DownSource;

    #[async_trait]
    impl RowSource for DownSource {
        async fn fetch_rows(&self) -> anyhow::Result<Vec<RawRow>> {
            Err(anyhow::anyhow!("connection refused"))
        }

        fn kind(&self) -> &'static str {
            "down"
        }
    }

    fn row(ts: &str, t: &str, h: &str, g: &str) -> RawRow {
        // ---
        let Value::Object(map) = json!({
            "Fecha y Hora": ts,
            "Temperatura (°C)": t,
            "Humedad (%)": h,
            "Gas (ADC)": g,
        }) else {
            unreachable!()
        };
        map
    }

    fn service(rows: Vec<RawRow>) -> QueryService {
        QueryService::new(Arc::new(StaticSource(rows)), ColumnNames::default())
    }

    fn scenario() -> QueryService {
        // ---
        service(vec![
            row("2024-01-01 10:00", "20.5", "55", "300"),
            row("2024-01-01 12:00", "22.0", "abc", "310"),
            row("2024-01-02 09:00", "19.0", "60", "290"),
        ])
    }

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_scenario_end_to_end() {
        // ---
        let svc = scenario();
        assert_eq!(svc.series().await.unwrap().len(), 2);

        let mean = svc.daily(Mode::Mean, ymd(1)).await.unwrap();
        assert_eq!(mean.temperature, Some(20.5));
        assert_eq!(mean.humidity, Some(55.0));
        assert_eq!(mean.gas_level, Some(300.0));

        let latest = svc.latest().await.unwrap();
        assert_eq!(latest.timestamp, ymd(2).and_hms_opt(9, 0, 0).unwrap());

        assert!(matches!(
            svc.daily(Mode::Min, ymd(3)).await,
            Err(QueryError::NoDataForDate(_))
        ));
        assert!(matches!(
            svc.chart(ymd(3)).await,
            Err(QueryError::NoDataForDate(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_source() {
        // ---
        let svc = service(Vec::new());
        assert!(matches!(svc.latest().await, Err(QueryError::NoDataAvailable)));
        assert!(matches!(
            svc.daily(Mode::Latest, ymd(1)).await,
            Err(QueryError::NoDataAvailable)
        ));
    }

    #[tokio::test]
    async fn test_source_failure_is_unexpected() {
        // ---
        let svc = QueryService::new(Arc::new(DownSource), ColumnNames::default());
        let err = svc.latest().await.unwrap_err();
        assert!(matches!(err, QueryError::Unexpected(_)));
        assert_eq!(svc.source_kind(), "down");
    }
}
