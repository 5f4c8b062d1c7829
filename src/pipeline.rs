use crate::analyzer::{Classifier, SeasonalityAnalyzer, TrendAnalyzer};
use crate::model::{AnalysisError, ProductReport, SalesRecord, SalesTable};
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

/// Runs the three analysis stages for one product.
pub struct PipelineRunner;

impl PipelineRunner {
    /// Filters the table to `product_id` and produces the combined report.
    pub fn run(table: &SalesTable, product_id: &str) -> Result<ProductReport, AnalysisError> {
        let series = table.series_for(product_id);
        if series.is_empty() {
            return Err(AnalysisError::ProductNotFound(product_id.to_string()));
        }
        Self::run_series(product_id, &series)
    }

    /// Same as `run`, for a series that is already filtered to one product.
    pub fn run_series(product_id: &str, series: &[SalesRecord]) -> Result<ProductReport, AnalysisError> {
        debug!("Analyzing {} ({} records)", product_id, series.len());

        let seasonality = SeasonalityAnalyzer::analyze(series)?;
        let trend = TrendAnalyzer::analyze(series)?;
        let classification = Classifier::classify(&seasonality, &trend);

        Ok(ProductReport {
            product_id: product_id.to_string(),
            seasonality,
            trend,
            classification,
        })
    }
}

/// Analyzes every product in `products` on blocking worker threads.
/// Each product gets its own result; one failure does not affect the others.
pub async fn run_batch(
    table: Arc<SalesTable>,
    products: &[String],
) -> Vec<(String, Result<ProductReport, AnalysisError>)> {
    let tasks: Vec<_> = products
        .iter()
        .map(|product_id| {
            let table = Arc::clone(&table);
            let product_id = product_id.clone();
            tokio::task::spawn_blocking(move || {
                let result = PipelineRunner::run(&table, &product_id);
                (product_id, result)
            })
        })
        .collect();

    let joined = join_all(tasks).await;

    products
        .iter()
        .zip(joined)
        .map(|(product_id, outcome)| settle(product_id, outcome))
        .collect()
}

type Outcome = (String, Result<ProductReport, AnalysisError>);

// Logs one worker's outcome; a crashed worker becomes `WorkerFailed` for its product.
fn settle(product_id: &str, outcome: Result<Outcome, JoinError>) -> Outcome {
    match outcome {
        Ok((id, Ok(report))) => {
            info!(
                "{}: {} ({:.0}% confidence)",
                id,
                report.classification.category,
                report.classification.confidence * 100.0
            );
            (id, Ok(report))
        }
        Ok((id, Err(e))) => {
            warn!("{}: analysis failed: {}", id, e);
            (id, Err(e))
        }
        Err(e) => {
            warn!("{}: worker failed: {}", product_id, e);
            (product_id.to_string(), Err(AnalysisError::WorkerFailed(e.to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, TrendDirection, TrendStrength};
    use chrono::{Duration, NaiveDate};

    fn weekly(product: &str, values: impl IntoIterator<Item = f64>) -> Vec<SalesRecord> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| SalesRecord::new(product, start + Duration::weeks(i as i64), v))
            .collect()
    }

    fn table() -> SalesTable {
        let mut records = weekly("rising", (0..52).map(|i| 20.0 + 2.0 * i as f64));
        records.extend(weekly("flat", std::iter::repeat(40.0).take(52)));
        records.extend(weekly("zero", std::iter::repeat(0.0).take(10)));
        records.extend(weekly("single", [15.0]));
        // four weeks of May only
        let may = NaiveDate::from_ymd_opt(2023, 5, 1).unwrap();
        records.extend(
            (0..4).map(|i| SalesRecord::new("may_only", may + Duration::weeks(i), 10.0 + i as f64)),
        );
        SalesTable::new(records)
    }

    #[test]
    fn unknown_product_is_not_found() {
        let err = PipelineRunner::run(&table(), "missing").unwrap_err();
        assert_eq!(err, AnalysisError::ProductNotFound("missing".into()));
    }

    #[test]
    fn rising_product_is_a_rising_star() {
        let report = PipelineRunner::run(&table(), "rising").unwrap();
        assert_eq!(report.product_id, "rising");
        assert_eq!(report.trend.direction, TrendDirection::Rising);
        assert_eq!(report.classification.category, Category::RisingStar);
        assert_eq!(report.trend.points, 52);
    }

    #[test]
    fn flat_product_is_evergreen() {
        let report = PipelineRunner::run(&table(), "flat").unwrap();
        assert!(!report.seasonality.is_seasonal);
        assert_eq!(report.trend.r_squared, 1.0);
        assert_eq!(report.trend.strength, TrendStrength::Strong);
        assert_eq!(report.classification.category, Category::Evergreen);
        assert!((report.classification.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn all_zero_product_reports_division_by_zero() {
        let err = PipelineRunner::run(&table(), "zero").unwrap_err();
        assert!(matches!(err, AnalysisError::DivisionByZero(_)));
    }

    #[test]
    fn degraded_inputs_still_produce_reports() {
        let t = table();

        let single = PipelineRunner::run(&t, "single").unwrap();
        assert_eq!(single.trend.points, 1);
        assert_eq!(single.trend.slope, 0.0);
        assert_eq!(single.trend.r_squared, 0.0);
        assert_eq!(single.seasonality.peak_months, vec![1]);

        let may = PipelineRunner::run(&t, "may_only").unwrap();
        assert_eq!(may.seasonality.months_observed, 1);
        assert_eq!(may.seasonality.peak_months, vec![5]);
        assert_eq!(may.seasonality.low_months, vec![5]);
        assert!(!may.seasonality.is_seasonal);
    }

    #[tokio::test]
    async fn crashed_worker_is_reported_as_worker_failure() {
        let join_err = tokio::task::spawn_blocking(|| -> Outcome { panic!("boom") })
            .await
            .unwrap_err();
        let (id, result) = settle("candle", Err(join_err));
        assert_eq!(id, "candle");
        let err = result.unwrap_err();
        assert!(matches!(err, AnalysisError::WorkerFailed(_)));
        assert_eq!(err.kind(), "WORKER_FAILED");
    }

    #[test]
    fn running_twice_is_identical() {
        let t = table();
        assert_eq!(
            PipelineRunner::run(&t, "rising").unwrap(),
            PipelineRunner::run(&t, "rising").unwrap()
        );
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = PipelineRunner::run(&table(), "rising").unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"RISING_STAR\""));
        let back: ProductReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[tokio::test]
    async fn batch_isolates_failures() {
        let products = vec!["rising".to_string(), "missing".to_string(), "flat".to_string()];
        let results = run_batch(Arc::new(table()), &products).await;
        assert_eq!(results.len(), 3);

        let missing = results.iter().find(|(id, _)| id == "missing").unwrap();
        assert!(matches!(missing.1, Err(AnalysisError::ProductNotFound(_))));
        let flat = results.iter().find(|(id, _)| id == "flat").unwrap();
        assert!(flat.1.is_ok());
        let rising = results.iter().find(|(id, _)| id == "rising").unwrap();
        assert_eq!(
            rising.1.as_ref().unwrap(),
            &PipelineRunner::run(&table(), "rising").unwrap()
        );
    }
}
