use crate::analyzer::stats::{mean, sample_std_dev};
use crate::model::{AnalysisError, SalesRecord, SeasonalityResult};
use chrono::Datelike;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Score above which a product counts as seasonal.
pub const SEASONALITY_THRESHOLD: f64 = 0.3;

/// How many peak / low months are reported.
pub const EXTREME_MONTHS: usize = 3;

pub struct SeasonalityAnalyzer;

impl SeasonalityAnalyzer {
    /// Pools units by calendar month (across years) and scores the spread
    /// of the monthly means relative to their average.
    pub fn analyze(series: &[SalesRecord]) -> Result<SeasonalityResult, AnalysisError> {
        if series.is_empty() {
            return Err(AnalysisError::InsufficientData(
                "seasonality needs at least one record".into(),
            ));
        }

        let monthly_means = Self::monthly_means(series);
        let means: Vec<f64> = monthly_means.values().copied().collect();
        let months_observed = means.len();
        if months_observed < 2 {
            debug!("Only {} distinct month(s) observed, peak/low lists are partial", months_observed);
        }

        let avg = mean(&means).unwrap_or(0.0);
        if avg == 0.0 {
            return Err(AnalysisError::DivisionByZero(
                "mean of monthly means is zero".into(),
            ));
        }

        let max = means.iter().copied().fold(f64::MIN, f64::max);
        let min = means.iter().copied().fold(f64::MAX, f64::min);
        let seasonality_score = (max - min) / avg;
        let seasonal_strength = sample_std_dev(&means) / avg;

        let mut ranked: Vec<(u32, f64)> = monthly_means.iter().map(|(m, v)| (*m, *v)).collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        let peak_months = ranked.iter().take(EXTREME_MONTHS).map(|(m, _)| *m).collect();

        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));
        let low_months = ranked.iter().take(EXTREME_MONTHS).map(|(m, _)| *m).collect();

        Ok(SeasonalityResult {
            seasonality_score,
            seasonal_strength,
            is_seasonal: seasonality_score > SEASONALITY_THRESHOLD,
            peak_months,
            low_months,
            monthly_means,
            months_observed,
        })
    }

    /// Mean units per calendar month (1-12).
    pub fn monthly_means(series: &[SalesRecord]) -> BTreeMap<u32, f64> {
        let mut grouped: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        for record in series {
            let entry = grouped.entry(record.timestamp.month()).or_insert((0.0, 0));
            entry.0 += record.units_sold;
            entry.1 += 1;
        }
        grouped
            .into_iter()
            .map(|(month, (total, count))| (month, total / count as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(y: i32, m: u32, d: u32, units: f64) -> SalesRecord {
        SalesRecord::new("P", NaiveDate::from_ymd_opt(y, m, d).unwrap(), units)
    }

    fn one_year(monthly: [f64; 12]) -> Vec<SalesRecord> {
        (1..=12u32).map(|m| rec(2023, m, 15, monthly[(m - 1) as usize])).collect()
    }

    #[test]
    fn flat_demand_is_not_seasonal() {
        let result = SeasonalityAnalyzer::analyze(&one_year([25.0; 12])).unwrap();
        assert_eq!(result.seasonality_score, 0.0);
        assert_eq!(result.seasonal_strength, 0.0);
        assert!(!result.is_seasonal);
        // all tied: ascending month order
        assert_eq!(result.peak_months, vec![1, 2, 3]);
        assert_eq!(result.low_months, vec![1, 2, 3]);
    }

    #[test]
    fn summer_spike_is_seasonal() {
        let mut monthly = [10.0; 12];
        monthly[6] = 30.0;
        monthly[7] = 30.0;
        let result = SeasonalityAnalyzer::analyze(&one_year(monthly)).unwrap();

        let avg = 160.0 / 12.0;
        assert!((result.seasonality_score - 20.0 / avg).abs() < 1e-9);
        assert!(result.is_seasonal);
        assert_eq!(result.peak_months, vec![7, 8, 1]);
        assert_eq!(result.low_months, vec![1, 2, 3]);
        assert_eq!(result.months_observed, 12);
    }

    #[test]
    fn months_pool_across_years() {
        let series = vec![
            rec(2022, 3, 1, 10.0),
            rec(2023, 3, 1, 30.0),
            rec(2022, 4, 1, 20.0),
        ];
        let means = SeasonalityAnalyzer::monthly_means(&series);
        assert_eq!(means.get(&3), Some(&20.0));
        assert_eq!(means.get(&4), Some(&20.0));
        assert_eq!(means.len(), 2);
    }

    #[test]
    fn single_month_returns_partial_lists() {
        let series = vec![rec(2023, 5, 1, 10.0), rec(2023, 5, 8, 14.0)];
        let result = SeasonalityAnalyzer::analyze(&series).unwrap();
        assert_eq!(result.peak_months, vec![5]);
        assert_eq!(result.low_months, vec![5]);
        assert_eq!(result.months_observed, 1);
        assert_eq!(result.seasonality_score, 0.0);
        assert!(!result.is_seasonal);
    }

    #[test]
    fn zero_demand_signals_division_by_zero() {
        let result = SeasonalityAnalyzer::analyze(&one_year([0.0; 12]));
        assert!(matches!(result, Err(AnalysisError::DivisionByZero(_))));
    }

    #[test]
    fn empty_series_is_insufficient() {
        assert!(matches!(
            SeasonalityAnalyzer::analyze(&[]),
            Err(AnalysisError::InsufficientData(_))
        ));
    }

    #[test]
    fn analysis_is_deterministic() {
        let mut monthly = [12.0; 12];
        monthly[11] = 40.0;
        let series = one_year(monthly);
        assert_eq!(
            SeasonalityAnalyzer::analyze(&series).unwrap(),
            SeasonalityAnalyzer::analyze(&series).unwrap()
        );
    }
}
