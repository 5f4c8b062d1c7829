use crate::analyzer::stats::LinearFit;
use crate::model::{AnalysisError, SalesRecord, TrendDirection, TrendResult, TrendStrength};
use tracing::debug;

/// Trailing periods used for the recent fit.
pub const RECENT_WINDOW: usize = 12;

pub const STRONG_R_SQUARED: f64 = 0.7;
pub const MODERATE_R_SQUARED: f64 = 0.4;

/// Slope magnitude (units per period) separating rising/declining from stable.
pub const DIRECTION_SLOPE: f64 = 0.5;

pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Sorts the series by timestamp and fits an OLS line over the whole
    /// series and over the trailing `RECENT_WINDOW` periods.
    pub fn analyze(series: &[SalesRecord]) -> Result<TrendResult, AnalysisError> {
        if series.is_empty() {
            return Err(AnalysisError::InsufficientData(
                "trend needs at least one record".into(),
            ));
        }

        let mut sorted: Vec<&SalesRecord> = series.iter().collect();
        sorted.sort_by_key(|r| r.timestamp);
        let values: Vec<f64> = sorted.iter().map(|r| r.units_sold).collect();

        let (slope, r_squared) = Self::fit_or_flat(&values)?;

        let (recent_slope, recent_r_squared) = if values.len() >= RECENT_WINDOW {
            Self::fit_or_flat(&values[values.len() - RECENT_WINDOW..])?
        } else {
            (slope, r_squared)
        };

        let first_value = values[0];
        let last_value = values[values.len() - 1];

        Ok(TrendResult {
            slope,
            r_squared,
            recent_slope,
            recent_r_squared,
            total_change_pct: Self::total_change_pct(first_value, last_value),
            strength: Self::strength(r_squared),
            direction: Self::direction(slope),
            points: values.len(),
            first_value,
            last_value,
        })
    }

    /// Percentage change from first to last value; a zero baseline counts as no change.
    pub fn total_change_pct(first: f64, last: f64) -> f64 {
        if first > 0.0 {
            (last - first) / first * 100.0
        } else {
            0.0
        }
    }

    pub fn strength(r_squared: f64) -> TrendStrength {
        if r_squared > STRONG_R_SQUARED {
            TrendStrength::Strong
        } else if r_squared > MODERATE_R_SQUARED {
            TrendStrength::Moderate
        } else {
            TrendStrength::Weak
        }
    }

    pub fn direction(slope: f64) -> TrendDirection {
        if slope > DIRECTION_SLOPE {
            TrendDirection::Rising
        } else if slope < -DIRECTION_SLOPE {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    }

    // A single point cannot be regressed; it is reported as a flat, unexplained line.
    fn fit_or_flat(values: &[f64]) -> Result<(f64, f64), AnalysisError> {
        match LinearFit::fit(values) {
            Ok(fit) => Ok((fit.slope, fit.r_squared)),
            Err(AnalysisError::DivisionByZero(reason)) => {
                debug!("Degenerate trend fit ({}), using slope=0 r2=0", reason);
                Ok((0.0, 0.0))
            }
            Err(e) => Err(e),
        }
    }
}
