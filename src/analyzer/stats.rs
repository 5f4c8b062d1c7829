use crate::model::AnalysisError;

/// Arithmetic mean. Returns None for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
/// Fewer than two values have no spread, so this yields 0.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values
        .iter()
        .map(|v| (v - avg).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Ordinary least squares fit of `y` against its zero-based index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    /// Fits `y[i] = intercept + slope * i`.
    ///
    /// A series with fewer than two points has no variance along the index
    /// axis and yields `DivisionByZero`. A flat series (all values equal) is
    /// predicted exactly by a zero-slope line, so its `r_squared` is 1.
    pub fn fit(y: &[f64]) -> Result<LinearFit, AnalysisError> {
        let n = y.len();
        if n == 0 {
            return Err(AnalysisError::InsufficientData("empty series".into()));
        }
        let nf = n as f64;
        let x_mean = (nf - 1.0) / 2.0;
        let y_mean = y.iter().sum::<f64>() / nf;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (i, &yi) in y.iter().enumerate() {
            let dx = i as f64 - x_mean;
            sxy += dx * (yi - y_mean);
            sxx += dx * dx;
        }
        if sxx == 0.0 {
            return Err(AnalysisError::DivisionByZero(format!(
                "regression over {n} point(s) has no index variance"
            )));
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let ss_tot: f64 = y.iter().map(|yi| (yi - y_mean).powi(2)).sum();
        let ss_res: f64 = y
            .iter()
            .enumerate()
            .map(|(i, yi)| (yi - (intercept + slope * i as f64)).powi(2))
            .sum();
        let r_squared = if ss_tot == 0.0 {
            if ss_res == 0.0 { 1.0 } else { 0.0 }
        } else {
            (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
        };

        Ok(LinearFit {
            slope,
            intercept,
            r_squared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        // deviations from 5: 9,1,1,1,0,0,4,16 -> 32 / 7
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(sample_std_dev(&v), (32.0f64 / 7.0).sqrt()));
        assert_eq!(sample_std_dev(&[42.0]), 0.0);
    }

    #[test]
    fn perfect_line_fits_exactly() {
        let fit = LinearFit::fit(&[10.0, 20.0, 30.0, 40.0, 50.0]).unwrap();
        assert_eq!(fit.slope, 10.0);
        assert_eq!(fit.intercept, 10.0);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn noisy_series_has_partial_fit() {
        let fit = LinearFit::fit(&[1.0, 3.0, 2.0, 5.0, 4.0]).unwrap();
        // sxy = 8, sxx = 10
        assert!(approx(fit.slope, 0.8));
        assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
    }

    #[test]
    fn single_point_is_division_by_zero() {
        assert!(matches!(
            LinearFit::fit(&[7.0]),
            Err(AnalysisError::DivisionByZero(_))
        ));
    }

    #[test]
    fn flat_series_is_a_perfect_fit() {
        let fit = LinearFit::fit(&[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.r_squared, 1.0);
    }
}
