//! Regression metrics used to report how well a model fits its data.

use serde::Serialize;

/// Summary of a regression fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub mae: f32,
    pub rmse: f32,
    pub r_squared: f32,
    pub max_abs_error: f32,
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Computes all metrics in one pass over paired slices.
    ///
    /// Slices of different length are truncated to the shorter one; empty
    /// input yields all-zero metrics.
    pub fn compute(y_true: &[f32], y_pred: &[f32]) -> Self {
        let n = y_true.len().min(y_pred.len());
        if n == 0 {
            return Self::default();
        }
        let pairs = || y_true.iter().zip(y_pred.iter()).take(n);

        let mean_true = pairs().map(|(&t, _)| t as f64).sum::<f64>() / n as f64;

        let mut sum_abs = 0.0f64;
        let mut ss_res = 0.0f64;
        let mut ss_tot = 0.0f64;
        let mut max_abs = 0.0f64;
        for (&t, &p) in pairs() {
            let err = (t - p) as f64;
            sum_abs += err.abs();
            ss_res += err * err;
            ss_tot += (t as f64 - mean_true).powi(2);
            max_abs = max_abs.max(err.abs());
        }

        // constant targets: perfect fit scores 1, anything else 0
        let r_squared = if ss_tot == 0.0 {
            if ss_res == 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            1.0 - ss_res / ss_tot
        };

        Self {
            mae: (sum_abs / n as f64) as f32,
            rmse: (ss_res / n as f64).sqrt() as f32,
            r_squared: r_squared as f32,
            max_abs_error: max_abs as f32,
            n_samples: n,
        }
    }
}

impl std::fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "n={} MAE={:.4} RMSE={:.4} R²={:.4} max|err|={:.4}",
            self.n_samples, self.mae, self.rmse, self.r_squared, self.max_abs_error
        )
    }
}
