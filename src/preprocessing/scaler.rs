//! Standard scaling for numeric features

use crate::error::{PulseError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters learned for one numeric column at fit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub mean: f64,
    /// Population standard deviation, forced to 1.0 for zero-variance columns
    /// so the scaled output is 0.0 rather than NaN.
    pub scale: f64,
}

/// Z-score scaler: `(x - mean) / scale`, with statistics learned once at fit
/// time and reused unmodified for every later transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    stats: Vec<ColumnStats>,
    is_fitted: bool,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    pub fn new() -> Self {
        Self {
            stats: Vec::new(),
            is_fitted: false,
        }
    }

    /// Learn per-column mean and standard deviation from `df`.
    ///
    /// Columns are fitted in the order given, which fixes their order in every
    /// subsequent transform.
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        self.stats.clear();

        for name in columns {
            let values = numeric_column(df, name)?;
            if values.is_empty() {
                return Err(PulseError::Data(format!(
                    "cannot fit scaler on empty column {name}"
                )));
            }

            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
            let std = variance.sqrt();

            self.stats.push(ColumnStats {
                name: name.clone(),
                mean,
                scale: if std == 0.0 { 1.0 } else { std },
            });
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Scale the fitted columns of `df`, returned in fit order.
    pub fn transform(&self, df: &DataFrame) -> Result<Vec<(String, Vec<f64>)>> {
        if !self.is_fitted {
            return Err(PulseError::ModelNotFitted);
        }

        self.stats
            .iter()
            .map(|stats| {
                let values = numeric_column(df, &stats.name)?;
                let scaled: Vec<f64> = values
                    .iter()
                    .map(|v| (v - stats.mean) / stats.scale)
                    .collect();
                Ok((stats.name.clone(), scaled))
            })
            .collect()
    }

    /// Learned per-column statistics, in fit order
    pub fn stats(&self) -> &[ColumnStats] {
        &self.stats
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

/// Extract a column as f64 values. Nulls are rejected: the cleaner runs first.
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .map_err(|_| PulseError::FeatureNotFound(name.to_string()))?
        .as_materialized_series();
    let casted = series
        .cast(&DataType::Float64)
        .map_err(|e| PulseError::Data(e.to_string()))?;
    let ca = casted.f64().map_err(|e| PulseError::Data(e.to_string()))?;

    ca.into_iter()
        .map(|v| v.ok_or_else(|| PulseError::Data(format!("null value in numeric column {name}"))))
        .collect()
}
