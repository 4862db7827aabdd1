//! Player-value scoring

use crate::error::{PulseError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Name of the attached value column.
pub const VALUE_COLUMN: &str = "EstimatedValue";

/// Weighted lifetime-value proxy over purchase, playtime, and level columns.
///
/// The weighting is a product choice, not an analysis contract: product teams
/// tune it per title, so the weights are plain configuration. The default
/// reproduces the dashboard's shipped weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueModel {
    pub purchase_weight: f64,
    pub playtime_weight: f64,
    pub level_weight: f64,
}

impl Default for ValueModel {
    fn default() -> Self {
        Self {
            purchase_weight: 5000.0,
            playtime_weight: 100.0,
            level_weight: 10.0,
        }
    }
}

impl ValueModel {
    pub fn new(purchase_weight: f64, playtime_weight: f64, level_weight: f64) -> Self {
        Self {
            purchase_weight,
            playtime_weight,
            level_weight,
        }
    }

    /// Per-row value scores, in row order.
    pub fn score(&self, df: &DataFrame) -> Result<Vec<f64>> {
        let purchases = numeric_values(df, "InGamePurchases")?;
        let playtime = numeric_values(df, "PlayTimeHours")?;
        let level = numeric_values(df, "PlayerLevel")?;

        Ok(purchases
            .iter()
            .zip(playtime.iter())
            .zip(level.iter())
            .map(|((&p, &h), &l)| {
                p * self.purchase_weight + h * self.playtime_weight + l * self.level_weight
            })
            .collect())
    }

    /// Copy of `df` with the [`VALUE_COLUMN`] attached; the input is untouched.
    pub fn attach(&self, df: &DataFrame) -> Result<DataFrame> {
        let scores = self.score(df)?;
        let mut out = df.clone();
        out.with_column(Series::new(VALUE_COLUMN.into(), scores))
            .map_err(|e| PulseError::Data(e.to_string()))?;
        Ok(out)
    }
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)
        .map_err(|_| PulseError::FeatureNotFound(name.to_string()))?
        .as_materialized_series();
    let casted = series
        .cast(&DataType::Float64)
        .map_err(|e| PulseError::Data(e.to_string()))?;
    let ca = casted.f64().map_err(|e| PulseError::Data(e.to_string()))?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "InGamePurchases" => &[1.0, 0.0],
            "PlayTimeHours" => &[10.0, 20.0],
            "PlayerLevel" => &[5.0, 50.0],
        )
        .unwrap()
    }

    #[test]
    fn test_default_weighting() {
        let scores = ValueModel::default().score(&sample_df()).unwrap();
        assert_eq!(scores, vec![5000.0 + 1000.0 + 50.0, 2000.0 + 500.0]);
    }

    #[test]
    fn test_custom_weighting() {
        let model = ValueModel::new(1.0, 2.0, 3.0);
        let scores = model.score(&sample_df()).unwrap();
        assert_eq!(scores[0], 1.0 + 20.0 + 15.0);
    }

    #[test]
    fn test_attach_leaves_input_untouched() {
        let df = sample_df();
        let scored = ValueModel::default().attach(&df).unwrap();
        assert!(scored.column(VALUE_COLUMN).is_ok());
        assert!(df.column(VALUE_COLUMN).is_err());
    }
}
