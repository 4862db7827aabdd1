//! Coefficient interpretation: odds ratios and risk-factor ranking

use crate::error::{PulseError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Whether a feature pushes the churn odds up or holds them down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorKind {
    /// Odds ratio >= 1: the feature raises churn odds
    Risk,
    /// Odds ratio < 1: the feature lowers churn odds (retention factor)
    Protective,
}

/// Direction of the relative odds change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

/// One expanded design-matrix column's contribution to the churn odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEntry {
    pub feature: String,
    pub coefficient: f64,
    /// `exp(coefficient)`: multiplicative effect on the churn odds per unit
    /// increase of the (scaled) feature
    pub odds_ratio: f64,
    pub factor: FactorKind,
    /// `|odds_ratio - 1| * 100`
    pub pct_change: f64,
    pub direction: Direction,
}

/// Coefficient table ranked descending by coefficient magnitude and truncated
/// to a bounded top-N for display.
///
/// The ranking approximates feature importance; it is not a statistical
/// significance test and no p-values are computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientTable {
    entries: Vec<CoefficientEntry>,
    total_features: usize,
}

impl CoefficientTable {
    /// Build the table from the fitted weights and the expanded feature names
    /// produced by the preprocessing pipeline, in the same column order.
    ///
    /// A length mismatch between the two is a defect in the caller's wiring,
    /// not a data condition: it aborts with [`PulseError::SchemaMismatch`]
    /// and produces no partial table.
    pub fn from_coefficients(
        names: &[String],
        coefficients: &Array1<f64>,
        top_n: usize,
    ) -> Result<Self> {
        if names.len() != coefficients.len() {
            return Err(PulseError::SchemaMismatch {
                feature_count: names.len(),
                coefficient_count: coefficients.len(),
            });
        }

        let mut entries: Vec<CoefficientEntry> = names
            .iter()
            .zip(coefficients.iter())
            .map(|(name, &b)| {
                let odds_ratio = b.exp();
                let (factor, direction) = if odds_ratio < 1.0 {
                    (FactorKind::Protective, Direction::Decrease)
                } else {
                    (FactorKind::Risk, Direction::Increase)
                };
                CoefficientEntry {
                    feature: name.clone(),
                    coefficient: b,
                    odds_ratio,
                    factor,
                    pct_change: (odds_ratio - 1.0).abs() * 100.0,
                    direction,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.coefficient
                .abs()
                .partial_cmp(&a.coefficient.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries.truncate(top_n);

        Ok(Self {
            entries,
            total_features: names.len(),
        })
    }

    /// Ranked entries, strongest influence first
    pub fn entries(&self) -> &[CoefficientEntry] {
        &self.entries
    }

    /// Number of design-matrix columns before truncation
    pub fn total_features(&self) -> usize {
        self.total_features
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
