//! Feature schema and label rule configuration

use crate::error::{PulseError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the derived binary label column.
pub const CHURN_COLUMN: &str = "Churn";

/// Rule mapping a categorical engagement attribute to the binary churn label.
///
/// A record is labeled churn-risk exactly when `source_column == churn_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRule {
    /// Column holding the engagement category
    pub source_column: String,
    /// Category value that maps to `Churn = true`
    pub churn_value: String,
}

impl Default for LabelRule {
    fn default() -> Self {
        Self {
            source_column: "EngagementLevel".to_string(),
            churn_value: "Low".to_string(),
        }
    }
}

/// Fixed, ordered feature contract for the classification pipeline.
///
/// The numeric and categorical lists must partition the modeling feature set
/// exactly: no overlap, no feature left unassigned. Column order here is the
/// column order of the design matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    numeric: Vec<String>,
    categorical: Vec<String>,
    label: LabelRule,
}

impl FeatureSchema {
    /// Create a schema from explicit feature lists.
    ///
    /// Fails if a name appears in both lists, appears twice in one list, or if
    /// the combined feature set is empty.
    pub fn new(
        numeric: Vec<String>,
        categorical: Vec<String>,
        label: LabelRule,
    ) -> Result<Self> {
        if numeric.is_empty() && categorical.is_empty() {
            return Err(PulseError::Schema("feature set is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for name in numeric.iter().chain(categorical.iter()) {
            if !seen.insert(name.as_str()) {
                return Err(PulseError::Schema(format!(
                    "feature {name} assigned more than once"
                )));
            }
        }

        Ok(Self {
            numeric,
            categorical,
            label,
        })
    }

    /// The gaming-telemetry schema with the binary purchase flag treated as numeric.
    pub fn gaming() -> Self {
        Self {
            numeric: vec![
                "Age".to_string(),
                "PlayTimeHours".to_string(),
                "InGamePurchases".to_string(),
                "SessionsPerWeek".to_string(),
                "AvgSessionDurationMinutes".to_string(),
                "PlayerLevel".to_string(),
                "AchievementsUnlocked".to_string(),
            ],
            categorical: vec![
                "Gender".to_string(),
                "Location".to_string(),
                "GameGenre".to_string(),
                "GameDifficulty".to_string(),
            ],
            label: LabelRule::default(),
        }
    }

    /// Variant of [`FeatureSchema::gaming`] that one-hot encodes the purchase flag.
    ///
    /// Changes the expanded column count, so coefficient tables from the two
    /// variants are not comparable row-for-row.
    pub fn gaming_with_categorical_purchases() -> Self {
        let mut schema = Self::gaming();
        schema.numeric.retain(|c| c != "InGamePurchases");
        schema.categorical.insert(0, "InGamePurchases".to_string());
        schema
    }

    /// Numeric feature names in design-matrix order
    pub fn numeric(&self) -> &[String] {
        &self.numeric
    }

    /// Categorical feature names in design-matrix order
    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    /// The label derivation rule
    pub fn label_rule(&self) -> &LabelRule {
        &self.label
    }

    /// All feature columns, numeric first, in contract order
    pub fn feature_columns(&self) -> Vec<String> {
        self.numeric
            .iter()
            .chain(self.categorical.iter())
            .cloned()
            .collect()
    }

    /// Verify that every schema column (features + label source) exists in `df`.
    pub fn validate_columns(&self, df: &DataFrame) -> Result<()> {
        let present: HashSet<&str> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.as_str())
            .collect();

        for name in self.feature_columns() {
            if !present.contains(name.as_str()) {
                return Err(PulseError::FeatureNotFound(name));
            }
        }
        if !present.contains(self.label.source_column.as_str()) {
            return Err(PulseError::FeatureNotFound(self.label.source_column.clone()));
        }
        Ok(())
    }

    /// Verify that a modeling feature set is partitioned exactly by this schema:
    /// every feature belongs to the numeric or categorical list, and the schema
    /// names no feature outside the set.
    pub fn check_partition(&self, modeling: &[String]) -> Result<()> {
        let assigned: HashSet<&str> = self
            .numeric
            .iter()
            .chain(self.categorical.iter())
            .map(|s| s.as_str())
            .collect();
        let wanted: HashSet<&str> = modeling.iter().map(|s| s.as_str()).collect();

        for name in &wanted {
            if !assigned.contains(name) {
                return Err(PulseError::Schema(format!(
                    "feature {name} is in the modeling set but assigned to neither partition"
                )));
            }
        }
        for name in &assigned {
            if !wanted.contains(name) {
                return Err(PulseError::Schema(format!(
                    "schema names feature {name} outside the modeling set"
                )));
            }
        }
        Ok(())
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::gaming()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaming_partition_is_exact() {
        let schema = FeatureSchema::gaming();
        let features = schema.feature_columns();
        assert!(schema.check_partition(&features).is_ok());
        assert_eq!(features.len(), 11);
    }

    #[test]
    fn test_duplicate_assignment_rejected() {
        let result = FeatureSchema::new(
            vec!["Age".to_string()],
            vec!["Age".to_string()],
            LabelRule::default(),
        );
        assert!(matches!(result, Err(PulseError::Schema(_))));
    }

    #[test]
    fn test_unassigned_feature_rejected() {
        let schema = FeatureSchema::gaming();
        let mut features = schema.feature_columns();
        features.push("TotalSpend".to_string());
        assert!(schema.check_partition(&features).is_err());
    }

    #[test]
    fn test_categorical_purchases_variant_moves_flag() {
        let schema = FeatureSchema::gaming_with_categorical_purchases();
        assert!(!schema.numeric().contains(&"InGamePurchases".to_string()));
        assert_eq!(schema.categorical()[0], "InGamePurchases");
        // Same total feature count either way
        assert_eq!(schema.feature_columns().len(), 11);
    }

    #[test]
    fn test_default_label_rule() {
        let rule = LabelRule::default();
        assert_eq!(rule.source_column, "EngagementLevel");
        assert_eq!(rule.churn_value, "Low");
    }
}
