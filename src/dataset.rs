//! Dataset access: CSV loading, label derivation, and row cleaning

use crate::error::{PulseError, Result};
use crate::schema::{FeatureSchema, LabelRule, CHURN_COLUMN};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;

/// Loader for the raw telemetry table.
pub struct DatasetLoader {
    has_header: bool,
    infer_schema_length: Option<usize>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            has_header: true,
            infer_schema_length: Some(100),
        }
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_infer_schema_length(mut self, n: usize) -> Self {
        self.infer_schema_length = Some(n);
        self
    }

    /// Load a CSV file into a DataFrame
    pub fn load_csv(&self, path: &str) -> Result<DataFrame> {
        let file = File::open(path).map_err(|e| PulseError::Data(e.to_string()))?;

        let reader = CsvReadOptions::default()
            .with_has_header(self.has_header)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(file);

        reader.finish().map_err(|e| PulseError::Data(e.to_string()))
    }
}

/// Return a copy of `df` with one column renamed.
///
/// Upstream exports disagree on the id column name (`PlayerID` vs `UserID`);
/// callers normalize with this before handing the table to the pipeline.
pub fn rename_column(df: &DataFrame, from: &str, to: &str) -> Result<DataFrame> {
    let mut out = df.clone();
    out.rename(from, to.into())
        .map_err(|e| PulseError::Data(e.to_string()))?;
    Ok(out)
}

/// Derive the binary churn label from the engagement column.
///
/// Returns a copy of `df` with a boolean [`CHURN_COLUMN`] appended; the source
/// column and every other attribute are untouched and row order is preserved.
/// A null engagement value yields a null label (removed later by the cleaner).
/// An empty input produces an empty output without error.
pub fn derive_labels(df: &DataFrame, rule: &LabelRule) -> Result<DataFrame> {
    let series = df
        .column(&rule.source_column)
        .map_err(|_| PulseError::FeatureNotFound(rule.source_column.clone()))?
        .as_materialized_series();
    let casted = series
        .cast(&DataType::String)
        .map_err(|e| PulseError::Data(e.to_string()))?;
    let ca = casted.str().map_err(|e| PulseError::Data(e.to_string()))?;

    let labels: Vec<Option<bool>> = ca
        .into_iter()
        .map(|v| v.map(|s| s == rule.churn_value))
        .collect();

    let mut out = df.clone();
    out.with_column(Series::new(CHURN_COLUMN.into(), labels))
        .map_err(|e| PulseError::Data(e.to_string()))?;
    Ok(out)
}

/// Outcome of a cleaning pass, reported back to the caller for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanReport {
    pub rows_before: usize,
    pub rows_kept: usize,
    pub rows_removed: usize,
}

/// Remove every row with a missing value in any schema column or the label.
///
/// Removal is all-or-nothing per row; no imputation is performed. For numeric
/// columns both null and NaN count as missing, for categorical columns null
/// does. Running the cleaner on its own output is a no-op.
pub fn drop_incomplete(df: &DataFrame, schema: &FeatureSchema) -> Result<(DataFrame, CleanReport)> {
    let rows_before = df.height();
    let mut keep = vec![true; rows_before];

    for name in schema.numeric() {
        let series = df
            .column(name)
            .map_err(|_| PulseError::FeatureNotFound(name.clone()))?
            .as_materialized_series();
        let casted = series
            .cast(&DataType::Float64)
            .map_err(|e| PulseError::Data(e.to_string()))?;
        let ca = casted.f64().map_err(|e| PulseError::Data(e.to_string()))?;
        for (i, value) in ca.into_iter().enumerate() {
            if !matches!(value, Some(v) if !v.is_nan()) {
                keep[i] = false;
            }
        }
    }

    for name in schema.categorical() {
        let series = df
            .column(name)
            .map_err(|_| PulseError::FeatureNotFound(name.clone()))?
            .as_materialized_series();
        let casted = series
            .cast(&DataType::String)
            .map_err(|e| PulseError::Data(e.to_string()))?;
        let ca = casted.str().map_err(|e| PulseError::Data(e.to_string()))?;
        for (i, value) in ca.into_iter().enumerate() {
            if value.is_none() {
                keep[i] = false;
            }
        }
    }

    let label_series = df
        .column(CHURN_COLUMN)
        .map_err(|_| PulseError::FeatureNotFound(CHURN_COLUMN.to_string()))?
        .as_materialized_series();
    let label_ca = label_series
        .bool()
        .map_err(|e| PulseError::Data(e.to_string()))?;
    for (i, value) in label_ca.into_iter().enumerate() {
        if value.is_none() {
            keep[i] = false;
        }
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    let cleaned = df
        .filter(&mask)
        .map_err(|e| PulseError::Data(e.to_string()))?;

    let rows_kept = cleaned.height();
    Ok((
        cleaned,
        CleanReport {
            rows_before,
            rows_kept,
            rows_removed: rows_before - rows_kept,
        },
    ))
}

/// Select rows of `df` by position.
pub fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let idx: Vec<IdxSize> = rows.iter().map(|&i| i as IdxSize).collect();
    let idx_ca = IdxCa::from_vec("idx".into(), idx);
    df.take(&idx_ca).map_err(|e| PulseError::Data(e.to_string()))
}

/// Extract the churn label column as a 0.0/1.0 vector.
pub fn extract_labels(df: &DataFrame) -> Result<Array1<f64>> {
    let series = df
        .column(CHURN_COLUMN)
        .map_err(|_| PulseError::FeatureNotFound(CHURN_COLUMN.to_string()))?
        .as_materialized_series();
    let ca = series.bool().map_err(|e| PulseError::Data(e.to_string()))?;

    let values: Vec<f64> = ca
        .into_iter()
        .map(|v| {
            v.map(|b| if b { 1.0 } else { 0.0 })
                .ok_or_else(|| PulseError::Data("null label after cleaning".to_string()))
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Array1::from_vec(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engagement_df() -> DataFrame {
        df!(
            "EngagementLevel" => &["Low", "Medium", "High", "Low"],
            "Age" => &[25.0, 30.0, 35.0, 40.0],
        )
        .unwrap()
    }

    #[test]
    fn test_label_is_true_only_for_low() {
        let labeled = derive_labels(&engagement_df(), &LabelRule::default()).unwrap();
        let churn = labeled.column(CHURN_COLUMN).unwrap().bool().unwrap();
        let values: Vec<bool> = churn.into_iter().map(|v| v.unwrap()).collect();
        assert_eq!(values, vec![true, false, false, true]);
    }

    #[test]
    fn test_label_derivation_does_not_touch_source() {
        let df = engagement_df();
        let labeled = derive_labels(&df, &LabelRule::default()).unwrap();
        let original = df.column("EngagementLevel").unwrap().as_materialized_series();
        let after = labeled.column("EngagementLevel").unwrap().as_materialized_series();
        assert!(original.equals(after));
    }

    #[test]
    fn test_label_derivation_on_empty_input() {
        let empty = engagement_df().head(Some(0));
        let labeled = derive_labels(&empty, &LabelRule::default()).unwrap();
        assert_eq!(labeled.height(), 0);
        assert!(labeled.column(CHURN_COLUMN).is_ok());
    }

    #[test]
    fn test_null_engagement_yields_null_label() {
        let df = df!(
            "EngagementLevel" => &[Some("Low"), None, Some("High")],
            "Age" => &[25.0, 30.0, 35.0],
        )
        .unwrap();
        let labeled = derive_labels(&df, &LabelRule::default()).unwrap();
        let churn = labeled.column(CHURN_COLUMN).unwrap().bool().unwrap();
        assert_eq!(churn.null_count(), 1);
    }

    #[test]
    fn test_extract_labels() {
        let labeled = derive_labels(&engagement_df(), &LabelRule::default()).unwrap();
        let y = extract_labels(&labeled).unwrap();
        assert_eq!(y.to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_rename_column_copies() {
        let df = engagement_df();
        let renamed = rename_column(&df, "Age", "PlayerAge").unwrap();
        assert!(renamed.column("PlayerAge").is_ok());
        assert!(df.column("Age").is_ok());
    }
}
