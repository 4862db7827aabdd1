//! Column-wise preprocessing into a single design matrix

use crate::error::{PulseError, Result};
use crate::preprocessing::{OneHotEncoder, StandardScaler};
use crate::schema::FeatureSchema;
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Composes standard scaling and one-hot encoding into one numeric matrix.
///
/// Fit exclusively on the training partition; the learned statistics and
/// vocabularies are applied unmodified to every later transform, so nothing
/// about the test partition leaks into the feature statistics.
///
/// Output column order is contractual: numeric features in schema order, then
/// each categorical feature's indicator block in schema order, with categories
/// in first-observed order within a block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePipeline {
    schema: FeatureSchema,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    is_fitted: bool,
}

impl FeaturePipeline {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(),
            is_fitted: false,
        }
    }

    /// Learn scaling statistics and category vocabularies from `df`.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        if df.height() == 0 {
            return Err(PulseError::Data(
                "cannot fit preprocessing on zero rows".to_string(),
            ));
        }

        self.scaler.fit(df, self.schema.numeric())?;
        self.encoder.fit(df, self.schema.categorical())?;
        self.is_fitted = true;
        Ok(self)
    }

    /// Apply the fitted transforms to `df` and assemble the design matrix.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PulseError::ModelNotFitted);
        }

        let (numeric, indicators) = rayon::join(
            || self.scaler.transform(df),
            || self.encoder.transform(df),
        );
        let mut columns = numeric?;
        columns.extend(indicators?);

        let n_rows = df.height();
        let n_cols = columns.len();
        for (name, values) in &columns {
            if values.len() != n_rows {
                return Err(PulseError::Shape {
                    expected: format!("{n_rows} rows in column {name}"),
                    actual: format!("{} rows", values.len()),
                });
            }
        }

        let col_refs: Vec<&[f64]> = columns.iter().map(|(_, v)| v.as_slice()).collect();
        Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| {
            col_refs[c][r]
        }))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Expanded column names, in design-matrix order.
    pub fn feature_names(&self) -> Result<Vec<String>> {
        if !self.is_fitted {
            return Err(PulseError::ModelNotFitted);
        }

        let mut names: Vec<String> = self
            .scaler
            .stats()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        for vocab in self.encoder.vocabs() {
            for category in &vocab.categories {
                names.push(format!("{}_{}", vocab.name, category));
            }
        }
        Ok(names)
    }

    /// Design-matrix width after categorical expansion
    pub fn width(&self) -> usize {
        self.scaler.stats().len() + self.encoder.expanded_width()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LabelRule;

    fn small_schema() -> FeatureSchema {
        FeatureSchema::new(
            vec!["hours".to_string(), "level".to_string()],
            vec!["genre".to_string()],
            LabelRule::default(),
        )
        .unwrap()
    }

    fn small_df() -> DataFrame {
        df!(
            "hours" => &[1.0, 2.0, 3.0, 4.0],
            "level" => &[10.0, 20.0, 30.0, 40.0],
            "genre" => &["RPG", "Sports", "RPG", "Strategy"],
        )
        .unwrap()
    }

    #[test]
    fn test_column_order_contract() {
        let mut pipeline = FeaturePipeline::new(small_schema());
        pipeline.fit(&small_df()).unwrap();

        assert_eq!(
            pipeline.feature_names().unwrap(),
            vec![
                "hours".to_string(),
                "level".to_string(),
                "genre_RPG".to_string(),
                "genre_Sports".to_string(),
                "genre_Strategy".to_string(),
            ]
        );
    }

    #[test]
    fn test_matrix_shape_matches_width() {
        let mut pipeline = FeaturePipeline::new(small_schema());
        let x = pipeline.fit_transform(&small_df()).unwrap();

        assert_eq!(x.nrows(), 4);
        assert_eq!(x.ncols(), pipeline.width());
        assert_eq!(x.ncols(), pipeline.feature_names().unwrap().len());
    }

    #[test]
    fn test_indicator_values_in_matrix() {
        let mut pipeline = FeaturePipeline::new(small_schema());
        let x = pipeline.fit_transform(&small_df()).unwrap();

        // Row 1 is Sports: indicator columns are [RPG, Sports, Strategy]
        assert_eq!(x[[1, 2]], 0.0);
        assert_eq!(x[[1, 3]], 1.0);
        assert_eq!(x[[1, 4]], 0.0);
    }

    #[test]
    fn test_unseen_category_at_inference() {
        let mut pipeline = FeaturePipeline::new(small_schema());
        pipeline.fit(&small_df()).unwrap();

        let test = df!(
            "hours" => &[2.5],
            "level" => &[25.0],
            "genre" => &["Simulation"],
        )
        .unwrap();

        let x = pipeline.transform(&test).unwrap();
        assert_eq!(x.ncols(), 5);
        // Indicator block all zero, numeric columns untouched by the unknown
        assert_eq!(x[[0, 2]], 0.0);
        assert_eq!(x[[0, 3]], 0.0);
        assert_eq!(x[[0, 4]], 0.0);
    }

    #[test]
    fn test_fit_rejected_on_empty() {
        let mut pipeline = FeaturePipeline::new(small_schema());
        let empty = small_df().head(Some(0));
        assert!(pipeline.fit(&empty).is_err());
    }
}
