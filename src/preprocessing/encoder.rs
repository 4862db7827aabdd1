//! One-hot encoding for categorical features

use crate::error::{PulseError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Vocabulary learned for one categorical column at fit time.
///
/// Categories keep the order in which they were first observed, which fixes
/// the indicator-column order of this feature's expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVocab {
    pub name: String,
    pub categories: Vec<String>,
}

/// How a transform-time value relates to the fit-time vocabulary.
///
/// `Unknown` covers both categories never seen during fitting and null values;
/// either way the feature's whole indicator block stays zero for that row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMatch {
    /// Index into the vocabulary; the matching indicator column is set to 1.
    Known(usize),
    /// No indicator column is set.
    Unknown,
}

impl CategoryVocab {
    fn match_value(&self, value: Option<&str>) -> CategoryMatch {
        match value {
            Some(v) => self
                .categories
                .iter()
                .position(|c| c == v)
                .map_or(CategoryMatch::Unknown, CategoryMatch::Known),
            None => CategoryMatch::Unknown,
        }
    }
}

/// One-hot encoder over named categorical columns.
///
/// Each fitted column expands into one `{column}_{category}` indicator column
/// per observed category. Unseen categories at transform time map to the
/// all-zero block; they never fail and never set an indicator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    vocabs: Vec<CategoryVocab>,
    is_fitted: bool,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self {
            vocabs: Vec::new(),
            is_fitted: false,
        }
    }

    /// Learn each column's category vocabulary from `df`, in the column order
    /// given and in first-observed order within each column.
    pub fn fit(&mut self, df: &DataFrame, columns: &[String]) -> Result<&mut Self> {
        self.vocabs.clear();

        for name in columns {
            let ca = string_column(df, name)?;

            let mut categories: Vec<String> = Vec::new();
            for value in ca.into_iter().flatten() {
                if !categories.iter().any(|c| c == value) {
                    categories.push(value.to_string());
                }
            }

            if categories.is_empty() {
                return Err(PulseError::Data(format!(
                    "no categories observed for column {name}"
                )));
            }

            self.vocabs.push(CategoryVocab {
                name: name.clone(),
                categories,
            });
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Expand the fitted columns of `df` into indicator columns, in fit order.
    pub fn transform(&self, df: &DataFrame) -> Result<Vec<(String, Vec<f64>)>> {
        if !self.is_fitted {
            return Err(PulseError::ModelNotFitted);
        }

        let mut out = Vec::new();
        for vocab in &self.vocabs {
            let ca = string_column(df, &vocab.name)?;
            let n_rows = ca.len();
            let n_cats = vocab.categories.len();

            let mut block = vec![vec![0.0f64; n_rows]; n_cats];
            for (row, value) in ca.into_iter().enumerate() {
                match vocab.match_value(value) {
                    CategoryMatch::Known(idx) => block[idx][row] = 1.0,
                    CategoryMatch::Unknown => {}
                }
            }

            for (category, column) in vocab.categories.iter().zip(block) {
                out.push((format!("{}_{}", vocab.name, category), column));
            }
        }

        Ok(out)
    }

    /// Learned vocabularies, in fit order
    pub fn vocabs(&self) -> &[CategoryVocab] {
        &self.vocabs
    }

    /// Categories observed for one fitted column
    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.vocabs
            .iter()
            .find(|v| v.name == column)
            .map(|v| v.categories.as_slice())
    }

    /// Total number of indicator columns across all fitted features
    pub fn expanded_width(&self) -> usize {
        self.vocabs.iter().map(|v| v.categories.len()).sum()
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let series = df
        .column(name)
        .map_err(|_| PulseError::FeatureNotFound(name.to_string()))?
        .as_materialized_series();
    let casted = series
        .cast(&DataType::String)
        .map_err(|e| PulseError::Data(e.to_string()))?;
    casted
        .str()
        .map(|ca| ca.clone())
        .map_err(|e| PulseError::Data(e.to_string()))
}
