//! End-to-end churn analysis
//!
//! One filter-and-recompute cycle: derive labels, clean, split, fit, evaluate,
//! interpret. The whole pipeline is a pure function of the filtered table and
//! the configuration; any stage failure aborts the remaining stages, so a
//! report either carries every result or does not exist.

use crate::dataset::{derive_labels, drop_incomplete, extract_labels, take_rows};
use crate::error::{PulseError, Result};
use crate::interpret::CoefficientTable;
use crate::preprocessing::FeaturePipeline;
use crate::schema::FeatureSchema;
use crate::training::{
    stratified_split, ClassificationReport, ConfusionMatrix, LogisticRegression,
};
use ndarray::Array1;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configuration for one analysis cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub schema: FeatureSchema,
    /// Held-out fraction of the cleaned rows
    pub test_fraction: f64,
    /// Seed driving the stratified shuffle
    pub seed: u64,
    /// Coefficient-table rows kept for display
    pub top_n: usize,
    /// Classifier L2 regularization strength
    pub l2: f64,
    /// Classifier iteration budget
    pub max_iter: usize,
    /// Classifier learning rate
    pub learning_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            schema: FeatureSchema::gaming(),
            test_fraction: 0.2,
            seed: 42,
            top_n: 10,
            l2: 0.01,
            max_iter: 1000,
            learning_rate: 0.1,
        }
    }
}

impl AnalysisConfig {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }
}

/// Everything the presentation layer renders after a successful cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnReport {
    /// Rows dropped by the cleaner
    pub rows_removed: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Actual churn share of the held-out partition
    pub test_churn_rate: f64,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
    pub coefficients: CoefficientTable,
    /// Whether the classifier reached its gradient tolerance
    pub converged: bool,
}

/// Run the full churn-classification pipeline on an already-filtered table.
pub fn run_churn_analysis(df: &DataFrame, config: &AnalysisConfig) -> Result<ChurnReport> {
    if df.height() == 0 {
        return Err(PulseError::EmptyInput);
    }
    config.schema.validate_columns(df)?;

    let labeled = derive_labels(df, config.schema.label_rule())?;
    let (cleaned, clean_report) = drop_incomplete(&labeled, &config.schema)?;
    info!(
        rows_before = clean_report.rows_before,
        rows_removed = clean_report.rows_removed,
        "cleaned input table"
    );
    if cleaned.height() == 0 {
        return Err(PulseError::NoTrainableData {
            removed: clean_report.rows_removed,
        });
    }

    let y = extract_labels(&cleaned)?;
    let split = stratified_split(&y, config.test_fraction, config.seed)?;
    info!(
        train_rows = split.train.len(),
        test_rows = split.test.len(),
        "stratified split formed"
    );

    let train_df = take_rows(&cleaned, &split.train)?;
    let test_df = take_rows(&cleaned, &split.test)?;
    let y_train = select(&y, &split.train);
    let y_test = select(&y, &split.test);

    // Statistics and vocabularies come from the training partition only.
    let mut pipeline = FeaturePipeline::new(config.schema.clone());
    let x_train = pipeline.fit_transform(&train_df)?;
    let x_test = pipeline.transform(&test_df)?;

    let mut model = LogisticRegression::new()
        .with_l2(config.l2)
        .with_max_iter(config.max_iter)
        .with_learning_rate(config.learning_rate);
    model.fit(&x_train, &y_train)?;
    info!(converged = model.converged(), "classifier fitted");

    let y_pred = model.predict(&x_test)?;
    let confusion = ConfusionMatrix::from_predictions(&y_test, &y_pred)?;
    let report = ClassificationReport::from_confusion(&confusion);

    let names = pipeline.feature_names()?;
    let coefficients =
        CoefficientTable::from_coefficients(&names, model.coefficients()?, config.top_n)?;

    let test_rows = split.test.len();
    let churn_in_test = y_test.iter().filter(|&&v| v >= 0.5).count();

    Ok(ChurnReport {
        rows_removed: clean_report.rows_removed,
        train_rows: split.train.len(),
        test_rows,
        test_churn_rate: churn_in_test as f64 / test_rows as f64,
        accuracy: confusion.accuracy(),
        confusion,
        report,
        coefficients,
        converged: model.converged(),
    })
}

fn select(y: &Array1<f64>, rows: &[usize]) -> Array1<f64> {
    Array1::from_iter(rows.iter().map(|&i| y[i]))
}
