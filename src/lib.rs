//! playerpulse - Player-behavior analytics core
//!
//! The numeric engine behind an engagement dashboard for online-game
//! telemetry. The hosting layer filters the player table and renders results;
//! this crate does everything in between:
//!
//! - [`schema`] - feature contract and the churn label rule
//! - [`dataset`] - CSV loading, label derivation, missing-row cleaning
//! - [`cache`] - process-wide read-only dataset cache
//! - [`preprocessing`] - scaling + one-hot encoding into a design matrix
//! - [`training`] - stratified splitting, logistic regression, evaluation
//! - [`interpret`] - odds ratios and risk-factor ranking
//! - [`analysis`] - the end-to-end churn analysis cycle
//! - [`summary`] - overview metrics for the dashboard header
//! - [`value`] - swappable player-value scoring

pub mod error;

pub mod cache;
pub mod dataset;
pub mod schema;

pub mod analysis;
pub mod interpret;
pub mod preprocessing;
pub mod training;

pub mod summary;
pub mod value;

pub use error::{PulseError, Result};

/// Re-export of the commonly used types
pub mod prelude {
    pub use crate::error::{PulseError, Result};

    pub use crate::schema::{FeatureSchema, LabelRule, CHURN_COLUMN};

    pub use crate::dataset::{
        derive_labels, drop_incomplete, extract_labels, rename_column, take_rows, CleanReport,
        DatasetLoader,
    };

    pub use crate::cache::{CacheStats, DatasetCache};

    pub use crate::preprocessing::{
        CategoryMatch, CategoryVocab, ColumnStats, FeaturePipeline, OneHotEncoder, StandardScaler,
    };

    pub use crate::training::{
        stratified_split, ClassMetrics, ClassificationReport, ConfusionMatrix, LogisticRegression,
        SplitIndices, CLASS_LABELS,
    };

    pub use crate::interpret::{CoefficientEntry, CoefficientTable, Direction, FactorKind};

    pub use crate::analysis::{run_churn_analysis, AnalysisConfig, ChurnReport};

    pub use crate::summary::{overview, purchase_rate_by_engagement, OverviewStats, ENGAGEMENT_ORDER};

    pub use crate::value::{ValueModel, VALUE_COLUMN};
}
