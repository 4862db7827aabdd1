//! Feature preprocessing
//!
//! Turns the cleaned record table into a fully numeric design matrix:
//! - Standard scaling for numeric features (fit-time mean / population std)
//! - One-hot encoding for categorical features with explicit handling of
//!   categories unseen at fit time
//! - A pipeline composing both with a fixed, contractual column order

mod encoder;
mod pipeline;
mod scaler;

pub use encoder::{CategoryMatch, CategoryVocab, OneHotEncoder};
pub use pipeline::FeaturePipeline;
pub use scaler::{ColumnStats, StandardScaler};
