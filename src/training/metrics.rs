//! Classification evaluation on the held-out partition

use crate::error::{PulseError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Display names for the two classes, in fixed (0, 1) order.
pub const CLASS_LABELS: [&str; 2] = ["Active (0)", "Churn (1)"];

/// 2×2 confusion matrix with rows = actual class, columns = predicted class,
/// both in fixed (0, 1) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    /// Tally actual/predicted label pairs. Labels are binarized at 0.5.
    pub fn from_predictions(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(PulseError::Shape {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }

        let mut counts = [[0usize; 2]; 2];
        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            let actual = usize::from(*t >= 0.5);
            let predicted = usize::from(*p >= 0.5);
            counts[actual][predicted] += 1;
        }

        Ok(Self { counts })
    }

    pub fn count(&self, actual: usize, predicted: usize) -> usize {
        self.counts[actual][predicted]
    }

    /// All four counts, rows = actual
    pub fn grid(&self) -> [[usize; 2]; 2] {
        self.counts
    }

    pub fn true_negatives(&self) -> usize {
        self.counts[0][0]
    }

    pub fn false_positives(&self) -> usize {
        self.counts[0][1]
    }

    pub fn false_negatives(&self) -> usize {
        self.counts[1][0]
    }

    pub fn true_positives(&self) -> usize {
        self.counts[1][1]
    }

    /// Total number of evaluated rows
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Fraction of correct predictions, computed from the matrix counts
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.true_positives() + self.true_negatives()) as f64 / total as f64
    }

    /// Row/column display labels, (0, 1) order
    pub fn labels(&self) -> [&'static str; 2] {
        CLASS_LABELS
    }
}

/// Precision/recall/F1 for one class.
///
/// A rate whose denominator is zero (no support, or the class was never
/// predicted) is undefined and stays `None`; it is never reported as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1: Option<f64>,
    pub support: usize,
}

/// Per-class metrics keyed by display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    per_class: BTreeMap<String, ClassMetrics>,
}

impl ClassificationReport {
    /// Derive every rate exactly from the confusion-matrix counts.
    pub fn from_confusion(matrix: &ConfusionMatrix) -> Self {
        let mut per_class = BTreeMap::new();

        for class in 0..2 {
            let support = matrix.count(class, 0) + matrix.count(class, 1);
            let predicted = matrix.count(0, class) + matrix.count(1, class);
            let hits = matrix.count(class, class);

            let precision = (predicted > 0).then(|| hits as f64 / predicted as f64);
            let recall = (support > 0).then(|| hits as f64 / support as f64);
            let f1 = match (precision, recall) {
                (Some(p), Some(r)) if p + r > 0.0 => Some(2.0 * p * r / (p + r)),
                (Some(_), Some(_)) => Some(0.0),
                _ => None,
            };

            per_class.insert(
                CLASS_LABELS[class].to_string(),
                ClassMetrics {
                    precision,
                    recall,
                    f1,
                    support,
                },
            );
        }

        Self { per_class }
    }

    pub fn class(&self, name: &str) -> Option<&ClassMetrics> {
        self.per_class.get(name)
    }

    /// Class name → metrics, in fixed class order
    pub fn classes(&self) -> impl Iterator<Item = (&String, &ClassMetrics)> {
        self.per_class.iter()
    }
}
