//! Stratified train/test partitioning

use crate::error::{PulseError, Result};
use crate::training::metrics::CLASS_LABELS;
use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row positions of a train/test partition, each sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Partition row indices into train and test sets, stratified on the binary
/// label so the held-out class proportions match the full set within rounding.
///
/// Shuffling is driven entirely by `seed`; the same inputs always produce the
/// same partition. Fails with [`PulseError::Split`] when either class has too
/// few members to appear in both partitions.
pub fn stratified_split(y: &Array1<f64>, test_fraction: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PulseError::InvalidParameter {
            name: "test_fraction".to_string(),
            value: test_fraction.to_string(),
            reason: "must be strictly between 0 and 1".to_string(),
        });
    }

    let mut class_indices: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (i, &label) in y.iter().enumerate() {
        let class = usize::from(label >= 0.5);
        class_indices[class].push(i);
    }

    // Each class needs one member on each side of the split.
    for (class, indices) in class_indices.iter().enumerate() {
        if indices.len() < 2 {
            return Err(PulseError::Split {
                class: CLASS_LABELS[class].to_string(),
                count: indices.len(),
                needed: 2,
            });
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for indices in class_indices.iter_mut() {
        indices.shuffle(&mut rng);

        let n = indices.len();
        let n_test = ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1);
        let split_point = n - n_test;

        train.extend_from_slice(&indices[..split_point]);
        test.extend_from_slice(&indices[split_point..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(SplitIndices { train, test })
}
