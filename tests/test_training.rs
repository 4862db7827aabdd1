//! Integration test: splitting, fitting, and evaluation

use ndarray::{Array1, Array2};
use playerpulse::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn label_vector(n_churn: usize, n_active: usize) -> Array1<f64> {
    let mut v = vec![1.0; n_churn];
    v.extend(vec![0.0; n_active]);
    Array1::from_vec(v)
}

#[test]
fn test_stratified_proportions_at_default_settings() {
    let y = label_vector(300, 700);
    let split = stratified_split(&y, 0.2, 42).unwrap();

    assert_eq!(split.test.len(), 200);
    let churn_in_test = split.test.iter().filter(|&&i| y[i] >= 0.5).count();
    assert!((58..=62).contains(&churn_in_test));
}

#[test]
fn test_single_class_cannot_be_split() {
    let y = Array1::from_vec(vec![1.0; 500]);
    let err = stratified_split(&y, 0.2, 42).unwrap_err();
    assert!(matches!(err, PulseError::Split { count: 0, .. }));
}

#[test]
fn test_classifier_separates_noisy_clusters() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let n = 200;

    let mut rows = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let churn = i % 2 == 0;
        let center = if churn { 2.0 } else { -2.0 };
        rows.push([
            center + rng.gen_range(-1.0..1.0),
            -center + rng.gen_range(-1.0..1.0),
        ]);
        labels.push(if churn { 1.0 } else { 0.0 });
    }

    let x = Array2::from_shape_fn((n, 2), |(r, c)| rows[r][c]);
    let y = Array1::from_vec(labels);

    let mut model = LogisticRegression::new();
    model.fit(&x, &y).unwrap();

    let y_pred = model.predict(&x).unwrap();
    let confusion = ConfusionMatrix::from_predictions(&y, &y_pred).unwrap();
    assert!(confusion.accuracy() > 0.95);
}

#[test]
fn test_confusion_counts_cover_every_test_row() {
    let y_true = label_vector(40, 60);
    // Deliberately wrong on some rows
    let y_pred = Array1::from_iter(y_true.iter().enumerate().map(|(i, &v)| {
        if i % 7 == 0 {
            1.0 - v
        } else {
            v
        }
    }));

    let m = ConfusionMatrix::from_predictions(&y_true, &y_pred).unwrap();
    assert_eq!(m.total(), 100);
    let grid = m.grid();
    assert_eq!(grid.iter().flatten().sum::<usize>(), 100);
}

#[test]
fn test_accuracy_matches_count_formula() {
    let y_true = label_vector(10, 10);
    let y_pred = label_vector(20, 0);
    let m = ConfusionMatrix::from_predictions(&y_true, &y_pred).unwrap();

    let expected =
        (m.true_positives() + m.true_negatives()) as f64 / m.total() as f64;
    assert!((m.accuracy() - expected).abs() < 1e-9);
}

#[test]
fn test_report_keys_are_the_fixed_class_names() {
    let y = label_vector(5, 5);
    let m = ConfusionMatrix::from_predictions(&y, &y).unwrap();
    let report = ClassificationReport::from_confusion(&m);

    let keys: Vec<&String> = report.classes().map(|(name, _)| name).collect();
    assert_eq!(keys, vec!["Active (0)", "Churn (1)"]);
    for label in CLASS_LABELS {
        assert!(report.class(label).is_some());
    }
}

#[test]
fn test_never_predicted_class_has_undefined_precision() {
    let y_true = label_vector(3, 7);
    let y_pred = label_vector(0, 10); // never predicts churn
    let m = ConfusionMatrix::from_predictions(&y_true, &y_pred).unwrap();
    let report = ClassificationReport::from_confusion(&m);

    let churn = report.class("Churn (1)").unwrap();
    assert!(churn.precision.is_none());
    assert_eq!(churn.recall, Some(0.0));
}
