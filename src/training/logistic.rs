//! Binary logistic regression

use crate::error::{PulseError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// L2-regularized logistic regression fitted by gradient descent.
///
/// The decision boundary is linear in the design-matrix coordinates: one
/// weight per column plus a bias term, both exposed for the interpretation
/// layer. Fitting is a single deterministic attempt; a non-finite gradient
/// aborts with [`PulseError::Fit`], while merely exhausting the iteration
/// budget keeps the fit and logs a warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
    /// L2 regularization strength
    pub l2: f64,
    /// Maximum gradient-descent iterations
    pub max_iter: usize,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
    /// Learning rate
    pub learning_rate: f64,
    converged: bool,
    is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            l2: 0.01,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
            converged: false,
            is_fitted: false,
        }
    }

    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Fit weights and bias to minimize regularized logistic loss.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(PulseError::Shape {
                expected: format!("y length = {n_samples}"),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(PulseError::Fit("no training rows".to_string()));
        }

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = 0.0;
        self.converged = false;

        for iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);

            let errors = &predictions - y;
            let dw = (x.t().dot(&errors) / n_samples as f64) + (self.l2 * &weights);
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if !grad_norm.is_finite() {
                return Err(PulseError::Fit(format!(
                    "non-finite gradient at iteration {iter}"
                )));
            }
            if grad_norm < self.tol {
                self.converged = true;
                break;
            }

            weights = weights - self.learning_rate * dw;
            bias -= self.learning_rate * db;
        }

        if !self.converged {
            warn!(
                max_iter = self.max_iter,
                tol = self.tol,
                "gradient descent stopped at iteration budget without reaching tolerance"
            );
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        self.is_fitted = true;
        Ok(self)
    }

    /// Predicted probability of the positive (churn) class
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self.coefficients()?;
        let intercept = self.intercept()?;

        if x.ncols() != coefficients.len() {
            return Err(PulseError::Shape {
                expected: format!("{} columns", coefficients.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let linear = x.dot(coefficients) + intercept;
        Ok(Self::sigmoid(&linear))
    }

    /// Predicted class labels at the 0.5 threshold
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    /// Fitted weight vector, one entry per design-matrix column
    pub fn coefficients(&self) -> Result<&Array1<f64>> {
        self.coefficients.as_ref().ok_or(PulseError::ModelNotFitted)
    }

    /// Fitted bias term
    pub fn intercept(&self) -> Result<f64> {
        self.intercept.ok_or(PulseError::ModelNotFitted)
    }

    /// Whether the last fit reached the gradient tolerance
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
