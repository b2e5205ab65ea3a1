//! L2-regularized logistic regression with balanced class weights, fit by full-batch gradient descent.

use super::balanced_class_weights;
use crate::config::LogisticConfig;
use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: LogisticConfig,
    coefficients: Vec<f64>,
    intercept: f64,
    /// Iterations run by the last fit
    n_iter: usize,
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    pub fn new(config: LogisticConfig) -> Self {
        Self {
            config,
            coefficients: Vec::new(),
            intercept: 0.0,
            n_iter: 0,
        }
    }

    /// Minimizes `Σ sᵢ·logloss(i) / S + ‖w‖² / (2·C·S)` where `sᵢ` are the class weights and `S` their sum.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: &[u8]) {
        let class_weight = balanced_class_weights(y);
        let sample_weight: Array1<f64> = y
            .iter()
            .map(|&l| class_weight[usize::from(l > 0)])
            .collect();
        let target: Array1<f64> = y.iter().map(|&l| f64::from(u8::from(l > 0))).collect();
        let total = sample_weight.sum().max(f64::EPSILON);
        let alpha = 1.0 / (self.config.c * total);

        let mut w = Array1::<f64>::zeros(x.ncols());
        let mut b = 0.0;
        let mut previous = f64::INFINITY;
        self.n_iter = 0;

        for iter in 0..self.config.max_iter {
            let p = (x.dot(&w) + b).mapv(sigmoid);
            let residual = (&p - &target) * &sample_weight;

            let eps = 1e-15;
            let data_loss: f64 = p
                .iter()
                .zip(target.iter())
                .zip(sample_weight.iter())
                .map(|((&pi, &ti), &si)| {
                    let pc = pi.clamp(eps, 1.0 - eps);
                    -si * (ti * pc.ln() + (1.0 - ti) * (1.0 - pc).ln())
                })
                .sum::<f64>()
                / total;
            let loss = data_loss + 0.5 * alpha * w.dot(&w);

            let grad_w = x.t().dot(&residual) / total + &w * alpha;
            let grad_b = residual.sum() / total;
            w = w - grad_w * self.config.learning_rate;
            b -= grad_b * self.config.learning_rate;
            self.n_iter = iter + 1;

            if (previous - loss).abs() < self.config.tolerance {
                break;
            }
            previous = loss;
        }

        tracing::debug!(iterations = self.n_iter, "logistic regression fitted");
        self.coefficients = w.to_vec();
        self.intercept = b;
    }

    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let z: f64 = self
            .coefficients
            .iter()
            .zip(row)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.intercept;
        sigmoid(z)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}
