//! Stratified splitting, k-fold cross-validation splits and classification metrics.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Row indices on each side of a split, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

fn indices_by_class(labels: &[u8]) -> [Vec<usize>; 2] {
    let mut by_class: [Vec<usize>; 2] = Default::default();
    for (i, &l) in labels.iter().enumerate() {
        by_class[usize::from(l > 0)].push(i);
    }
    by_class
}

/// Shuffle each class with one seeded RNG and send `round(n_c · test_ratio)` of it to the test side.
pub fn stratified_split(labels: &[u8], test_ratio: f64, seed: u64) -> Split {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut split = Split {
        train: Vec::with_capacity(labels.len()),
        test: Vec::new(),
    };
    for mut class in indices_by_class(labels) {
        class.shuffle(&mut rng);
        let n_test = ((class.len() as f64) * test_ratio.clamp(0.0, 1.0)).round() as usize;
        split.test.extend_from_slice(&class[..n_test]);
        split.train.extend_from_slice(&class[n_test..]);
    }
    split.train.sort_unstable();
    split.test.sort_unstable();
    split
}

/// Stratified k-fold without shuffling: each class is cut into `k` contiguous chunks in row order,
/// the first `n_c mod k` chunks one row larger; fold `i` tests on the `i`-th chunk of every class.
pub fn stratified_k_fold(labels: &[u8], k: usize) -> Vec<Split> {
    let by_class = indices_by_class(labels);
    let mut test_folds: Vec<Vec<usize>> = vec![Vec::new(); k];
    for class in &by_class {
        let base = class.len() / k;
        let extra = class.len() % k;
        let mut start = 0;
        for (fold, test) in test_folds.iter_mut().enumerate() {
            let size = base + usize::from(fold < extra);
            test.extend_from_slice(&class[start..start + size]);
            start += size;
        }
    }
    test_folds
        .into_iter()
        .map(|mut test| {
            test.sort_unstable();
            let train = (0..labels.len())
                .filter(|i| test.binary_search(i).is_err())
                .collect();
            Split { train, test }
        })
        .collect()
}

/// Fraction of matching labels; 0.0 for empty input.
pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// Mean and population standard deviation.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class precision/recall/F1 for the binary label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub negative: ClassMetrics,
    pub positive: ClassMetrics,
    pub accuracy: f64,
}

impl ClassificationReport {
    pub fn new(y_true: &[u8], y_pred: &[u8]) -> Self {
        let metrics = |class: bool| {
            let mut tp = 0usize;
            let mut fp = 0usize;
            let mut fn_ = 0usize;
            for (&t, &p) in y_true.iter().zip(y_pred) {
                match ((t > 0) == class, (p > 0) == class) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_ += 1,
                    (false, false) => {}
                }
            }
            let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
            let precision = ratio(tp, tp + fp);
            let recall = ratio(tp, tp + fn_);
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            ClassMetrics {
                precision,
                recall,
                f1,
                support: tp + fn_,
            }
        };
        Self {
            negative: metrics(false),
            positive: metrics(true),
            accuracy: accuracy(y_true, y_pred),
        }
    }
}
