//! Weighted binary decision tree (Gini impurity), the building block of the forest.

use ndarray::ArrayView2;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Smallest impurity decrease accepted as a split.
const MIN_GAIN: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features sampled per split (all when `None`)
    pub max_features: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        /// Weighted fraction of positive samples reaching this leaf
        positive: f64,
        n_samples: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Split { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Class weight totals (negative, positive) of a node.
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    neg: f64,
    pos: f64,
}

impl Totals {
    fn add(&mut self, label: u8, weight: f64) {
        if label > 0 {
            self.pos += weight;
        } else {
            self.neg += weight;
        }
    }

    fn sum(&self) -> f64 {
        self.neg + self.pos
    }

    fn gini(&self) -> f64 {
        let total = self.sum();
        if total <= 0.0 {
            return 0.0;
        }
        let p = self.pos / total;
        2.0 * p * (1.0 - p)
    }
}

/// Midpoint of two adjacent distinct values. When the midpoint rounds up to `next`, `here` is
/// used instead so `next` still goes right under `<=`.
fn split_threshold(here: f64, next: f64) -> f64 {
    let threshold = (here + next) / 2.0;
    if threshold >= next {
        here
    } else {
        threshold
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self { config, root: None }
    }

    /// Fit on rows of `x`; samples with zero weight are left out entirely.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: &[u8], weights: &[f64], rng: &mut ChaCha8Rng) {
        let indices: Vec<usize> = (0..x.nrows()).filter(|&i| weights[i] > 0.0).collect();
        self.root = Some(self.build(x, y, weights, &indices, 0, rng));
    }

    fn build(
        &self,
        x: ArrayView2<f64>,
        y: &[u8],
        weights: &[f64],
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let mut totals = Totals::default();
        for &i in indices {
            totals.add(y[i], weights[i]);
        }
        let leaf = || TreeNode::Leaf {
            positive: if totals.sum() > 0.0 {
                totals.pos / totals.sum()
            } else {
                0.5
            },
            n_samples: indices.len(),
        };

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || totals.neg == 0.0
            || totals.pos == 0.0
        {
            return leaf();
        }

        match self.best_split(x, y, weights, indices, totals, rng) {
            Some(split) => TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left: Box::new(self.build(x, y, weights, &split.left, depth + 1, rng)),
                right: Box::new(self.build(x, y, weights, &split.right, depth + 1, rng)),
            },
            None => leaf(),
        }
    }

    /// Sorted sweep over a random feature subset; returns the split with the largest weighted gain.
    /// Features constant within the node do not count towards `max_features`.
    fn best_split(
        &self,
        x: ArrayView2<f64>,
        y: &[u8],
        weights: &[f64],
        indices: &[usize],
        parent: Totals,
        rng: &mut ChaCha8Rng,
    ) -> Option<SplitCandidate> {
        let n_features = x.ncols();
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(rng);
        let max_features = self.config.max_features.unwrap_or(n_features).clamp(1, n_features);
        let mut visited = 0;

        let min_leaf = self.config.min_samples_leaf.max(1);
        let parent_impurity = parent.gini() * parent.sum();
        let mut best: Option<SplitCandidate> = None;
        let mut sorted = indices.to_vec();

        for feature in features {
            if visited == max_features {
                break;
            }
            sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));
            if x[[sorted[0], feature]] == x[[sorted[sorted.len() - 1], feature]] {
                continue;
            }
            visited += 1;

            let mut left = Totals::default();
            for pos in 0..sorted.len() - 1 {
                let i = sorted[pos];
                left.add(y[i], weights[i]);

                let here = x[[i, feature]];
                let next = x[[sorted[pos + 1], feature]];
                if here == next {
                    continue;
                }
                let n_left = pos + 1;
                if n_left < min_leaf || sorted.len() - n_left < min_leaf {
                    continue;
                }

                let right = Totals {
                    neg: parent.neg - left.neg,
                    pos: parent.pos - left.pos,
                };
                let gain =
                    parent_impurity - left.gini() * left.sum() - right.gini() * right.sum();
                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: split_threshold(here, next),
                        gain,
                        left: sorted[..n_left].to_vec(),
                        right: sorted[n_left..].to_vec(),
                    });
                }
            }
        }

        best
    }

    /// Positive-class probability for one feature row.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut node = match &self.root {
            Some(n) => n,
            None => return 0.5,
        };
        loop {
            match node {
                TreeNode::Leaf { positive, .. } => return *positive,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left.as_ref()
                    } else {
                        right.as_ref()
                    };
                }
            }
        }
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }
}
