//! Random forest with bootstrap sampling and balanced class weights.

use super::tree::{DecisionTree, TreeConfig};
use super::balanced_class_weights;
use crate::config::ForestConfig;
use ndarray::ArrayView2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    seed: u64,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            trees: Vec::new(),
        }
    }

    /// Tree `i` draws its bootstrap sample and feature subsets from `seed + i`.
    pub fn fit(&mut self, x: ArrayView2<f64>, y: &[u8]) {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| ((n_features as f64).sqrt() as usize).max(1));
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: Some(max_features),
        };
        let class_weight = balanced_class_weights(y);

        self.trees = (0..self.config.n_trees)
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(i as u64));
                let mut counts = vec![0.0f64; n_samples];
                if self.config.bootstrap {
                    for _ in 0..n_samples {
                        counts[rng.gen_range(0..n_samples)] += 1.0;
                    }
                } else {
                    counts.fill(1.0);
                }
                let weights: Vec<f64> = counts
                    .iter()
                    .zip(y)
                    .map(|(c, &label)| c * class_weight[usize::from(label > 0)])
                    .collect();

                let mut tree = DecisionTree::new(tree_config.clone());
                tree.fit(x, y, &weights, &mut rng);
                tree
            })
            .collect();

        tracing::debug!(
            trees = self.trees.len(),
            max_features,
            "random forest fitted"
        );
    }

    /// Mean of the trees' positive-class probabilities.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        self.trees.iter().map(|t| t.predict_proba(row)).sum::<f64>() / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 15,
            max_depth: 6,
            min_samples_split: 3,
            min_samples_leaf: 2,
            max_features: None,
            bootstrap: true,
        }
    }

    #[test]
    fn learns_single_feature_rule() {
        let x = Array2::from_shape_fn((80, 2), |(i, j)| if j == 0 { i as f64 } else { 1.0 });
        let y: Vec<u8> = (0..80).map(|i| u8::from(i >= 40)).collect();
        let mut forest = RandomForest::new(small_config(), 42);
        forest.fit(x.view(), &y);

        assert_eq!(forest.n_trees(), 15);
        assert!(forest.predict_proba(&[5.0, 1.0]) < 0.2);
        assert!(forest.predict_proba(&[75.0, 1.0]) > 0.8);
    }

    #[test]
    fn same_seed_same_forest() {
        let x = Array2::from_shape_fn((40, 3), |(i, j)| ((i * 7 + j * 3) % 11) as f64);
        let y: Vec<u8> = (0..40).map(|i| u8::from(i % 3 == 0)).collect();
        let mut a = RandomForest::new(small_config(), 9);
        let mut b = RandomForest::new(small_config(), 9);
        a.fit(x.view(), &y);
        b.fit(x.view(), &y);
        assert_eq!(a, b);
    }
}
