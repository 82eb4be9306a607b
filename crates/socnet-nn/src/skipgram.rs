//! Skip-gram with negative sampling over random-walk corpora.
//!
//! Nodes that appear in similar walk contexts end up with similar vectors.
//!
//! # Objective
//!
//! For each (target, context) pair inside a window, maximize
//! `log σ(v_c · v_t)` and, for `k` sampled negatives `n`,
//! `log σ(-v_n · v_t)`. Negatives are drawn from the walk-frequency
//! distribution raised to 0.75.
//!
//! # References
//!
//! - Mikolov et al. (2013). "Distributed Representations of Words and Phrases."
//! - Levy & Goldberg (2014). "Neural Word Embedding as Implicit Matrix Factorization."

use crate::deadline::Deadline;
use crate::error::Result;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

/// Entries in the negative sampling table per node.
const NEG_TABLE_PER_NODE: usize = 100;

/// Skip-gram model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipGramConfig {
    /// Embedding dimension.
    pub embedding_dim: usize,
    /// Context window size (each side).
    pub window_size: usize,
    /// Number of negative samples per positive.
    pub negative_samples: usize,
    /// Passes over the walk corpus.
    pub epochs: usize,
    /// Initial learning rate.
    pub learning_rate: f32,
    /// Minimum learning rate (for decay).
    pub min_learning_rate: f32,
    /// Random seed.
    pub seed: u64,
}

impl Default for SkipGramConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 16,
            window_size: 5,
            negative_samples: 5,
            epochs: 1,
            learning_rate: 0.025,
            min_learning_rate: 0.0001,
            seed: 42,
        }
    }
}

/// Skip-gram model for node embedding training.
///
/// Uses two embedding matrices:
/// - `embeddings`: Target node embeddings (what we output)
/// - `context`: Context embeddings (discarded after training)
pub struct SkipGram {
    /// Target embeddings: (num_nodes, embedding_dim)
    embeddings: Vec<f32>,
    /// Context embeddings: (num_nodes, embedding_dim)
    context: Vec<f32>,
    config: SkipGramConfig,
    /// Negative sampling table (unigram^0.75)
    neg_table: Vec<u32>,
    current_lr: f32,
    words_processed: usize,
    total_words: usize,
    rng: StdRng,
}

impl SkipGram {
    /// Create a model with small random target embeddings.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(num_nodes: usize, config: SkipGramConfig) -> Self {
        let dim = config.embedding_dim.max(1);
        let mut rng = StdRng::seed_from_u64(config.seed);
        let bound = 0.5 / dim as f32;
        let embeddings: Vec<f32> = match Uniform::new(-bound, bound) {
            Ok(dist) => (0..num_nodes * dim).map(|_| dist.sample(&mut rng)).collect(),
            Err(_) => vec![0.0; num_nodes * dim],
        };

        Self {
            embeddings,
            // Context embeddings start at zero
            context: vec![0.0; num_nodes * dim],
            config: SkipGramConfig {
                embedding_dim: dim,
                ..config
            },
            neg_table: (0..num_nodes as u32).collect(),
            current_lr: config.learning_rate,
            words_processed: 0,
            total_words: 0,
            rng,
        }
    }

    /// Rebuild the negative sampling table from node frequencies.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn build_neg_table(&mut self, frequencies: &[u32]) {
        let total: f64 = frequencies.iter().map(|&f| f64::from(f).powf(0.75)).sum();
        if total <= 0.0 {
            return;
        }
        let table_size = frequencies.len() * NEG_TABLE_PER_NODE;
        let mut table = Vec::with_capacity(table_size);
        let mut cumulative = 0.0;
        for (node, &freq) in frequencies.iter().enumerate() {
            cumulative += f64::from(freq).powf(0.75) / total;
            let upto = ((cumulative * table_size as f64) as usize).min(table_size);
            table.resize(upto.max(table.len()), node as u32);
        }
        if let Some(&last) = table.last() {
            table.resize(table_size, last);
        }
        if !table.is_empty() {
            self.neg_table = table;
        }
    }

    /// Train `config.epochs` passes over the walks, checking the deadline
    /// before every walk.
    pub fn train(&mut self, walks: &[Vec<u32>], deadline: &Deadline) -> Result<()> {
        let mut frequencies = vec![0u32; self.num_nodes()];
        for &node in walks.iter().flatten() {
            frequencies[node as usize] += 1;
        }
        self.build_neg_table(&frequencies);
        self.total_words = walks.iter().map(Vec::len).sum::<usize>() * self.config.epochs;

        for epoch in 0..self.config.epochs {
            for walk in walks {
                deadline.check(0)?;
                self.train_walk(walk);
            }
            tracing::debug!(epoch, lr = self.current_lr, "skip-gram epoch done");
        }
        Ok(())
    }

    /// Train on a single walk.
    pub fn train_walk(&mut self, walk: &[u32]) {
        let window = self.config.window_size.max(1);
        for (pos, &target) in walk.iter().enumerate() {
            // Dynamic window: sample actual window size
            let actual_window = self.rng.random_range(1..=window);
            let start = pos.saturating_sub(actual_window);
            let end = (pos + actual_window + 1).min(walk.len());

            for ctx_pos in start..end {
                if ctx_pos == pos {
                    continue;
                }
                let context_node = walk[ctx_pos] as usize;
                self.train_pair(target as usize, context_node, true);

                for _ in 0..self.config.negative_samples {
                    let slot = self.rng.random_range(0..self.neg_table.len());
                    let neg_node = self.neg_table[slot] as usize;
                    if neg_node != context_node {
                        self.train_pair(target as usize, neg_node, false);
                    }
                }
            }

            self.words_processed += 1;
            self.update_lr();
        }
    }

    /// One SGD step on a (target, context) pair.
    fn train_pair(&mut self, target: usize, context: usize, positive: bool) {
        let dim = self.config.embedding_dim;
        let t_offset = target * dim;
        let c_offset = context * dim;

        let dot: f32 = (0..dim)
            .map(|i| self.embeddings[t_offset + i] * self.context[c_offset + i])
            .sum();

        let label = if positive { 1.0 } else { 0.0 };
        let sigmoid = 1.0 / (1.0 + (-dot).exp());
        let grad = (label - sigmoid) * self.current_lr;

        for i in 0..dim {
            let t_grad = grad * self.context[c_offset + i];
            let c_grad = grad * self.embeddings[t_offset + i];
            self.embeddings[t_offset + i] += t_grad;
            self.context[c_offset + i] += c_grad;
        }
    }

    /// Linear decay towards `min_learning_rate`.
    fn update_lr(&mut self) {
        if self.total_words == 0 {
            return;
        }
        let progress = self.words_processed as f32 / self.total_words as f32;
        self.current_lr = (self.config.learning_rate
            - (self.config.learning_rate - self.config.min_learning_rate) * progress)
            .max(self.config.min_learning_rate);
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.embeddings.len() / self.config.embedding_dim
    }

    /// Embedding dimension.
    pub fn dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Embedding for a specific node.
    pub fn embedding(&self, node: usize) -> &[f32] {
        let dim = self.config.embedding_dim;
        &self.embeddings[node * dim..(node + 1) * dim]
    }

    /// Take the target embeddings (num_nodes * embedding_dim, row-major).
    pub fn into_embeddings(self) -> Vec<f32> {
        self.embeddings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        dot / (na * nb)
    }

    #[test]
    fn test_shapes() {
        let model = SkipGram::new(5, SkipGramConfig::default());
        assert_eq!(model.num_nodes(), 5);
        assert_eq!(model.embedding(4).len(), 16);
    }

    #[test]
    fn test_cooccurring_nodes_move_together() {
        // two disjoint cliques {0,1,2} and {3,4,5}
        let mut walks = Vec::new();
        for _ in 0..200 {
            walks.push(vec![0, 1, 2, 0, 2, 1, 0]);
            walks.push(vec![3, 4, 5, 3, 5, 4, 3]);
        }
        let config = SkipGramConfig {
            window_size: 2,
            epochs: 3,
            ..SkipGramConfig::default()
        };
        let mut model = SkipGram::new(6, config);
        model.train(&walks, &Deadline::start(Duration::from_secs(3600))).unwrap();

        let same = cosine(model.embedding(0), model.embedding(1));
        let other = cosine(model.embedding(0), model.embedding(4));
        assert!(same > other, "same-clique {same} vs cross-clique {other}");
    }

    #[test]
    fn test_seeded_training_is_reproducible() {
        let walks = vec![vec![0, 1, 2, 1, 0], vec![2, 1, 0, 1, 2]];
        let run = || {
            let mut m = SkipGram::new(3, SkipGramConfig::default());
            m.train(&walks, &Deadline::start(Duration::from_secs(3600))).unwrap();
            m.into_embeddings()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_neg_table_follows_frequency() {
        let mut model = SkipGram::new(2, SkipGramConfig::default());
        model.build_neg_table(&[16, 1]);
        let zeros = model.neg_table.iter().filter(|&&n| n == 0).count();
        assert_eq!(model.neg_table.len(), 200);
        // 16^0.75 = 8 → 8/9 of the table
        assert!((170..=180).contains(&zeros), "{zeros}");
    }
}
