//! Embedding capability.
//!
//! The agent only depends on [`Embedder`]; the bundled [`SyntheticEmbedder`]
//! produces random vectors in [-1, 1]. A real model can be dropped in
//! without touching the control loop.

use std::hash::{DefaultHasher, Hash, Hasher};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::constants::EMBEDDING_DIM;

pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Random embeddings. With a seed, the vector is a pure function of
/// `(seed, text)`, so identical texts embed identically.
#[derive(Clone, Debug)]
pub struct SyntheticEmbedder {
    dimension: usize,
    seed: Option<u64>,
}

impl SyntheticEmbedder {
    pub fn random(dimension: usize) -> Self {
        Self {
            dimension,
            seed: None,
        }
    }

    pub fn seeded(dimension: usize, seed: u64) -> Self {
        Self {
            dimension,
            seed: Some(seed),
        }
    }

    fn fill(&self, rng: &mut impl Rng) -> Vec<f32> {
        (0..self.dimension)
            .map(|_| rng.random_range(-1.0f32..=1.0))
            .collect()
    }
}

impl Default for SyntheticEmbedder {
    fn default() -> Self {
        Self::random(EMBEDDING_DIM)
    }
}

impl Embedder for SyntheticEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        match self.seed {
            Some(seed) => {
                let mut hasher = DefaultHasher::new();
                seed.hash(&mut hasher);
                text.hash(&mut hasher);
                self.fill(&mut SmallRng::seed_from_u64(hasher.finish()))
            }
            None => self.fill(&mut rand::rng()),
        }
    }
}

/// Cosine similarity. Zero-norm or mismatched vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dimension_and_range() {
        let e = SyntheticEmbedder::default();
        let v = e.embed("hello");
        assert_eq!(v.len(), EMBEDDING_DIM);
        assert!(v.iter().all(|x| (-1.0..=1.0).contains(x)));
    }

    #[test]
    fn test_seeded_is_deterministic_per_text() {
        let e = SyntheticEmbedder::seeded(16, 7);
        assert_eq!(e.embed("alpha"), e.embed("alpha"));
        assert_ne!(e.embed("alpha"), e.embed("beta"));
        assert_ne!(
            e.embed("alpha"),
            SyntheticEmbedder::seeded(16, 8).embed("alpha")
        );
    }

    #[test]
    fn test_cosine_identity_and_opposite() {
        let a = [1.0, 2.0, 3.0];
        let neg = [-1.0, -2.0, -3.0];
        assert_relative_eq!(cosine_similarity(&a, &a), 1.0, epsilon = 1e-6);
        assert_relative_eq!(cosine_similarity(&a, &neg), -1.0, epsilon = 1e-6);
        assert_relative_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }
}
