use serde::{Deserialize, Serialize};

use crate::constants::{
    EMBEDDING_DIM, MAX_RESULTS, RETRIEVAL_THRESHOLD, TENSOR_SHAPE, WINDOW_CAPACITY, WINDOW_RETAIN,
};
use crate::persona::PersonaTraits;

/// Agent construction parameters. Every field has a default, so partial
/// documents deserialize.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub persona: PersonaTraits,
    pub memory: MemoryConfig,
    pub embedding: EmbeddingConfig,
    pub tensor: TensorConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub window_capacity: usize,
    pub window_retain: usize,
    pub retrieval_threshold: f64,
    pub max_results: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window_capacity: WINDOW_CAPACITY,
            window_retain: WINDOW_RETAIN,
            retrieval_threshold: RETRIEVAL_THRESHOLD,
            max_results: MAX_RESULTS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub dimension: usize,
    /// When set, embeddings are deterministic per text.
    pub seed: Option<u64>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: EMBEDDING_DIM,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensorConfig {
    pub shape: Vec<usize>,
    /// When set, mount sample generation is reproducible.
    pub seed: Option<u64>,
}

impl Default for TensorConfig {
    fn default() -> Self {
        Self {
            shape: TENSOR_SHAPE.to_vec(),
            seed: None,
        }
    }
}
