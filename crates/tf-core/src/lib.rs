//! Path-driven tensor field with a bounded-memory decision loop.
//!
//! A mount path is read as a cognitive intent (domain, task, precision,
//! realtime, complexity), mapped to a quantization strategy and an
//! architecture, and materialized as a dtype-tagged tensor. Remounting
//! reinterprets existing numeric data under a new configuration.
//!
//! Around the field sits an observe/orient/decide/act loop with an adapt
//! step: it stores context in a size-bounded embedding memory, retrieves by
//! cosine similarity, spawns depth-limited repositories and nudges persona
//! traits from synthetic feedback.
//!
//! Zero I/O. Callers construct a [`CognitiveAgent`] and own it.

pub mod agent;
pub mod architecture;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod error;
pub mod field;
pub mod intent;
pub mod memory;
pub mod ooda;
pub mod persona;
pub mod quantization;
pub mod spawn;
pub mod tensor;

pub use agent::{CognitiveAgent, IntentResult, Introspection};
pub use architecture::{Architecture, ArchitectureKind, OptimizationGoal, select_architecture};
pub use config::{AgentConfig, EmbeddingConfig, MemoryConfig, TensorConfig};
pub use constants::{EMBEDDING_DIM, RETRIEVAL_THRESHOLD, WINDOW_CAPACITY, WINDOW_RETAIN};
pub use embedding::{Embedder, SyntheticEmbedder, cosine_similarity};
pub use error::{CoreError, Result};
pub use field::{QuantumState, TensorField};
pub use intent::{CognitiveIntent, Precision, parse_intent};
pub use memory::{MemoryStore, RetrievedMemory};
pub use ooda::OodaCycle;
pub use persona::{PerformanceMetrics, PersonaTraits, ReshapeSuggestion, SelfModification};
pub use quantization::{QuantMethod, QuantizationStrategy, optimize_quantization};
pub use spawn::{ArchitectureTag, ArtifactBundle, MemoryExtension, RepoSpawnRequest, SpawnedRepository};
pub use tensor::{DType, Tensor, TensorData, TensorSummary};
