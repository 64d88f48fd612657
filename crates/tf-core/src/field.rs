//! The tensor field: a mount table keyed by path.
//!
//! `mount` derives intent → quantization → architecture from the path and
//! fills a fresh buffer. `remount` reinterprets an existing tensor's data
//! under the configuration of a new path, keeping its shape.

use std::collections::{BTreeMap, HashMap};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::architecture::{Architecture, select_architecture};
use crate::constants::TENSOR_SHAPE;
use crate::error::{CoreError, Result};
use crate::intent::{CognitiveIntent, Precision, parse_intent};
use crate::quantization::{QuantizationStrategy, optimize_quantization};
use crate::tensor::{Tensor, TensorData};

/// Domains covered by the quantum-state catalog.
const CATALOG_DOMAINS: &[&str] = &["general", "multimodal", "nlp", "sequence", "vision"];

/// Candidate weights per precision level; each domain's column sums to 1.0.
const CATALOG_WEIGHTS: &[(Precision, bool, f64)] = &[
    (Precision::High, false, 0.5),
    (Precision::Medium, false, 0.3),
    (Precision::Low, true, 0.2),
];

/// One precomputed candidate configuration for a domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuantumState {
    pub architecture: Architecture,
    pub quantization: QuantizationStrategy,
    pub probability: f64,
}

pub struct TensorField {
    mounts: HashMap<String, Tensor>,
    shape: Vec<usize>,
    rng: SmallRng,
    quantum_states: BTreeMap<String, Vec<QuantumState>>,
}

impl TensorField {
    pub fn new(shape: Vec<usize>) -> Self {
        Self::with_rng(shape, SmallRng::from_os_rng())
    }

    /// Deterministic sample generation, for tests and reproducible runs.
    pub fn seeded(shape: Vec<usize>, seed: u64) -> Self {
        Self::with_rng(shape, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(shape: Vec<usize>, rng: SmallRng) -> Self {
        let count = shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim));
        let shape = match count {
            Some(n) if n > 0 && !shape.is_empty() => shape,
            _ => {
                tracing::warn!(?shape, "unusable tensor shape, using default");
                TENSOR_SHAPE.to_vec()
            }
        };
        Self {
            mounts: HashMap::new(),
            shape,
            rng,
            quantum_states: build_quantum_states(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Create a tensor for `path` and register it, replacing any prior entry.
    pub fn mount(&mut self, path: &str) -> Result<Tensor> {
        let (intent, quantization, architecture) = configure(path)?;
        let data = TensorData::random(quantization.dtype(), self.element_count(), &mut self.rng);

        let tensor = Tensor {
            id: Uuid::new_v4(),
            data,
            shape: self.shape.clone(),
            architecture,
            quantization,
        };

        tracing::debug!(
            path,
            domain = %intent.domain,
            task = %intent.task,
            dtype = %tensor.dtype(),
            "mounted tensor"
        );
        self.mounts.insert(path.to_string(), tensor.clone());
        Ok(tensor)
    }

    /// Reinterpret `source` under the configuration derived from `new_path`.
    /// The source tensor is untouched; the result gets a fresh id and keeps
    /// the source shape.
    pub fn remount(&mut self, source: &Tensor, new_path: &str) -> Result<Tensor> {
        let (_, quantization, architecture) = configure(new_path)?;
        let data = source.data.convert(quantization.dtype());

        let tensor = Tensor {
            id: Uuid::new_v4(),
            data,
            shape: source.shape.clone(),
            architecture,
            quantization,
        };

        tracing::debug!(
            new_path,
            from = %source.dtype(),
            to = %tensor.dtype(),
            "remounted tensor"
        );
        self.mounts.insert(new_path.to_string(), tensor.clone());
        Ok(tensor)
    }

    /// Remount whatever is currently mounted at `source_path`.
    pub fn remount_path(&mut self, source_path: &str, new_path: &str) -> Result<Tensor> {
        let source = self
            .mounts
            .get(source_path)
            .cloned()
            .ok_or_else(|| CoreError::NotMounted(source_path.to_string()))?;
        self.remount(&source, new_path)
    }

    /// Remove the entry at `path`. Returns whether one existed.
    pub fn unmount(&mut self, path: &str) -> bool {
        let existed = self.mounts.remove(path).is_some();
        tracing::debug!(path, existed, "unmount");
        existed
    }

    pub fn get(&self, path: &str) -> Option<&Tensor> {
        self.mounts.get(path)
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Mount paths in sorted order.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.mounts.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Snapshot of the mount table, ordered by path.
    pub fn mounted_tensors(&self) -> BTreeMap<String, Tensor> {
        self.mounts
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Static catalog of candidate configurations per domain.
    /// Introspection only; mount and remount never consult it.
    pub fn quantum_states(&self) -> &BTreeMap<String, Vec<QuantumState>> {
        &self.quantum_states
    }
}

/// Run the three selectors for a path.
pub fn configure(path: &str) -> Result<(CognitiveIntent, QuantizationStrategy, Architecture)> {
    let intent = parse_intent(path)?;
    let quantization = optimize_quantization(&intent);
    let architecture = select_architecture(&intent, &quantization);
    Ok((intent, quantization, architecture))
}

fn build_quantum_states() -> BTreeMap<String, Vec<QuantumState>> {
    CATALOG_DOMAINS
        .iter()
        .map(|domain| {
            let states = CATALOG_WEIGHTS
                .iter()
                .map(|&(precision, realtime, probability)| {
                    let intent = CognitiveIntent {
                        domain: domain.to_string(),
                        task: "inference".to_string(),
                        precision,
                        realtime,
                        complexity: catalog_complexity(domain, precision),
                    };
                    let quantization = optimize_quantization(&intent);
                    QuantumState {
                        architecture: select_architecture(&intent, &quantization),
                        quantization,
                        probability,
                    }
                })
                .collect();
            (domain.to_string(), states)
        })
        .collect()
}

fn catalog_complexity(domain: &str, precision: Precision) -> u8 {
    let base: u8 = match domain {
        "nlp" | "multimodal" => 8,
        "vision" => 7,
        _ => 5,
    };
    match precision {
        Precision::High => (base + 2).min(10),
        Precision::Medium => base,
        Precision::Low => base - 1,
    }
}
