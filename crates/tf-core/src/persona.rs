//! Persona traits and the self-modification step.
//!
//! Performance metrics are synthetic. They are derived deterministically
//! from what a cycle did, so the same cycle always nudges the traits the
//! same way.

use serde::{Deserialize, Serialize};

use crate::constants::{ACTIVATION_FLOOR, EMBEDDING_DIM, MAX_TRAIT_STEP};

const SUCCESS_COMPOSITE: f32 = 0.8;
const STEADY_GROWTH: f64 = 1.1;
const RECOVERY_GROWTH: f64 = 1.2;
const SPAWN_SUCCESS_THRESHOLD: f32 = 0.8;
const SLOW_RESPONSE_MS: f32 = 1000.0;
const TRAIT_STEP: f64 = 0.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaTraits {
    pub creativity: f64,
    pub precision: f64,
    pub adaptation_rate: f64,
    pub recursion_depth: u32,
    pub bolt_integration: bool,
}

impl Default for PersonaTraits {
    fn default() -> Self {
        Self {
            creativity: 0.8,
            precision: 0.9,
            adaptation_rate: 0.1,
            recursion_depth: 3,
            bolt_integration: true,
        }
    }
}

impl PersonaTraits {
    pub fn clamp(&mut self) {
        self.creativity = self.creativity.clamp(0.0, 1.0);
        self.precision = self.precision.clamp(0.0, 1.0);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub success_rate: f32,
    pub response_time_ms: f32,
    pub user_satisfaction: f32,
    pub spawn_success: f32,
    pub memory_retrieval_quality: f32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            success_rate: 0.9,
            response_time_ms: 500.0,
            user_satisfaction: 0.85,
            spawn_success: 1.0,
            memory_retrieval_quality: 0.0,
        }
    }
}

impl PerformanceMetrics {
    /// Metrics for one decision cycle.
    pub fn synthesize(
        complexity: u8,
        spawn_attempts: usize,
        spawn_successes: usize,
        retrieval_similarities: &[f32],
    ) -> Self {
        let spawn_success = if spawn_attempts == 0 {
            1.0
        } else {
            spawn_successes as f32 / spawn_attempts as f32
        };
        let success_rate = if spawn_successes < spawn_attempts {
            0.5
        } else {
            0.95
        };
        let memory_retrieval_quality = if retrieval_similarities.is_empty() {
            0.0
        } else {
            retrieval_similarities.iter().sum::<f32>() / retrieval_similarities.len() as f32
        };

        Self {
            success_rate,
            response_time_ms: 200.0 + 150.0 * f32::from(complexity),
            user_satisfaction: 0.85,
            spawn_success,
            memory_retrieval_quality,
        }
    }

    /// Mean of success rate, satisfaction and spawn success.
    pub fn composite(&self) -> f32 {
        (self.success_rate + self.user_satisfaction + self.spawn_success) / 3.0
    }
}

/// Advisory tensor reshape. Never applied to mounted tensors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReshapeSuggestion {
    pub feedback_factor: f32,
    pub semantic_dimension: usize,
    pub activation_level: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfModification {
    pub metrics: PerformanceMetrics,
    pub before: PersonaTraits,
    pub after: PersonaTraits,
    pub reshape: ReshapeSuggestion,
}

/// Apply one adaptation step to `traits`.
pub fn self_modify(traits: &mut PersonaTraits, metrics: &PerformanceMetrics) -> SelfModification {
    let before = traits.clone();
    let composite = metrics.composite();
    let step = (traits.adaptation_rate * TRAIT_STEP).min(MAX_TRAIT_STEP);

    if metrics.spawn_success > SPAWN_SUCCESS_THRESHOLD {
        traits.creativity += step;
    } else {
        traits.creativity -= step;
    }
    traits.clamp();

    if metrics.response_time_ms > SLOW_RESPONSE_MS {
        traits.precision -= step;
    } else {
        traits.precision += step / 2.0;
    }
    traits.clamp();

    let growth = if composite > SUCCESS_COMPOSITE {
        STEADY_GROWTH
    } else {
        RECOVERY_GROWTH
    };
    traits.adaptation_rate *= growth;

    let feedback_factor = 0.5 + composite;
    let reshape = ReshapeSuggestion {
        feedback_factor,
        semantic_dimension: (EMBEDDING_DIM as f32 * feedback_factor).round() as usize,
        activation_level: ((metrics.memory_retrieval_quality * 128.0).round() as usize)
            .max(ACTIVATION_FLOOR),
    };

    tracing::debug!(
        composite,
        creativity = traits.creativity,
        precision = traits.precision,
        adaptation_rate = traits.adaptation_rate,
        "self-modification"
    );

    SelfModification {
        metrics: *metrics,
        before,
        after: traits.clone(),
        reshape,
    }
}
