use serde::{Deserialize, Serialize};

use crate::intent::CognitiveIntent;
use crate::quantization::QuantizationStrategy;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchitectureKind {
    Transformer,
    Cnn,
    Rnn,
    Hybrid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationGoal {
    Speed,
    Memory,
    Accuracy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    pub kind: ArchitectureKind,
    pub layers: u32,
    pub parameters: u64,
    pub optimization: OptimizationGoal,
}

/// Complexity above which a multimodal domain becomes a hybrid architecture.
const HYBRID_COMPLEXITY: u8 = 7;

/// Select an architecture for an intent under a quantization strategy.
pub fn select_architecture(
    intent: &CognitiveIntent,
    quantization: &QuantizationStrategy,
) -> Architecture {
    let kind = match intent.domain.as_str() {
        "vision" => ArchitectureKind::Cnn,
        "sequence" => ArchitectureKind::Rnn,
        _ if intent.task.contains("time") => ArchitectureKind::Rnn,
        "nlp" => ArchitectureKind::Transformer,
        "multimodal" if intent.complexity > HYBRID_COMPLEXITY => ArchitectureKind::Hybrid,
        _ => ArchitectureKind::Transformer,
    };

    let optimization = if intent.realtime || quantization.bits == 8 {
        OptimizationGoal::Speed
    } else if quantization.bits == 16 {
        OptimizationGoal::Memory
    } else {
        OptimizationGoal::Accuracy
    };

    let complexity = u32::from(intent.complexity);
    Architecture {
        kind,
        layers: (complexity * 3 / 2).max(2),
        parameters: 1u64 << (complexity + 10),
        optimization,
    }
}
