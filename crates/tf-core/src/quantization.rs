use serde::{Deserialize, Serialize};

use crate::intent::{CognitiveIntent, Precision};
use crate::tensor::DType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantMethod {
    Linear,
    Dynamic,
    Adaptive,
}

/// Bit width and method chosen for a tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantizationStrategy {
    pub bits: u8,
    pub method: QuantMethod,
    pub preserve_accuracy: bool,
}

impl QuantizationStrategy {
    pub const fn full() -> Self {
        Self {
            bits: 32,
            method: QuantMethod::Adaptive,
            preserve_accuracy: true,
        }
    }

    pub const fn half() -> Self {
        Self {
            bits: 16,
            method: QuantMethod::Dynamic,
            preserve_accuracy: true,
        }
    }

    pub const fn byte() -> Self {
        Self {
            bits: 8,
            method: QuantMethod::Linear,
            preserve_accuracy: false,
        }
    }

    /// Storage dtype for this bit width.
    pub fn dtype(&self) -> DType {
        match self.bits {
            8 => DType::Uint8,
            16 => DType::Uint16,
            _ => DType::Float32,
        }
    }
}

/// Map an intent to its quantization strategy.
///
/// Order matters: realtime vision is forced to 8-bit before precision is
/// consulted, then high precision, then low precision or realtime.
pub fn optimize_quantization(intent: &CognitiveIntent) -> QuantizationStrategy {
    if intent.domain == "vision" && intent.realtime {
        return QuantizationStrategy::byte();
    }
    match intent.precision {
        Precision::High => QuantizationStrategy::full(),
        Precision::Low => QuantizationStrategy::byte(),
        Precision::Medium if intent.realtime => QuantizationStrategy::byte(),
        Precision::Medium => QuantizationStrategy::half(),
    }
}
