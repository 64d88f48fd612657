//! Dtype-tagged tensor buffers and the remount conversion table.
//!
//! Conversions are element-wise and never touch the shape:
//!
//! | from \ to | float32        | uint8              | uint16          |
//! |-----------|----------------|--------------------|-----------------|
//! | float32   | copy           | ×255, round, clamp | ×65535, round, clamp |
//! | uint8     | ÷255           | copy               | ×257            |
//! | uint16    | ÷65535         | ÷257, round        | copy            |

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::architecture::Architecture;
use crate::constants::{U8_MAX, U8_U16_RATIO, U16_MAX};
use crate::quantization::QuantizationStrategy;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Float32,
    Uint8,
    Uint16,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DType::Float32 => "float32",
            DType::Uint8 => "uint8",
            DType::Uint16 => "uint16",
        };
        f.write_str(s)
    }
}

/// Numeric buffer tagged with its element type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "values", rename_all = "lowercase")]
pub enum TensorData {
    Float32(Vec<f32>),
    Uint8(Vec<u8>),
    Uint16(Vec<u16>),
}

impl TensorData {
    pub fn dtype(&self) -> DType {
        match self {
            TensorData::Float32(_) => DType::Float32,
            TensorData::Uint8(_) => DType::Uint8,
            TensorData::Uint16(_) => DType::Uint16,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TensorData::Float32(v) => v.len(),
            TensorData::Uint8(v) => v.len(),
            TensorData::Uint16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pseudo-random sample values scaled to the dtype's range:
    /// float32 in [0, 1], integers over their full range.
    pub fn random(dtype: DType, len: usize, rng: &mut impl Rng) -> Self {
        match dtype {
            DType::Float32 => TensorData::Float32((0..len).map(|_| rng.random::<f32>()).collect()),
            DType::Uint8 => TensorData::Uint8((0..len).map(|_| rng.random::<u8>()).collect()),
            DType::Uint16 => TensorData::Uint16((0..len).map(|_| rng.random::<u16>()).collect()),
        }
    }

    /// Reinterpret the buffer as `target`. Same dtype copies verbatim.
    pub fn convert(&self, target: DType) -> Self {
        match (self, target) {
            (TensorData::Float32(v), DType::Float32) => TensorData::Float32(v.clone()),
            (TensorData::Uint8(v), DType::Uint8) => TensorData::Uint8(v.clone()),
            (TensorData::Uint16(v), DType::Uint16) => TensorData::Uint16(v.clone()),

            (TensorData::Uint8(v), DType::Float32) => {
                TensorData::Float32(v.iter().map(|&x| f32::from(x) / U8_MAX).collect())
            }
            (TensorData::Uint16(v), DType::Float32) => {
                TensorData::Float32(v.iter().map(|&x| f32::from(x) / U16_MAX).collect())
            }

            (TensorData::Float32(v), DType::Uint8) => TensorData::Uint8(
                v.iter()
                    .map(|&x| (x * U8_MAX).round().clamp(0.0, U8_MAX) as u8)
                    .collect(),
            ),
            (TensorData::Float32(v), DType::Uint16) => TensorData::Uint16(
                v.iter()
                    .map(|&x| (x * U16_MAX).round().clamp(0.0, U16_MAX) as u16)
                    .collect(),
            ),

            (TensorData::Uint8(v), DType::Uint16) => {
                TensorData::Uint16(v.iter().map(|&x| u16::from(x) * U8_U16_RATIO).collect())
            }
            (TensorData::Uint16(v), DType::Uint8) => TensorData::Uint8(
                v.iter()
                    .map(|&x| (f64::from(x) / f64::from(U8_U16_RATIO)).round() as u8)
                    .collect(),
            ),
        }
    }

    /// Values widened to f64 for statistics.
    fn iter_f64(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            TensorData::Float32(v) => Box::new(v.iter().map(|&x| f64::from(x))),
            TensorData::Uint8(v) => Box::new(v.iter().map(|&x| f64::from(x))),
            TensorData::Uint16(v) => Box::new(v.iter().map(|&x| f64::from(x))),
        }
    }
}

/// A mounted tensor. Remounting produces a new value with a fresh id;
/// existing tensors are never mutated in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tensor {
    pub id: Uuid,
    pub data: TensorData,
    pub shape: Vec<usize>,
    pub architecture: Architecture,
    pub quantization: QuantizationStrategy,
}

impl Tensor {
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn element_count(&self) -> usize {
        self.data.len()
    }

    pub fn summary(&self) -> TensorSummary {
        let n = self.data.len();
        let (mut min, mut max, mut sum) = (f64::INFINITY, f64::NEG_INFINITY, 0.0f64);
        for x in self.data.iter_f64() {
            min = min.min(x);
            max = max.max(x);
            sum += x;
        }
        let (min, max, mean) = if n == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (min, max, sum / n as f64)
        };

        TensorSummary {
            id: self.id,
            dtype: self.dtype(),
            shape: self.shape.clone(),
            elements: n,
            min,
            max,
            mean,
            architecture: self.architecture,
            quantization: self.quantization,
        }
    }
}

/// Buffer-free view of a tensor for display and tool output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TensorSummary {
    pub id: Uuid,
    pub dtype: DType,
    pub shape: Vec<usize>,
    pub elements: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub architecture: Architecture,
    pub quantization: QuantizationStrategy,
}
