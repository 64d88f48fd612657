//! Path → cognitive intent.
//!
//! A mount path such as `/models/vision/realtime` is read as an optional
//! namespace prefix, a domain, a task, and any number of modifiers. The
//! keyword tables below drive precision, realtime and complexity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_COMPLEXITY, MAX_COMPLEXITY, MIN_COMPLEXITY};
use crate::error::{CoreError, Result};

/// Leading segments that name a namespace rather than a domain.
const NAMESPACE_PREFIXES: &[&str] = &["models", "inference", "tensors", "field"];

const HIGH_PRECISION: &[&str] = &["precise", "high"];
const LOW_PRECISION: &[&str] = &["fast", "low"];
const REALTIME: &[&str] = &["realtime", "live"];

const DOMAIN_DELTAS: &[(&str, i32)] = &[("vision", 2), ("nlp", 3)];
const TASK_DELTAS: &[(&str, i32)] = &[("generation", 2)];
const HIGH_PRECISION_DELTA: i32 = 2;
const REALTIME_DELTA: i32 = -1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    High,
    Medium,
    Low,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Precision::High => "high",
            Precision::Medium => "medium",
            Precision::Low => "low",
        };
        f.write_str(s)
    }
}

/// Structured reading of a path or a free-text request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitiveIntent {
    pub domain: String,
    pub task: String,
    pub precision: Precision,
    pub realtime: bool,
    pub complexity: u8,
}

impl CognitiveIntent {
    /// Low-complexity intent used for empty or malformed requests.
    pub fn simple() -> Self {
        Self {
            domain: "general".to_string(),
            task: "simple".to_string(),
            precision: Precision::Medium,
            realtime: false,
            complexity: MIN_COMPLEXITY,
        }
    }
}

/// Parse a slash-delimited mount path into a [`CognitiveIntent`].
///
/// Empty segments are dropped. A known namespace prefix is skipped only
/// when at least two segments follow it, so `/models/vision` reads as
/// domain `models`, task `vision`.
pub fn parse_intent(path: &str) -> Result<CognitiveIntent> {
    let segments: Vec<String> = path
        .split('/')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() < 2 {
        return Err(CoreError::InvalidPath {
            path: path.to_string(),
            segments: segments.len(),
        });
    }

    let start = if NAMESPACE_PREFIXES.contains(&segments[0].as_str()) && segments.len() >= 3 {
        1
    } else {
        0
    };

    let domain = segments[start].clone();
    let task = segments[start + 1].clone();
    let modifiers = &segments[start + 2..];

    let matches_any = |keywords: &[&str]| {
        keywords.contains(&task.as_str()) || modifiers.iter().any(|m| keywords.contains(&m.as_str()))
    };

    let precision = if matches_any(HIGH_PRECISION) {
        Precision::High
    } else if matches_any(LOW_PRECISION) {
        Precision::Low
    } else {
        Precision::Medium
    };
    let realtime = matches_any(REALTIME);

    let mut complexity = i32::from(BASE_COMPLEXITY);
    for (name, delta) in DOMAIN_DELTAS {
        if domain == *name {
            complexity += delta;
        }
    }
    for (keyword, delta) in TASK_DELTAS {
        if task.contains(keyword) {
            complexity += delta;
        }
    }
    if precision == Precision::High {
        complexity += HIGH_PRECISION_DELTA;
    }
    if realtime {
        complexity += REALTIME_DELTA;
    }

    Ok(CognitiveIntent {
        domain,
        task,
        precision,
        realtime,
        complexity: clamp_complexity(complexity),
    })
}

fn clamp_complexity(raw: i32) -> u8 {
    raw.clamp(i32::from(MIN_COMPLEXITY), i32::from(MAX_COMPLEXITY)) as u8
}
