//! Observe–orient–decide–act records and the request classifier.
//!
//! Free-text requests use a simpler keyword heuristic than mount paths.
//! Complexity has no upper clamp here.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{BASE_COMPLEXITY, MAX_INTENT_CHARS, SPAWN_COMPLEXITY};
use crate::intent::{CognitiveIntent, Precision};
use crate::memory::RetrievedMemory;
use crate::spawn::RepoSpawnRequest;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z0-9']+").unwrap());

const CREATION_WORDS: &[&str] = &["create", "build"];
const ANALYSIS_WORDS: &[&str] = &["analyze", "understand"];
const DEVELOPMENT_WORDS: &[&str] = &["app", "website"];
const AI_WORDS: &[&str] = &["ai"];
const AI_PHRASES: &[&str] = &["machine learning"];
const REALTIME_WORDS: &[&str] = &["realtime", "live"];
const NULL_LIKE: &[&str] = &["null", "undefined", "none", "nil"];

/// Lowercase word tokens.
fn words(text: &str) -> HashSet<String> {
    WORD.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// True for input that should be handled as a simple request.
pub fn is_malformed(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || trimmed.chars().count() > MAX_INTENT_CHARS
        || NULL_LIKE.contains(&trimmed.to_lowercase().as_str())
}

/// Classify a free-text request.
pub fn observe(text: &str) -> CognitiveIntent {
    if is_malformed(text) {
        return CognitiveIntent::simple();
    }

    let lower = text.to_lowercase();
    let tokens = words(&lower);
    let has = |set: &[&str]| set.iter().any(|w| tokens.contains(*w));

    let mut intent = CognitiveIntent {
        domain: "general".to_string(),
        task: "general".to_string(),
        precision: Precision::Medium,
        realtime: has(REALTIME_WORDS),
        complexity: BASE_COMPLEXITY,
    };

    if has(CREATION_WORDS) {
        intent.task = "creation".to_string();
        intent.complexity += 2;
    }
    if has(ANALYSIS_WORDS) {
        intent.task = "analysis".to_string();
        intent.precision = Precision::High;
        intent.complexity += 1;
    }
    if has(DEVELOPMENT_WORDS) {
        intent.domain = "development".to_string();
        intent.complexity += 2;
    }
    if has(AI_WORDS) || AI_PHRASES.iter().any(|p| lower.contains(p)) {
        intent.domain = "ai".to_string();
        intent.complexity += 3;
    }

    intent
}

/// Whether a classified request should spawn a repository.
pub fn should_spawn(intent: &CognitiveIntent, bolt_integration: bool) -> bool {
    bolt_integration
        && (intent.task == "creation" || intent.domain == "development")
        && intent.complexity > SPAWN_COMPLEXITY
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientStage {
    pub context_inserted: usize,
    pub evicted: usize,
    pub related: Vec<RetrievedMemory>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecideStage {
    pub spawn: bool,
    pub requests: Vec<RepoSpawnRequest>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActStage {
    pub response: String,
    pub spawned: Vec<String>,
    pub rejected: Vec<String>,
}

/// The latest processing cycle. Overwritten on every request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OodaCycle {
    pub observe: CognitiveIntent,
    pub orient: OrientStage,
    pub decide: DecideStage,
    pub act: ActStage,
}
