//! Repository spawn requests and the artifacts derived from them.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::CognitiveIntent;

const REPO_ID_PREFIX: &str = "repo";
const BASELINE_TECHNOLOGIES: &[&str] = &["typescript", "node.js"];
const DEVELOPMENT_TECHNOLOGIES: &[&str] = &["react", "vite"];
const AI_TECHNOLOGIES: &[&str] = &["python", "pytorch", "transformers"];
const FULLSTACK_COMPLEXITY: u8 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchitectureTag {
    Frontend,
    Backend,
    Fullstack,
    AiAgent,
}

impl fmt::Display for ArchitectureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArchitectureTag::Frontend => "frontend",
            ArchitectureTag::Backend => "backend",
            ArchitectureTag::Fullstack => "fullstack",
            ArchitectureTag::AiAgent => "ai-agent",
        };
        f.write_str(s)
    }
}

impl FromStr for ArchitectureTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frontend" => Ok(ArchitectureTag::Frontend),
            "backend" => Ok(ArchitectureTag::Backend),
            "fullstack" => Ok(ArchitectureTag::Fullstack),
            "ai-agent" | "ai_agent" | "aiagent" => Ok(ArchitectureTag::AiAgent),
            other => Err(format!(
                "architecture must be frontend, backend, fullstack or ai-agent, got '{other}'"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSpawnRequest {
    pub intent: String,
    pub technologies: BTreeSet<String>,
    pub architecture: ArchitectureTag,
    pub recursion_level: u32,
}

impl RepoSpawnRequest {
    /// Build a top-level request from a classified intent.
    pub fn from_intent(text: &str, intent: &CognitiveIntent) -> Self {
        Self {
            intent: text.to_string(),
            technologies: infer_technologies(intent),
            architecture: infer_architecture_tag(intent),
            recursion_level: 0,
        }
    }

    /// Child request one level deeper.
    pub fn child(&self, intent: &str) -> Self {
        Self {
            intent: intent.to_string(),
            technologies: self.technologies.clone(),
            architecture: self.architecture,
            recursion_level: self.recursion_level + 1,
        }
    }
}

/// Generated files keyed by file name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactBundle {
    pub files: BTreeMap<String, String>,
}

/// Links a spawned repository to the embedding of its intent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryExtension {
    pub repo_id: String,
    pub intent: String,
    pub embedding: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnedRepository {
    pub repo_id: String,
    pub artifacts: ArtifactBundle,
    pub memory_extension: MemoryExtension,
}

pub fn infer_technologies(intent: &CognitiveIntent) -> BTreeSet<String> {
    let mut techs: BTreeSet<String> = BASELINE_TECHNOLOGIES.iter().map(|s| s.to_string()).collect();
    match intent.domain.as_str() {
        "development" => techs.extend(DEVELOPMENT_TECHNOLOGIES.iter().map(|s| s.to_string())),
        "ai" => techs.extend(AI_TECHNOLOGIES.iter().map(|s| s.to_string())),
        _ => {}
    }
    techs
}

pub fn infer_architecture_tag(intent: &CognitiveIntent) -> ArchitectureTag {
    if intent.domain == "ai" {
        ArchitectureTag::AiAgent
    } else if intent.complexity > FULLSTACK_COMPLEXITY {
        ArchitectureTag::Fullstack
    } else if intent.task.contains("api") || intent.task.contains("server") {
        ArchitectureTag::Backend
    } else {
        ArchitectureTag::Frontend
    }
}

/// `repo-<unix millis>-<8 hex chars>`.
pub fn generate_repo_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let token = Uuid::new_v4().simple().to_string();
    format!("{REPO_ID_PREFIX}-{millis}-{}", &token[..8])
}

/// Package manifest and readme derived purely from the request.
pub fn build_artifacts(repo_id: &str, request: &RepoSpawnRequest) -> ArtifactBundle {
    let name = package_name(&request.intent, repo_id);
    let dependencies: serde_json::Map<String, serde_json::Value> = request
        .technologies
        .iter()
        .map(|t| (t.clone(), serde_json::Value::String("latest".to_string())))
        .collect();

    let manifest = serde_json::json!({
        "name": name,
        "version": "0.1.0",
        "private": true,
        "description": request.intent,
        "keywords": [request.architecture.to_string()],
        "recursionLevel": request.recursion_level,
        "dependencies": dependencies,
    });

    let tech_list = request
        .technologies
        .iter()
        .map(|t| format!("- {t}"))
        .collect::<Vec<_>>()
        .join("\n");
    let readme = format!(
        "# {name}\n\n{intent}\n\n## Architecture\n\n{arch}\n\n## Technologies\n\n{tech_list}\n\n---\nrepo id: `{repo_id}` (recursion level {level})\n",
        intent = request.intent,
        arch = request.architecture,
        level = request.recursion_level,
    );

    let mut files = BTreeMap::new();
    files.insert(
        "package.json".to_string(),
        serde_json::to_string_pretty(&manifest).unwrap_or_default(),
    );
    files.insert("README.md".to_string(), readme);
    ArtifactBundle { files }
}

/// Slug of the intent's first few words, falling back to the repo id.
fn package_name(intent: &str, repo_id: &str) -> String {
    let slug = intent
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .take(4)
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        repo_id.to_string()
    } else {
        slug
    }
}
