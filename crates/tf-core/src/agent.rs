//! The agent: tensor field, memory store, persona and spawn registry behind
//! one owned value.
//!
//! `process_intent` runs a full cycle strictly in order:
//! observe → orient → decide → act → adapt. It never fails; spawn
//! rejections inside a cycle fall back to a direct response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::constants::TRAIT_EMPHASIS;
use crate::embedding::{Embedder, SyntheticEmbedder};
use crate::error::{CoreError, Result};
use crate::field::{QuantumState, TensorField};
use crate::intent::CognitiveIntent;
use crate::memory::{MemoryStore, RetrievedMemory};
use crate::ooda::{self, ActStage, DecideStage, OodaCycle, OrientStage};
use crate::persona::{
    PerformanceMetrics, PersonaTraits, ReshapeSuggestion, SelfModification, self_modify,
};
use crate::spawn::{
    MemoryExtension, RepoSpawnRequest, SpawnedRepository, build_artifacts, generate_repo_id,
};
use crate::tensor::Tensor;

/// Output of one `process_intent` cycle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntentResult {
    pub intent: CognitiveIntent,
    pub response: String,
    pub related: Vec<RetrievedMemory>,
    pub spawned: Vec<SpawnedRepository>,
    pub adaptation: SelfModification,
    /// Set by collaborators that hit an error downstream of this result.
    pub fallback: bool,
}

impl IntentResult {
    pub fn mark_fallback(&mut self) {
        self.fallback = true;
    }
}

/// Read-only snapshot of agent state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Introspection {
    pub persona: PersonaTraits,
    pub mounted_paths: Vec<String>,
    pub memory_size: usize,
    pub window_len: usize,
    pub graph_nodes: usize,
    pub spawned_repos: Vec<String>,
    pub quantum_domains: Vec<String>,
    pub last_cycle: Option<OodaCycle>,
    pub last_metrics: Option<PerformanceMetrics>,
    pub last_reshape: Option<ReshapeSuggestion>,
}

pub struct CognitiveAgent {
    field: TensorField,
    memory: MemoryStore,
    embedder: Box<dyn Embedder>,
    persona: PersonaTraits,
    registry: BTreeMap<String, RepoSpawnRequest>,
    retrieval_threshold: f32,
    max_results: usize,
    last_cycle: Option<OodaCycle>,
    last_metrics: Option<PerformanceMetrics>,
    last_reshape: Option<ReshapeSuggestion>,
}

impl Default for CognitiveAgent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl CognitiveAgent {
    /// Build an agent with the synthetic embedder described by `config`.
    pub fn new(config: AgentConfig) -> Self {
        let embedder: Box<dyn Embedder> = match config.embedding.seed {
            Some(seed) => Box::new(SyntheticEmbedder::seeded(config.embedding.dimension, seed)),
            None => Box::new(SyntheticEmbedder::random(config.embedding.dimension)),
        };
        Self::with_embedder(config, embedder)
    }

    /// Build an agent around a caller-supplied embedder.
    pub fn with_embedder(config: AgentConfig, embedder: Box<dyn Embedder>) -> Self {
        let field = match config.tensor.seed {
            Some(seed) => TensorField::seeded(config.tensor.shape, seed),
            None => TensorField::new(config.tensor.shape),
        };
        let mut persona = config.persona;
        persona.clamp();

        Self {
            field,
            memory: MemoryStore::new(config.memory.window_capacity, config.memory.window_retain),
            embedder,
            persona,
            registry: BTreeMap::new(),
            retrieval_threshold: config.memory.retrieval_threshold as f32,
            max_results: config.memory.max_results,
            last_cycle: None,
            last_metrics: None,
            last_reshape: None,
        }
    }

    // --- Tensor field ---

    pub fn mount(&mut self, path: &str) -> Result<Tensor> {
        self.field.mount(path)
    }

    pub fn remount(&mut self, source: &Tensor, new_path: &str) -> Result<Tensor> {
        self.field.remount(source, new_path)
    }

    pub fn remount_path(&mut self, source_path: &str, new_path: &str) -> Result<Tensor> {
        self.field.remount_path(source_path, new_path)
    }

    pub fn unmount(&mut self, path: &str) -> bool {
        self.field.unmount(path)
    }

    pub fn mounted_tensor(&self, path: &str) -> Option<&Tensor> {
        self.field.get(path)
    }

    pub fn mounted_tensors(&self) -> BTreeMap<String, Tensor> {
        self.field.mounted_tensors()
    }

    pub fn quantum_states(&self) -> &BTreeMap<String, Vec<QuantumState>> {
        self.field.quantum_states()
    }

    // --- Memory ---

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    /// Embed `query` and return the best stored matches above the
    /// configured threshold.
    pub fn retrieve_from_rag(&self, query: &str, max_results: Option<usize>) -> Vec<RetrievedMemory> {
        let embedding = self.embedder.embed(query);
        self.memory.retrieve(
            &embedding,
            max_results.unwrap_or(self.max_results),
            self.retrieval_threshold,
        )
    }

    /// Embed `text` and store it. Returns the number of evicted entries.
    pub fn remember(&mut self, text: &str) -> usize {
        let embedding = self.embedder.embed(text);
        let (_, outcome) = self.memory.insert(text, embedding);
        outcome.evicted
    }

    // --- Spawning ---

    pub fn spawned_repositories(&self) -> &BTreeMap<String, RepoSpawnRequest> {
        &self.registry
    }

    /// Register a new repository derived from `request`.
    ///
    /// Rejected before any mutation when the request's recursion level has
    /// reached the persona's recursion depth.
    pub fn spawn_repository(&mut self, request: RepoSpawnRequest) -> Result<SpawnedRepository> {
        if request.recursion_level >= self.persona.recursion_depth {
            tracing::warn!(
                level = request.recursion_level,
                depth = self.persona.recursion_depth,
                "spawn rejected"
            );
            return Err(CoreError::RecursionLimit {
                level: request.recursion_level,
                depth: self.persona.recursion_depth,
            });
        }

        let mut repo_id = generate_repo_id();
        while self.registry.contains_key(&repo_id) {
            repo_id = generate_repo_id();
        }

        let artifacts = build_artifacts(&repo_id, &request);
        let embedding = self.embedder.embed(&request.intent);

        self.memory.insert(&request.intent, embedding.clone());
        let mut labels = vec![request.intent.clone(), request.architecture.to_string()];
        labels.extend(request.technologies.iter().cloned());
        self.memory.link(&repo_id, labels);

        tracing::info!(
            repo_id = %repo_id,
            architecture = %request.architecture,
            level = request.recursion_level,
            "spawned repository"
        );

        let memory_extension = MemoryExtension {
            repo_id: repo_id.clone(),
            intent: request.intent.clone(),
            embedding,
        };
        self.registry.insert(repo_id.clone(), request);

        Ok(SpawnedRepository {
            repo_id,
            artifacts,
            memory_extension,
        })
    }

    // --- Decision loop ---

    /// Run one observe → orient → decide → act → adapt cycle.
    pub fn process_intent(&mut self, text: &str, context: &[String]) -> IntentResult {
        let observed = ooda::observe(text);

        let orient = self.orient(text, context);
        let decide = self.decide(text, &observed);
        let (act, spawned) = self.act(&observed, &decide);

        let attempts = decide.requests.len();
        let similarities: Vec<f32> = orient.related.iter().map(|r| r.similarity).collect();
        let metrics = PerformanceMetrics::synthesize(
            observed.complexity,
            attempts,
            spawned.len(),
            &similarities,
        );
        let adaptation = self.adapt(metrics);

        tracing::debug!(
            domain = %observed.domain,
            task = %observed.task,
            complexity = observed.complexity,
            spawn = decide.spawn,
            spawned = spawned.len(),
            memory = self.memory.len(),
            "ooda cycle"
        );

        let result = IntentResult {
            intent: observed.clone(),
            response: act.response.clone(),
            related: orient.related.clone(),
            spawned,
            adaptation,
            fallback: false,
        };

        self.last_cycle = Some(OodaCycle {
            observe: observed,
            orient,
            decide,
            act,
        });
        result
    }

    fn orient(&mut self, text: &str, context: &[String]) -> OrientStage {
        let related = if ooda::is_malformed(text) {
            Vec::new()
        } else {
            self.retrieve_from_rag(text, None)
        };

        let mut inserted = 0;
        let mut evicted = 0;
        for item in context {
            evicted += self.remember(item);
            inserted += 1;
        }

        OrientStage {
            context_inserted: inserted,
            evicted,
            related,
        }
    }

    fn decide(&self, text: &str, intent: &CognitiveIntent) -> DecideStage {
        let spawn = ooda::should_spawn(intent, self.persona.bolt_integration);
        let requests = if spawn {
            vec![RepoSpawnRequest::from_intent(text.trim(), intent)]
        } else {
            Vec::new()
        };
        DecideStage { spawn, requests }
    }

    fn act(
        &mut self,
        intent: &CognitiveIntent,
        decide: &DecideStage,
    ) -> (ActStage, Vec<SpawnedRepository>) {
        let mut spawned = Vec::new();
        let mut rejected = Vec::new();
        let mut lines = Vec::new();

        for request in &decide.requests {
            match self.spawn_repository(request.clone()) {
                Ok(repo) => {
                    lines.push(format!(
                        "Spawned repository {} ({}) with {}.",
                        repo.repo_id,
                        request.architecture,
                        request
                            .technologies
                            .iter()
                            .cloned()
                            .collect::<Vec<_>>()
                            .join(", ")
                    ));
                    spawned.push(repo);
                }
                Err(e) => rejected.push(e.to_string()),
            }
        }

        let response = if lines.is_empty() {
            self.direct_response(intent)
        } else {
            lines.join("\n")
        };
        self.remember(&response);

        let act = ActStage {
            response,
            spawned: spawned.iter().map(|r| r.repo_id.clone()).collect(),
            rejected,
        };
        (act, spawned)
    }

    fn direct_response(&self, intent: &CognitiveIntent) -> String {
        let creative = self.persona.creativity > TRAIT_EMPHASIS;
        let precise = self.persona.precision > TRAIT_EMPHASIS;
        let opening = match (creative, precise) {
            (true, true) => "Here is an inventive, carefully checked approach",
            (true, false) => "Here is an exploratory approach",
            (false, true) => "Here is a precise, step-by-step approach",
            (false, false) => "Here is a direct approach",
        };
        format!(
            "{opening} to your {} request in the {} domain (complexity {}).",
            intent.task, intent.domain, intent.complexity
        )
    }

    fn adapt(&mut self, metrics: PerformanceMetrics) -> SelfModification {
        let modification = self_modify(&mut self.persona, &metrics);
        self.last_metrics = Some(metrics);
        self.last_reshape = Some(modification.reshape);
        modification
    }

    // --- Adaptation and introspection ---

    /// Adapt using the most recent cycle's metrics, or a baseline when no
    /// cycle has run yet.
    pub fn perform_self_modification(&mut self) -> SelfModification {
        let metrics = self.last_metrics.unwrap_or_default();
        self.adapt(metrics)
    }

    pub fn persona_state(&self) -> PersonaTraits {
        self.persona.clone()
    }

    pub fn last_cycle(&self) -> Option<&OodaCycle> {
        self.last_cycle.as_ref()
    }

    pub fn introspect(&self) -> Introspection {
        Introspection {
            persona: self.persona.clone(),
            mounted_paths: self.field.paths(),
            memory_size: self.memory.len(),
            window_len: self.memory.window_len(),
            graph_nodes: self.memory.graph_len(),
            spawned_repos: self.registry.keys().cloned().collect(),
            quantum_domains: self.field.quantum_states().keys().cloned().collect(),
            last_cycle: self.last_cycle.clone(),
            last_metrics: self.last_metrics,
            last_reshape: self.last_reshape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmbeddingConfig, TensorConfig};
    use crate::spawn::ArchitectureTag;

    fn agent() -> CognitiveAgent {
        CognitiveAgent::new(AgentConfig {
            embedding: EmbeddingConfig {
                dimension: 64,
                seed: Some(42),
            },
            tensor: TensorConfig {
                shape: vec![16, 16],
                seed: Some(42),
            },
            ..AgentConfig::default()
        })
    }

    fn request(level: u32) -> RepoSpawnRequest {
        RepoSpawnRequest {
            intent: "build a dashboard app".to_string(),
            technologies: ["typescript".to_string()].into_iter().collect(),
            architecture: ArchitectureTag::Frontend,
            recursion_level: level,
        }
    }

    #[test]
    fn test_spawn_registers_and_extends_memory() {
        let mut a = agent();
        let repo = a.spawn_repository(request(0)).unwrap();
        assert!(a.spawned_repositories().contains_key(&repo.repo_id));
        assert!(a.memory().contains("build a dashboard app"));
        assert!(a.memory().graph_related(&repo.repo_id).unwrap().contains("frontend"));
        assert_eq!(repo.memory_extension.embedding.len(), 64);
        assert!(repo.artifacts.files.contains_key("package.json"));
        assert!(repo.artifacts.files.contains_key("README.md"));
    }

    #[test]
    fn test_spawn_at_depth_is_rejected_without_mutation() {
        let mut a = agent();
        let depth = a.persona_state().recursion_depth;
        let before_mem = a.memory().len();
        let before_graph = a.memory().graph_len();

        let err = a.spawn_repository(request(depth)).unwrap_err();
        assert_eq!(err, CoreError::RecursionLimit { level: depth, depth });
        assert!(a.spawned_repositories().is_empty());
        assert_eq!(a.memory().len(), before_mem);
        assert_eq!(a.memory().graph_len(), before_graph);

        assert!(a.spawn_repository(request(depth - 1)).is_ok());
    }

    #[test]
    fn test_process_creation_spawns() {
        let mut a = agent();
        let result = a.process_intent("Create a todo app", &[]);
        assert_eq!(result.spawned.len(), 1);
        assert!(result.response.starts_with("Spawned repository repo-"));
        assert_eq!(a.spawned_repositories().len(), 1);
        assert!(a.memory().contains(&result.response));

        let cycle = a.last_cycle().unwrap();
        assert!(cycle.decide.spawn);
        assert_eq!(cycle.decide.requests[0].recursion_level, 0);
        assert_eq!(cycle.decide.requests[0].architecture, ArchitectureTag::Fullstack);
    }

    #[test]
    fn test_process_without_bolt_answers_directly() {
        let mut a = CognitiveAgent::new(AgentConfig {
            persona: PersonaTraits {
                bolt_integration: false,
                ..PersonaTraits::default()
            },
            ..AgentConfig::default()
        });
        let result = a.process_intent("Create a todo app", &[]);
        assert!(result.spawned.is_empty());
        assert!(result.response.starts_with("Here is an inventive"));
        assert!(a.spawned_repositories().is_empty());
    }

    #[test]
    fn test_zero_depth_falls_back_to_direct_response() {
        let mut a = CognitiveAgent::new(AgentConfig {
            persona: PersonaTraits {
                recursion_depth: 0,
                ..PersonaTraits::default()
            },
            ..AgentConfig::default()
        });
        let result = a.process_intent("build an app", &[]);
        assert!(result.spawned.is_empty());
        assert!(result.response.starts_with("Here is"));
        let cycle = a.last_cycle().unwrap();
        assert_eq!(cycle.act.rejected.len(), 1);
        assert_eq!(result.adaptation.metrics.spawn_success, 0.0);
    }

    #[test]
    fn test_response_template_tracks_traits() {
        let mut a = CognitiveAgent::new(AgentConfig {
            persona: PersonaTraits {
                creativity: 0.2,
                precision: 0.2,
                ..PersonaTraits::default()
            },
            ..AgentConfig::default()
        });
        let result = a.process_intent("what time is it", &[]);
        assert!(result.response.starts_with("Here is a direct approach"));
    }

    #[test]
    fn test_orient_inserts_context() {
        let mut a = agent();
        let ctx = vec!["first note".to_string(), "  ".to_string(), "second note".to_string()];
        a.process_intent("hello there", &ctx);
        assert!(a.memory().contains("first note"));
        assert!(a.memory().contains("second note"));
        assert_eq!(a.last_cycle().unwrap().orient.context_inserted, 3);
    }

    #[test]
    fn test_orient_keeps_blank_context() {
        let mut a = agent();
        a.process_intent("hello", &["".to_string(), "  ".to_string()]);
        assert_eq!(a.last_cycle().unwrap().orient.context_inserted, 2);
        assert!(a.memory().contains(""));
        assert!(a.memory().contains("  "));
    }

    #[test]
    fn test_orient_retrieves_prior_entries() {
        let mut a = agent();
        a.remember("summarize the quarterly report");
        let result = a.process_intent("summarize the quarterly report", &[]);
        assert_eq!(result.related.len(), 1);
        assert_eq!(result.related[0].key, "summarize the quarterly report");
    }

    #[test]
    fn test_malformed_input_still_returns() {
        let mut a = agent();
        let result = a.process_intent("", &[]);
        assert_eq!(result.intent, CognitiveIntent::simple());
        assert!(!result.response.is_empty());
        assert!(!result.fallback);
    }

    #[test]
    fn test_mark_fallback() {
        let mut a = agent();
        let mut result = a.process_intent("hi", &[]);
        result.mark_fallback();
        assert!(result.fallback);
    }

    #[test]
    fn test_perform_self_modification_without_cycle() {
        let mut a = agent();
        let before = a.persona_state();
        let m = a.perform_self_modification();
        assert_eq!(m.metrics, PerformanceMetrics::default());
        assert!(a.persona_state().adaptation_rate > before.adaptation_rate);
    }

    #[test]
    fn test_reshape_does_not_touch_mounts() {
        let mut a = agent();
        let t = a.mount("/inference/nlp/precise").unwrap();
        a.perform_self_modification();
        let mounted = a.mounted_tensor("/inference/nlp/precise").unwrap();
        assert_eq!(mounted.shape, t.shape);
        assert_eq!(mounted.id, t.id);
    }

    struct ConstantEmbedder;

    impl Embedder for ConstantEmbedder {
        fn dimension(&self) -> usize {
            4
        }

        fn embed(&self, _text: &str) -> Vec<f32> {
            vec![1.0, 0.0, 0.0, 0.0]
        }
    }

    #[test]
    fn test_with_embedder_drives_retrieval() {
        let mut a = CognitiveAgent::with_embedder(AgentConfig::default(), Box::new(ConstantEmbedder));
        a.remember("alpha");
        a.remember("beta");
        let hits = a.retrieve_from_rag("anything at all", None);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| (h.similarity - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_introspect() {
        let mut a = agent();
        a.mount("/models/vision/realtime").unwrap();
        a.process_intent("Create a website", &["ctx".to_string()]);
        let info = a.introspect();
        assert_eq!(info.mounted_paths, vec!["/models/vision/realtime".to_string()]);
        assert_eq!(info.spawned_repos.len(), 1);
        assert!(info.memory_size >= 3);
        assert!(info.last_cycle.is_some());
        assert!(info.last_reshape.is_some());
        assert!(info.quantum_domains.contains(&"vision".to_string()));
    }
}
