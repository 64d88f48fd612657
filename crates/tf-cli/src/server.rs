use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;
use tf_core::spawn::{infer_architecture_tag, infer_technologies};
use tf_core::{ArchitectureTag, CognitiveAgent, CoreError, RepoSpawnRequest, TensorSummary, ooda};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct TfServer {
    state: Arc<RwLock<CognitiveAgent>>,
    tool_router: ToolRouter<Self>,
}

impl TfServer {
    pub fn new(agent: CognitiveAgent) -> Self {
        Self {
            state: Arc::new(RwLock::new(agent)),
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result(value: &impl serde::Serialize) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn core_error(e: CoreError) -> McpError {
    McpError::invalid_params(e.to_string(), None)
}

// --- Tool parameter types ---

#[derive(Debug, Deserialize, JsonSchema)]
struct MountRequest {
    /// Slash-separated namespace path, e.g. /models/vision/realtime
    path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RemountRequest {
    /// Path of an already mounted tensor
    source_path: String,
    /// Path whose configuration the data is converted to
    path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct IntentRequest {
    /// Free-text request
    text: String,
    /// Context strings stored in memory before deciding
    context: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SpawnRequest {
    /// What the repository is for
    intent: String,
    /// Technologies to include. Inferred from the intent when empty.
    technologies: Option<Vec<String>>,
    /// frontend, backend, fullstack or ai-agent. Inferred when omitted.
    architecture: Option<String>,
    /// Nesting level of this request (0 for top level)
    recursion_level: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct RetrieveRequest {
    /// Text to search memory with
    query: String,
    /// Result cap. Uses the configured default when omitted.
    max_results: Option<usize>,
}

#[tool_router]
impl TfServer {
    #[tool(
        description = "Mount a tensor at a namespace path. The path decides precision, dtype and architecture. Returns a summary of the mounted tensor."
    )]
    async fn tf_mount(
        &self,
        Parameters(req): Parameters<MountRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut agent = self.state.write().await;
        let tensor = agent.mount(&req.path).map_err(core_error)?;
        json_result(&tensor.summary())
    }

    #[tool(
        description = "Convert the tensor mounted at source_path to the configuration of path and mount the result there. The source tensor is left untouched."
    )]
    async fn tf_remount(
        &self,
        Parameters(req): Parameters<RemountRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut agent = self.state.write().await;
        let tensor = agent
            .remount_path(&req.source_path, &req.path)
            .map_err(core_error)?;
        json_result(&tensor.summary())
    }

    #[tool(description = "Remove the tensor mounted at a path.")]
    async fn tf_unmount(
        &self,
        Parameters(req): Parameters<MountRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut agent = self.state.write().await;
        let removed = agent.unmount(&req.path);
        json_result(&serde_json::json!({ "path": req.path, "removed": removed }))
    }

    #[tool(description = "List summaries of all mounted tensors keyed by path.")]
    async fn tf_mounted(&self) -> Result<CallToolResult, McpError> {
        let agent = self.state.read().await;
        let summaries: std::collections::BTreeMap<String, TensorSummary> = agent
            .mounted_tensors()
            .into_iter()
            .map(|(path, t)| (path, t.summary()))
            .collect();
        json_result(&summaries)
    }

    #[tool(description = "List the weighted candidate configurations per domain.")]
    async fn tf_quantum_states(&self) -> Result<CallToolResult, McpError> {
        let agent = self.state.read().await;
        json_result(agent.quantum_states())
    }

    #[tool(
        description = "Run one observe, orient, decide, act and adapt cycle over a free-text request. May spawn a repository."
    )]
    async fn tf_process_intent(
        &self,
        Parameters(req): Parameters<IntentRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut agent = self.state.write().await;
        let context = req.context.unwrap_or_default();
        let result = agent.process_intent(&req.text, &context);
        json_result(&result)
    }

    #[tool(
        description = "Spawn a repository from an explicit request. Rejected when recursion_level has reached the persona's recursion depth."
    )]
    async fn tf_spawn(
        &self,
        Parameters(req): Parameters<SpawnRequest>,
    ) -> Result<CallToolResult, McpError> {
        let observed = ooda::observe(&req.intent);
        let architecture = match req.architecture.as_deref() {
            Some(raw) => raw
                .parse::<ArchitectureTag>()
                .map_err(|e| McpError::invalid_params(e, None))?,
            None => infer_architecture_tag(&observed),
        };
        let technologies = match req.technologies {
            Some(list) if !list.is_empty() => list.into_iter().collect(),
            _ => infer_technologies(&observed),
        };
        let request = RepoSpawnRequest {
            intent: req.intent,
            technologies,
            architecture,
            recursion_level: req.recursion_level.unwrap_or(0),
        };

        let mut agent = self.state.write().await;
        let repo = agent.spawn_repository(request).map_err(core_error)?;
        json_result(&repo)
    }

    #[tool(description = "Retrieve stored memories most similar to a query.")]
    async fn tf_retrieve(
        &self,
        Parameters(req): Parameters<RetrieveRequest>,
    ) -> Result<CallToolResult, McpError> {
        let agent = self.state.read().await;
        let hits = agent.retrieve_from_rag(&req.query, req.max_results);
        json_result(&hits)
    }

    #[tool(
        description = "Adapt persona traits from the latest cycle's metrics and return the before/after traits and a reshape suggestion."
    )]
    async fn tf_self_modify(&self) -> Result<CallToolResult, McpError> {
        let mut agent = self.state.write().await;
        let modification = agent.perform_self_modification();
        json_result(&modification)
    }

    #[tool(description = "Current persona traits.")]
    async fn tf_persona(&self) -> Result<CallToolResult, McpError> {
        let agent = self.state.read().await;
        json_result(&agent.persona_state())
    }

    #[tool(
        description = "Snapshot of agent state: persona, mounts, memory sizes, spawned repositories and the last cycle."
    )]
    async fn tf_introspect(&self) -> Result<CallToolResult, McpError> {
        let agent = self.state.read().await;
        json_result(&agent.introspect())
    }
}

#[tool_handler]
impl ServerHandler for TfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Path-driven tensor field with a memory-backed decision loop.\n\n\
                 TENSORS: tf_mount reads a path like /models/vision/realtime as an intent and \
                 mounts a tensor with a matching dtype and architecture. tf_remount converts a \
                 mounted tensor to another path's configuration without changing the source.\n\n\
                 REQUESTS: tf_process_intent runs one decision cycle. Pass related notes as \
                 context so later requests can retrieve them with tf_retrieve. Creation requests \
                 may spawn a repository; tf_spawn does so explicitly.\n\n\
                 STATE: tf_introspect and tf_persona are read-only. tf_self_modify nudges persona \
                 traits from the latest metrics."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
