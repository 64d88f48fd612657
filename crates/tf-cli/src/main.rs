mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rmcp::{ServiceExt, transport::stdio};
use tf_core::{AgentConfig, CognitiveAgent};

#[derive(Parser)]
#[command(name = "tfield", about = "Tensor field agent CLI and MCP server")]
struct Cli {
    /// TOML config file (falls back to TFIELD_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server on stdio transport
    Serve,

    /// Mount a tensor at a path and print its summary
    Mount {
        /// Namespace path, e.g. /models/vision/realtime
        path: String,
    },

    /// Mount a tensor at one path, then remount it at another
    Remount {
        /// Source path
        from: String,
        /// Target path
        to: String,
    },

    /// Run one decision cycle over a free-text request
    Intent {
        /// Request text
        text: String,

        /// Context strings to store before deciding
        #[arg(long = "context")]
        context: Vec<String>,
    },

    /// Print the quantum-state catalog
    States,

    /// Print the effective configuration as TOML
    Config,
}

fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config
        .clone()
        .or_else(|| std::env::var("TFIELD_CONFIG").ok().map(PathBuf::from))
}

fn load_config(path: Option<&Path>) -> Result<AgentConfig> {
    let Some(path) = path else {
        return Ok(AgentConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(config_path(&cli).as_deref())?;

    match &cli.command {
        Commands::Serve => cmd_serve(config).await,
        Commands::Mount { path } => cmd_mount(config, path),
        Commands::Remount { from, to } => cmd_remount(config, from, to),
        Commands::Intent { text, context } => cmd_intent(config, text, context),
        Commands::States => cmd_states(config),
        Commands::Config => cmd_config(&config),
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{json}");
    Ok(())
}

async fn cmd_serve(config: AgentConfig) -> Result<()> {
    tracing::info!("starting MCP server");
    let server = server::TfServer::new(CognitiveAgent::new(config));
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await?;
    Ok(())
}

fn cmd_mount(config: AgentConfig, path: &str) -> Result<()> {
    let mut agent = CognitiveAgent::new(config);
    let tensor = agent.mount(path)?;
    print_json(&tensor.summary())
}

fn cmd_remount(config: AgentConfig, from: &str, to: &str) -> Result<()> {
    let mut agent = CognitiveAgent::new(config);
    let source = agent.mount(from)?;
    let target = agent.remount(&source, to)?;
    print_json(&serde_json::json!({
        "source": source.summary(),
        "target": target.summary(),
    }))
}

fn cmd_intent(config: AgentConfig, text: &str, context: &[String]) -> Result<()> {
    let mut agent = CognitiveAgent::new(config);
    let result = agent.process_intent(text, context);
    let spawned: Vec<&str> = result.spawned.iter().map(|r| r.repo_id.as_str()).collect();
    print_json(&serde_json::json!({
        "intent": result.intent,
        "response": result.response,
        "spawned": spawned,
        "related": result.related,
        "persona": result.adaptation.after,
        "reshape": result.adaptation.reshape,
        "memory": agent.memory().len(),
    }))
}

fn cmd_states(config: AgentConfig) -> Result<()> {
    let agent = CognitiveAgent::new(config);
    print_json(agent.quantum_states())
}

fn cmd_config(config: &AgentConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("failed to render config")?;
    print!("{rendered}");
    Ok(())
}
