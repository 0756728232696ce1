//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - demo: run the scripted two-utterance conversation
//! - chat: send a single utterance
//! - crew: show the agent tree
//! - doctor: validate configuration and check backend health

use anyhow::Result;
use std::sync::Arc;

use crate::agent::AgentDef;
use crate::config::Config;
use crate::crew;
use crate::llm::gemini::GeminiBackend;
use crate::llm::ModelBackend;
use crate::router::ModelRouter;
use crate::runtime::Session;

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// The scripted demo conversation
pub const DEMO_UTTERANCES: [&str; 2] = [
    "Can you test me on my past tense verbs?",
    "I'd like to practice ordering a coffee.",
];

/// Build a live session against the configured backend
fn build_session(config: &Config, flat: bool) -> Result<Session> {
    let backend: Arc<dyn ModelBackend> = Arc::new(GeminiBackend::new(config));
    let router = Arc::new(ModelRouter::new(backend));
    let root = if flat {
        crew::flat(config)?
    } else {
        crew::hierarchical(config)?
    };
    Ok(Session::new(root, crew::registry(), router)?)
}

/// Run the scripted demo conversation.
///
/// Issues the two fixed example utterances and prints each reply. Backend
/// failures propagate to the caller uncaught.
pub async fn handle_demo(config: &Config, flat: bool, format: OutputFormat) -> Result<()> {
    let mut session = build_session(config, flat)?;

    println!("Starting conversation with {}...", session.root().name());
    for utterance in DEMO_UTTERANCES {
        let reply = session.converse(utterance).await?;
        print_turn(utterance, &reply, format);
    }
    Ok(())
}

/// Send a single utterance to the tutor
pub async fn handle_chat(
    utterance: String,
    config: &Config,
    flat: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut session = build_session(config, flat)?;
    let reply = session.converse(&utterance).await?;
    print_turn(&utterance, &reply, format);
    Ok(())
}

fn print_turn(utterance: &str, reply: &str, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!();
            println!("> {utterance}");
            println!("{reply}");
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "utterance": utterance, "reply": reply })
            );
        }
    }
}

/// Show the agent tree and each agent's capabilities
pub fn handle_crew(config: &Config, flat: bool, format: OutputFormat) -> Result<()> {
    let root = if flat {
        crew::flat(config)?
    } else {
        crew::hierarchical(config)?
    };

    match format {
        OutputFormat::Text => print_tree(&root, 0),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&root)?),
    }
    Ok(())
}

fn print_tree(agent: &AgentDef, depth: usize) {
    let pad = "  ".repeat(depth);
    println!("{pad}{} [{}]", agent.name(), agent.model());
    for capability in agent.capabilities() {
        println!("{pad}  - {capability}");
    }
    for child in agent.sub_agents() {
        print_tree(child, depth + 1);
    }
}

/// Validate configuration and check backend health
pub async fn handle_doctor(config: &Config, format: OutputFormat) -> Result<()> {
    let backend = GeminiBackend::new(config);
    let healthy = backend.check_health().await;

    match format {
        OutputFormat::Text => {
            println!("Configuration:");
            println!("  Project:      {}", describe(&config.cloud.project));
            println!("  Location:     {}", config.cloud.location);
            println!("  Vertex mode:  {}", config.cloud.use_vertex);
            println!("  Orchestrator: {}", config.model.orchestrator);
            println!("  Specialist:   {}", config.model.specialist);
            println!("  Endpoint:     {}", config.model.base_url);
            println!(
                "  Credentials:  {}",
                if config.model.api_key.is_empty() {
                    "missing (set GEMINI_API_KEY)"
                } else {
                    "configured"
                }
            );
            println!();
            println!(
                "Backend '{}': {}",
                backend.name(),
                if healthy { "ready" } else { "not ready" }
            );
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "project": config.cloud.project,
                    "location": config.cloud.location,
                    "use_vertex": config.cloud.use_vertex,
                    "orchestrator_model": config.model.orchestrator,
                    "specialist_model": config.model.specialist,
                    "base_url": config.model.base_url,
                    "credentials_configured": !config.model.api_key.is_empty(),
                    "backend": backend.name(),
                    "healthy": healthy,
                })
            );
        }
    }
    Ok(())
}

fn describe(value: &str) -> &str {
    if value.is_empty() {
        "(none)"
    } else {
        value
    }
}
