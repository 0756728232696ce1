//! End-to-end routing tests over a deterministic scripted backend.
//!
//! The backend double replays a fixed sequence of model turns, which
//! pins down the full loop: delegation, capability dispatch, result
//! feedback, and the final reply.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use lingua_engine::capabilities::{assessment, memory, roleplay};
use lingua_engine::config::Config;
use lingua_engine::llm::{self, CapabilityCall, Message, MessageRole, ModelBackend, ModelReply};
use lingua_engine::router::{ModelRouter, DELEGATE_CALL};
use lingua_engine::runtime::{Session, MAX_TURN_STEPS};
use lingua_engine::{agent::AgentDef, crew};
use sdk::errors::EngineError;

/// Replays a scripted sequence of model turns and records every request.
struct ScriptedBackend {
    replies: Mutex<VecDeque<ModelReply>>,
    prompts: Mutex<Vec<String>>,
    models: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<ModelReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            models: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, model: &str, messages: &[Message]) -> llm::Result<ModelReply> {
        self.models.lock().unwrap().push(model.to_string());
        let system = messages
            .iter()
            .find(|m| m.role == MessageRole::System)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(system);

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| llm::BackendError::Unavailable("script exhausted".to_string()))
    }
}

fn call(name: &str, arguments: serde_json::Value) -> ModelReply {
    ModelReply::Call(CapabilityCall::new(name, arguments.to_string()))
}

fn text(content: &str) -> ModelReply {
    ModelReply::Text(content.to_string())
}

fn session_with(root: AgentDef, backend: Arc<ScriptedBackend>) -> Session {
    let backend: Arc<dyn ModelBackend> = backend;
    let router = Arc::new(ModelRouter::new(backend));
    Session::new(root, crew::registry(), router).unwrap()
}

fn capability_results(session: &Session) -> Vec<&str> {
    session
        .transcript()
        .iter()
        .filter(|m| m.role == MessageRole::Capability)
        .map(|m| m.content.as_str())
        .collect()
}

#[tokio::test]
async fn assessment_request_routes_to_assessor() {
    let config = Config::default();
    let backend = ScriptedBackend::new(vec![
        call(DELEGATE_CALL, json!({"agent": "assessor"})),
        call(assessment::NAME, json!({"topic": "past tense verbs"})),
        text("Your quiz on past tense verbs is ready — question one coming up!"),
    ]);
    let mut session = session_with(crew::hierarchical(&config).unwrap(), backend.clone());

    let reply = session
        .converse("Can you test me on my past tense verbs?")
        .await
        .unwrap();
    assert!(reply.contains("quiz on past tense verbs"));

    // The assessment capability actually ran
    let results = capability_results(&session);
    assert_eq!(results, ["Quiz on 'past tense verbs' is ready."]);

    // After delegation the turn runs under the assessor: its prompt
    // advertises the assessment capability, which the orchestrator's
    // never did
    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 3);
    assert!(!prompts[0].contains("## generate_assessment"));
    assert!(prompts[0].contains(&format!("## {DELEGATE_CALL}")));
    assert!(prompts[1].contains("## generate_assessment"));
    assert!(prompts[1].contains("## access_long_term_memory"));

    // Orchestrator and specialist use their configured models
    let models = backend.models();
    assert_eq!(models[0], config.model.orchestrator);
    assert_eq!(models[1], config.model.specialist);
}

#[tokio::test]
async fn flat_composition_answers_without_delegation() {
    let config = Config::default();
    let backend = ScriptedBackend::new(vec![
        call(assessment::NAME, json!({"topic": "past tense verbs"})),
        text("Quiz time!"),
    ]);
    let mut session = session_with(crew::flat(&config).unwrap(), backend.clone());

    let reply = session
        .converse("Can you test me on my past tense verbs?")
        .await
        .unwrap();
    assert_eq!(reply, "Quiz time!");

    // All four capabilities are visible to the flat tutor, no roster
    let prompts = backend.prompts();
    assert!(prompts[0].contains("## generate_assessment"));
    assert!(prompts[0].contains("## setup_scenario"));
    assert!(prompts[0].contains("## create_learning_plan"));
    assert!(prompts[0].contains("## access_long_term_memory"));
    assert!(!prompts[0].contains(&format!("## {DELEGATE_CALL}")));

    let results = capability_results(&session);
    assert_eq!(results, ["Quiz on 'past tense verbs' is ready."]);
}

#[tokio::test]
async fn memory_recall_feeds_the_prior_struggles_summary() {
    let config = Config::default();
    let backend = ScriptedBackend::new(vec![
        call(
            memory::NAME,
            json!({"user_id": "maria", "mode": "read_summary"}),
        ),
        text("Last time irregular past tense verbs gave you trouble — shall we review?"),
    ]);
    let mut session = session_with(crew::hierarchical(&config).unwrap(), backend);

    session.converse("What should I work on today?").await.unwrap();

    let results = capability_results(&session);
    assert_eq!(results, [memory::PRIOR_STRUGGLES_SUMMARY]);
}

#[tokio::test]
async fn scenario_without_difficulty_defaults_to_intermediate() {
    let config = Config::default();
    let backend = ScriptedBackend::new(vec![
        call(DELEGATE_CALL, json!({"agent": "role_player"})),
        call(roleplay::NAME, json!({"scenario_name": "ordering coffee"})),
        text("Let's begin. I'm behind the counter — go ahead!"),
    ]);
    let mut session = session_with(crew::hierarchical(&config).unwrap(), backend);

    session
        .converse("I'd like to practice ordering a coffee.")
        .await
        .unwrap();

    let results = capability_results(&session);
    assert_eq!(results.len(), 1);
    assert!(results[0].contains("ordering coffee"));
    assert!(results[0].contains("intermediate"));
    assert!(results[0].contains(roleplay::OPENING_LINE));
}

#[tokio::test]
async fn unknown_capability_feeds_an_error_the_model_can_read() {
    let config = Config::default();
    let backend = ScriptedBackend::new(vec![
        call("grade_essay", json!({})),
        text("Sorry, I can't grade essays yet."),
    ]);
    let mut session = session_with(crew::flat(&config).unwrap(), backend);

    let reply = session.converse("Grade my essay please.").await.unwrap();
    assert_eq!(reply, "Sorry, I can't grade essays yet.");

    let results = capability_results(&session);
    assert_eq!(results.len(), 1);
    assert!(results[0].starts_with("ERROR:"));
    assert!(results[0].contains("grade_essay"));
}

#[tokio::test]
async fn unknown_specialist_feeds_an_error_and_keeps_the_turn_alive() {
    let config = Config::default();
    let backend = ScriptedBackend::new(vec![
        call(DELEGATE_CALL, json!({"agent": "chef"})),
        text("Let me handle that myself instead."),
    ]);
    let mut session = session_with(crew::hierarchical(&config).unwrap(), backend);

    let reply = session.converse("Teach me to cook.").await.unwrap();
    assert_eq!(reply, "Let me handle that myself instead.");

    let results = capability_results(&session);
    assert_eq!(results.len(), 1);
    assert!(results[0].contains("Unknown specialist 'chef'"));
    assert!(results[0].contains("role_player"));
}

#[tokio::test]
async fn runaway_turn_hits_the_step_limit() {
    let config = Config::default();
    let looping: Vec<ModelReply> = (0..MAX_TURN_STEPS + 1)
        .map(|_| call(memory::NAME, json!({"user_id": "u", "mode": "write"})))
        .collect();
    let mut session = session_with(crew::flat(&config).unwrap(), ScriptedBackend::new(looping));

    let err = session.converse("loop forever").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EngineError>(),
        Some(EngineError::TurnLimitExceeded)
    ));
}

#[tokio::test]
async fn session_rejects_duplicate_agent_names() {
    let twin_a = AgentDef::builder("twin").model("m").build().unwrap();
    let twin_b = AgentDef::builder("twin").model("m").build().unwrap();
    let root = AgentDef::builder("root")
        .model("m")
        .sub_agent(twin_a)
        .sub_agent(twin_b)
        .build()
        .unwrap();

    let backend: Arc<dyn ModelBackend> = ScriptedBackend::new(vec![]);
    let router = Arc::new(ModelRouter::new(backend));
    let result = Session::new(root, crew::registry(), router);
    assert!(matches!(result, Err(EngineError::DuplicateAgent(_))));
}

#[tokio::test]
async fn session_rejects_unresolved_capability_references() {
    let root = AgentDef::builder("root")
        .model("m")
        .capability("grade_essay")
        .build()
        .unwrap();

    let backend: Arc<dyn ModelBackend> = ScriptedBackend::new(vec![]);
    let router = Arc::new(ModelRouter::new(backend));
    let result = Session::new(root, crew::registry(), router);
    assert!(matches!(
        result,
        Err(EngineError::UnknownCapability { capability, .. }) if capability == "grade_essay"
    ));
}
