//! Routing layer
//!
//! One model turn produces one `RoutingDecision`: invoke a capability,
//! delegate to a specialist, or answer the learner directly. The `Router`
//! trait keeps the decision-maker abstract; `ModelRouter` is the
//! inference-backed implementation, and tests substitute a deterministic
//! backend behind the same trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::agent::AgentDef;
use crate::llm::{self, CapabilityCall, Message, ModelBackend, ModelReply};
use sdk::CapabilitySpec;

/// Pseudo-capability name the model uses to hand a turn to a specialist
pub const DELEGATE_CALL: &str = "delegate_to";

/// What the active agent should do next
#[derive(Debug, Clone)]
pub enum RoutingDecision {
    /// Invoke a capability and continue the turn
    Invoke(CapabilityCall),

    /// Hand the rest of the turn to the named specialist
    Delegate(String),

    /// Answer the learner with this text and end the turn
    Respond(String),
}

/// Trait for turn-level routing
#[async_trait]
pub trait Router: Send + Sync {
    /// Decide the next step for `agent` given its visible capabilities
    /// and the conversation so far.
    async fn route(
        &self,
        agent: &AgentDef,
        specs: &[&CapabilitySpec],
        transcript: &[Message],
    ) -> llm::Result<RoutingDecision>;
}

/// Inference-backed router
pub struct ModelRouter {
    backend: Arc<dyn ModelBackend>,
}

impl ModelRouter {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    /// Assemble the system message for one routing call: the agent's
    /// instruction, the call protocol, the delegation roster, and the
    /// capability specs.
    fn system_prompt(agent: &AgentDef, specs: &[&CapabilitySpec]) -> String {
        let mut parts = vec![
            agent.instruction().to_string(),
            String::new(),
            "RULES:".to_string(),
            "1. To use a capability, your ENTIRE response must be ONLY the JSON object — no explanation, no markdown fences, no surrounding text.".to_string(),
            "2. When you can answer the learner directly, respond with plain text only — no JSON.".to_string(),
            "3. Never invent a capability result. Call the capability and wait for the real result.".to_string(),
            String::new(),
            r#"Capability call format (your entire response must be exactly this):"#.to_string(),
            r#"{"function": "capability_name", "arguments": {"arg1": "value1"}}"#.to_string(),
        ];

        let roster = agent.roster();
        if !roster.is_empty() {
            parts.push(String::new());
            parts.push("Your specialists:".to_string());
            for (name, summary) in &roster {
                parts.push(format!("- {name}: {summary}"));
            }
            parts.push(String::new());
            parts.push(format!("## {DELEGATE_CALL}"));
            parts.push("Hand the current request over to one of your specialists.".to_string());
            parts.push(r#"Arguments: {"agent": "specialist name"}"#.to_string());
        }

        if !specs.is_empty() {
            parts.push(String::new());
            parts.push("Available capabilities:".to_string());
            for spec in specs {
                parts.push(String::new());
                parts.push(spec.prompt_block());
            }
        }

        parts.join("\n")
    }
}

#[async_trait]
impl Router for ModelRouter {
    async fn route(
        &self,
        agent: &AgentDef,
        specs: &[&CapabilitySpec],
        transcript: &[Message],
    ) -> llm::Result<RoutingDecision> {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(Message::system(Self::system_prompt(agent, specs)));
        messages.extend_from_slice(transcript);

        let reply = self.backend.generate(agent.model(), &messages).await?;

        Ok(match reply {
            ModelReply::Call(call) if call.name == DELEGATE_CALL => {
                match delegation_target(&call.arguments) {
                    Some(name) => RoutingDecision::Delegate(name),
                    None => {
                        warn!("delegation call without an agent name: {}", call.arguments);
                        RoutingDecision::Respond(
                            "I could not tell which specialist should take this — could you \
                             rephrase your request?"
                                .to_string(),
                        )
                    }
                }
            }
            ModelReply::Call(call) => RoutingDecision::Invoke(call),
            ModelReply::Text(text) => RoutingDecision::Respond(text),
        })
    }
}

fn delegation_target(arguments: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(arguments).ok()?;
    value
        .get("agent")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{self, CapabilityRegistry, MemoryCapability, RoleplayCapability};
    use crate::llm::BackendError;
    use std::sync::Mutex;

    /// Backend that replays a fixed reply and records what it was asked
    struct FixedBackend {
        reply: Mutex<Option<ModelReply>>,
        seen_system: Mutex<Option<String>>,
        seen_model: Mutex<Option<String>>,
    }

    impl FixedBackend {
        fn new(reply: ModelReply) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen_system: Mutex::new(None),
                seen_model: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ModelBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(&self, model: &str, messages: &[Message]) -> llm::Result<ModelReply> {
            *self.seen_model.lock().unwrap() = Some(model.to_string());
            *self.seen_system.lock().unwrap() = messages
                .iter()
                .find(|m| m.role == crate::llm::MessageRole::System)
                .map(|m| m.content.clone());
            self.reply
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| BackendError::Unavailable("reply consumed".to_string()))
        }
    }

    fn tutor_with_specialist() -> (AgentDef, CapabilityRegistry) {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(MemoryCapability::new()));
        registry.register(Box::new(RoleplayCapability::new()));

        let role_player = AgentDef::builder("role_player")
            .model("specialist-model")
            .instruction("Run immersive role-play scenarios.")
            .capability(capabilities::roleplay::NAME)
            .build()
            .unwrap();
        let root = AgentDef::builder("tutor")
            .model("orchestrator-model")
            .instruction("You are Professor Tutor.")
            .capability(capabilities::memory::NAME)
            .sub_agent(role_player)
            .build()
            .unwrap();
        (root, registry)
    }

    #[tokio::test]
    async fn test_prompt_carries_instruction_roster_and_specs() {
        let (root, registry) = tutor_with_specialist();
        let backend = Arc::new(FixedBackend::new(ModelReply::Text("hi".to_string())));
        let router = ModelRouter::new(backend.clone());

        let specs = registry.specs_for(root.capabilities());
        let decision = router
            .route(&root, &specs, &[Message::user("hello")])
            .await
            .unwrap();
        assert!(matches!(decision, RoutingDecision::Respond(t) if t == "hi"));

        let prompt = backend.seen_system.lock().unwrap().clone().unwrap();
        assert!(prompt.contains("You are Professor Tutor."));
        assert!(prompt.contains("- role_player: Run immersive role-play scenarios."));
        assert!(prompt.contains("## delegate_to"));
        assert!(prompt.contains("## access_long_term_memory"));
        // Only the agent's own capabilities are advertised
        assert!(!prompt.contains("## setup_scenario"));

        let model = backend.seen_model.lock().unwrap().clone().unwrap();
        assert_eq!(model, "orchestrator-model");
    }

    #[tokio::test]
    async fn test_capability_call_becomes_invoke() {
        let (root, registry) = tutor_with_specialist();
        let call = CapabilityCall::new(capabilities::memory::NAME, r#"{"mode": "read_summary"}"#);
        let router = ModelRouter::new(Arc::new(FixedBackend::new(ModelReply::Call(call))));

        let specs = registry.specs_for(root.capabilities());
        let decision = router.route(&root, &specs, &[]).await.unwrap();
        assert!(
            matches!(decision, RoutingDecision::Invoke(c) if c.name == capabilities::memory::NAME)
        );
    }

    #[tokio::test]
    async fn test_delegate_call_becomes_delegate() {
        let (root, registry) = tutor_with_specialist();
        let call = CapabilityCall::new(DELEGATE_CALL, r#"{"agent": "role_player"}"#);
        let router = ModelRouter::new(Arc::new(FixedBackend::new(ModelReply::Call(call))));

        let specs = registry.specs_for(root.capabilities());
        let decision = router.route(&root, &specs, &[]).await.unwrap();
        assert!(matches!(decision, RoutingDecision::Delegate(name) if name == "role_player"));
    }

    #[tokio::test]
    async fn test_malformed_delegation_degrades_to_text() {
        let (root, registry) = tutor_with_specialist();
        let call = CapabilityCall::new(DELEGATE_CALL, r#"{"specialist": "role_player"}"#);
        let router = ModelRouter::new(Arc::new(FixedBackend::new(ModelReply::Call(call))));

        let specs = registry.specs_for(root.capabilities());
        let decision = router.route(&root, &specs, &[]).await.unwrap();
        assert!(matches!(decision, RoutingDecision::Respond(_)));
    }
}
