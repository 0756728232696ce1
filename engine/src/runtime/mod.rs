//! Conversational runtime
//!
//! The runtime owns the validated agent tree, the capability registry,
//! and a router, and drives one turn at a time: route, act, repeat, until
//! the router answers with text. One conversational turn is handled
//! synchronously end to end; the only shared state is the immutable
//! configuration built at startup.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::agent::{AgentDef, Transcript};
use crate::capabilities::CapabilityRegistry;
use crate::llm::Message;
use crate::router::{Router, RoutingDecision};
use sdk::errors::EngineError;

/// Maximum routing steps per conversational turn
pub const MAX_TURN_STEPS: usize = 8;

/// One conversation against an agent tree
pub struct Session {
    root: AgentDef,
    registry: CapabilityRegistry,
    router: Arc<dyn Router>,
    transcript: Transcript,
}

impl Session {
    /// Create a session over a validated agent tree.
    ///
    /// Fails if the tree has duplicate agent names or references a
    /// capability the registry does not hold.
    pub fn new(
        root: AgentDef,
        registry: CapabilityRegistry,
        router: Arc<dyn Router>,
    ) -> Result<Self, EngineError> {
        let known: HashSet<String> = registry.names().iter().map(|n| n.to_string()).collect();
        root.validate(&known)?;

        Ok(Self {
            root,
            registry,
            router,
            transcript: Transcript::new(),
        })
    }

    /// The root agent the learner talks to
    pub fn root(&self) -> &AgentDef {
        &self.root
    }

    /// Conversation history so far
    pub fn transcript(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// Handle one learner utterance and return the reply.
    ///
    /// Each step asks the router what the active agent does next:
    /// delegation re-focuses the turn on a specialist, capability results
    /// are fed back into the transcript, and text ends the turn. Backend
    /// failures propagate to the caller untranslated.
    pub async fn converse(&mut self, utterance: &str) -> Result<String> {
        info!(agent = self.root.name(), "turn started");
        self.transcript.push(Message::user(utterance));

        // Every turn starts at the root; delegation lasts for the rest
        // of the turn only.
        let mut active: &AgentDef = &self.root;

        for step in 0..MAX_TURN_STEPS {
            let specs = self.registry.specs_for(active.capabilities());
            let decision = self
                .router
                .route(active, &specs, self.transcript.messages())
                .await
                .with_context(|| format!("routing failed for agent '{}'", active.name()))?;

            match decision {
                RoutingDecision::Delegate(name) => {
                    match self.root.sub_agents().iter().find(|a| a.name() == name) {
                        Some(specialist) => {
                            info!(specialist = name.as_str(), step, "delegating turn");
                            self.transcript
                                .push(Message::assistant(format!("Handing this over to {name}.")));
                            active = specialist;
                        }
                        None => {
                            warn!(specialist = name.as_str(), "unknown delegation target");
                            self.transcript.push(Message::capability_result(
                                format!(
                                    "ERROR: Unknown specialist '{name}'. Available specialists: {}",
                                    self.root
                                        .roster()
                                        .iter()
                                        .map(|(n, _)| *n)
                                        .collect::<Vec<_>>()
                                        .join(", ")
                                ),
                                None,
                            ));
                        }
                    }
                }

                RoutingDecision::Invoke(call) => {
                    debug!(capability = call.name.as_str(), id = call.id.as_str(), step, "capability call");

                    // Record the call before its result so the model sees
                    // the request/response pairing in order.
                    let arguments: serde_json::Value =
                        serde_json::from_str(&call.arguments).unwrap_or(serde_json::Value::Null);
                    self.transcript.push(Message::assistant(
                        serde_json::json!({
                            "function": call.name,
                            "arguments": arguments,
                        })
                        .to_string(),
                    ));

                    let result = self.registry.dispatch(&call.name, &call.arguments).await;
                    self.transcript
                        .push(Message::capability_result(result, Some(call.id)));
                }

                RoutingDecision::Respond(text) => {
                    info!(agent = active.name(), steps = step + 1, "turn finished");
                    self.transcript.push(Message::assistant(text.clone()));
                    return Ok(text);
                }
            }
        }

        Err(EngineError::TurnLimitExceeded.into())
    }
}
