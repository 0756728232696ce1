//! Model Backend Abstraction Layer
//!
//! This module provides the narrow interface the engine consumes from an
//! inference backend: a conversation is a list of messages, and each model
//! turn comes back as either a capability call or plain text. The
//! `ModelBackend` trait is the seam that lets tests substitute a
//! deterministic double for the real HTTP backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use sdk::errors::LinguaErrorExt;

pub mod gemini;

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur while talking to a model backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl LinguaErrorExt for BackendError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Unavailable(_) => "Model backend unavailable. Check configuration",
            Self::Auth(_) => "Authentication failed. Check GEMINI_API_KEY",
            Self::RateLimited => "Rate limit exceeded. Please wait before trying again",
            Self::InvalidRequest(_) => "The backend rejected the request",
            Self::Network(_) => "Network operation failed. Check your connection",
            Self::Parse(_) => "The backend returned an unexpected response",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Auth(_) | Self::InvalidRequest(_) => false,
            Self::Unavailable(_) | Self::RateLimited | Self::Network(_) | Self::Parse(_) => true,
        }
    }
}

/// Message in a conversation history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: String,

    /// Capability call this message answers, for capability results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

impl Message {
    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            call_id: None,
        }
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            call_id: None,
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            call_id: None,
        }
    }

    /// Create a capability result message
    pub fn capability_result(content: impl Into<String>, call_id: Option<String>) -> Self {
        Self {
            role: MessageRole::Capability,
            content: content.into(),
            call_id,
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User message
    User,

    /// Assistant message
    Assistant,

    /// System message
    System,

    /// Capability result message
    Capability,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
            MessageRole::Capability => write!(f, "capability"),
        }
    }
}

/// One model turn: either a capability call or final text
#[derive(Debug, Clone)]
pub enum ModelReply {
    /// The model wants a capability invoked
    Call(CapabilityCall),

    /// The model has produced its reply text
    Text(String),
}

/// Capability call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityCall {
    /// Unique identifier for this call
    pub id: String,

    /// Name of the capability to invoke
    pub name: String,

    /// Arguments to pass (JSON object as a string)
    pub arguments: String,
}

impl CapabilityCall {
    /// Create a new capability call with a fresh id
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: format!("call_{}", uuid::Uuid::new_v4()),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Model backend trait that all backends must implement
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Returns the name of the backend (e.g., "gemini")
    fn name(&self) -> &str;

    /// Generate one model turn.
    ///
    /// `model` is the opaque model identifier from the active agent's
    /// definition; `messages` is the full context including the system
    /// message.
    async fn generate(&self, model: &str, messages: &[Message]) -> Result<ModelReply>;

    /// Check if the backend is currently usable.
    /// Default implementation returns true.
    async fn check_health(&self) -> bool {
        true
    }
}

/// Interpret raw model text as a capability call, if it is one.
///
/// Models do not reliably keep to "JSON only" instructions, so three
/// shapes are accepted:
/// 1. The whole turn is a `{"function": ..., "arguments": {...}}` object
/// 2. The object is wrapped in a markdown code fence (trailing prose ok)
/// 3. The object is embedded somewhere in prose
///
/// Anything else is final text.
pub fn parse_capability_call(content: &str) -> Option<CapabilityCall> {
    let text = content.trim();

    if let Some(call) = call_from_json(text) {
        return Some(call);
    }

    if let Some(body) = fenced_block(text) {
        if let Some(call) = call_from_json(body.trim()) {
            return Some(call);
        }
    }

    if let Some(at) = text.find("{\"function\"") {
        if let Some(object) = balanced_object(&text[at..]) {
            return call_from_json(object);
        }
    }

    None
}

/// Parse a `{"function": "...", "arguments": {...}}` object.
fn call_from_json(s: &str) -> Option<CapabilityCall> {
    let value: serde_json::Value = serde_json::from_str(s).ok()?;
    let name = value.get("function")?.as_str()?;
    let arguments = value.get("arguments")?;
    Some(CapabilityCall::new(name, arguments.to_string()))
}

/// Return the body of the first markdown code fence, skipping the
/// language tag line. Trailing prose after the closing fence is fine.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_tag = &text[open + 3..];
    let body_offset = open + 3 + after_tag.find('\n')? + 1;
    let close = text[body_offset..].find("```")?;
    if close == 0 {
        return None;
    }
    Some(&text[body_offset..body_offset + close])
}

/// Return the balanced JSON object starting at the first byte of `s`,
/// respecting string literals and escapes.
fn balanced_object(s: &str) -> Option<&str> {
    if !s.starts_with('{') {
        return None;
    }
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
