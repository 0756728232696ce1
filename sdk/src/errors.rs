//! Error types and handling
//!
//! Engine-level error types shared across the workspace. Capability
//! invocations never produce these: their failures are reported as text
//! inside the conversation. What remains is construction-time validation
//! of the agent tree and the runtime's turn bound. All errors implement
//! the `LinguaErrorExt` trait which provides user-friendly hints and
//! indicates whether errors are recoverable.

use thiserror::Error;

/// Trait for Lingua error extensions
///
/// Provides additional context for errors: a hint safe to display to end
/// users, and whether the condition is worth retrying.
pub trait LinguaErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Agent tree**: invalid declarative configuration, rejected before a
///   session is ever created
/// - **Runtime**: the per-turn iteration bound
#[derive(Debug, Error)]
pub enum EngineError {
    // Agent tree validation errors
    #[error("Agent name must not be empty")]
    EmptyAgentName,

    #[error("Duplicate agent name in tree: {0}")]
    DuplicateAgent(String),

    #[error("Agent '{agent}' references unknown capability '{capability}'")]
    UnknownCapability { agent: String, capability: String },

    // Runtime errors
    #[error("Turn step limit exceeded")]
    TurnLimitExceeded,
}

impl LinguaErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::EmptyAgentName => "Give every agent a non-empty name",
            Self::DuplicateAgent(_) => "Agent names must be unique across the whole tree",
            Self::UnknownCapability { .. } => {
                "Register the capability before wiring it into an agent"
            }
            Self::TurnLimitExceeded => "The turn took too many steps. Try a simpler request",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Configuration mistakes need a code/config change
            Self::EmptyAgentName | Self::DuplicateAgent(_) | Self::UnknownCapability { .. } => {
                false
            }

            // A fresh turn may well succeed
            Self::TurnLimitExceeded => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::DuplicateAgent("planner".to_string());
        assert_eq!(err.to_string(), "Duplicate agent name in tree: planner");

        let err = EngineError::UnknownCapability {
            agent: "assessor".to_string(),
            capability: "grade_essay".to_string(),
        };
        assert!(err.to_string().contains("assessor"));
        assert!(err.to_string().contains("grade_essay"));
    }

    #[test]
    fn test_recoverability() {
        assert!(!EngineError::EmptyAgentName.is_recoverable());
        assert!(!EngineError::DuplicateAgent("x".into()).is_recoverable());
        assert!(EngineError::TurnLimitExceeded.is_recoverable());
    }
}
