//! Agent definitions and conversation state
//!
//! An agent is declarative configuration only: a name, a model id, an
//! instruction, and the capabilities and specialists it may use. The
//! transcript holds the conversation the runtime builds around it.

pub mod def;
pub mod transcript;

pub use def::{AgentBuilder, AgentDef};
pub use transcript::Transcript;
