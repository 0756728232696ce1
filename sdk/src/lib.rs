//! Lingua SDK
//!
//! Shared library providing the capability contract used by the engine:
//! argument types, declarative capability specs, and error types.

/// Capability trait
pub mod capability;

/// Error types and handling
pub mod errors;

/// Declarative capability signatures
pub mod spec;

/// Capability argument types
pub mod types;

// Re-export commonly used types
pub use capability::Capability;
pub use errors::{EngineError, LinguaErrorExt};
pub use spec::{CapabilitySpec, ParamKind, ParamSpec};
pub use types::{ArgError, CapabilityArgs};
