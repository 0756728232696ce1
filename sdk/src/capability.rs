//! Capability trait
//!
//! The capability seam between the engine and domain actions. A capability
//! is a stateless text-in/text-out action: it declares its signature once
//! and answers every invocation with explanatory text, never with an error.
//! The model cannot recover a typed error mid-conversation, so failures are
//! reported as text the model can read and react to.

use crate::spec::CapabilitySpec;
use crate::types::CapabilityArgs;
use async_trait::async_trait;

/// Trait implemented by every capability the engine can dispatch
#[async_trait]
pub trait Capability: Send + Sync {
    /// The declarative signature of this capability
    fn spec(&self) -> &CapabilitySpec;

    /// Run the capability.
    ///
    /// Must accept any argument set within the declared parameter kinds
    /// and degrade gracefully on anything else; the return value is the
    /// text fed back into the conversation.
    async fn invoke(&self, args: CapabilityArgs) -> String;
}
