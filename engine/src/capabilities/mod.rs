//! Capability registry and built-in capabilities
//!
//! The four tutor capabilities are stubs: they log the request and return
//! canned text, and each is the seam where a real integration (memory
//! store, curriculum planner, quiz engine, scenario library) would plug
//! in later.

pub mod assessment;
pub mod memory;
pub mod planning;
pub mod roleplay;

pub use assessment::AssessmentCapability;
pub use memory::MemoryCapability;
pub use planning::PlanningCapability;
pub use roleplay::RoleplayCapability;

use sdk::{Capability, CapabilityArgs, CapabilitySpec};
use tracing::{debug, warn};

/// Registry of capabilities the runtime can dispatch.
///
/// Registration order is preserved; agents reference capabilities by
/// name and only see the subset their definition grants.
#[derive(Default)]
pub struct CapabilityRegistry {
    entries: Vec<Box<dyn Capability>>,
}

impl CapabilityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability. Last registration wins on a name clash.
    pub fn register(&mut self, capability: Box<dyn Capability>) {
        self.entries
            .retain(|existing| existing.spec().name != capability.spec().name);
        self.entries.push(capability);
    }

    /// Look up a capability by name
    pub fn get(&self, name: &str) -> Option<&dyn Capability> {
        self.entries
            .iter()
            .find(|c| c.spec().name == name)
            .map(|c| c.as_ref())
    }

    /// Names of all registered capabilities, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|c| c.spec().name.as_str()).collect()
    }

    /// Specs for the named capabilities, in the order given.
    /// Unknown names are skipped; `AgentDef::validate` catches those at
    /// construction time.
    pub fn specs_for(&self, names: &[String]) -> Vec<&CapabilitySpec> {
        names
            .iter()
            .filter_map(|name| self.get(name).map(|c| c.spec()))
            .collect()
    }

    /// Dispatch a capability call by name, parsing arguments from JSON.
    ///
    /// Never fails: a bad payload or unknown name comes back as
    /// explanatory text the model can read and self-correct on.
    pub async fn dispatch(&self, name: &str, arguments_json: &str) -> String {
        debug!("Dispatching capability '{}' with args: {}", name, arguments_json);

        let args = match CapabilityArgs::from_json(arguments_json) {
            Ok(args) => args,
            Err(e) => return format!("ERROR: Failed to parse arguments: {e}"),
        };

        match self.get(name) {
            Some(capability) => capability.invoke(args).await,
            None => {
                warn!("Unknown capability requested: {}", name);
                format!(
                    "ERROR: Unknown capability '{}'. Available capabilities: {}",
                    name,
                    self.names().join(", ")
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_registry() -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(MemoryCapability::new()));
        registry.register(Box::new(PlanningCapability::new()));
        registry.register(Box::new(AssessmentCapability::new()));
        registry.register(Box::new(RoleplayCapability::new()));
        registry
    }

    #[tokio::test]
    async fn test_dispatch_reaches_capability() {
        let registry = full_registry();
        let result = registry
            .dispatch(assessment::NAME, r#"{"topic": "past tense verbs"}"#)
            .await;
        assert!(result.contains("past tense verbs"));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_name_is_explanatory() {
        let registry = full_registry();
        let result = registry.dispatch("grade_essay", "{}").await;
        assert!(result.starts_with("ERROR:"));
        assert!(result.contains("grade_essay"));
        assert!(result.contains(memory::NAME));
    }

    #[tokio::test]
    async fn test_dispatch_bad_payload_is_explanatory() {
        let registry = full_registry();
        let result = registry.dispatch(memory::NAME, "not json").await;
        assert!(result.starts_with("ERROR:"));
    }

    #[test]
    fn test_specs_for_preserves_agent_order() {
        let registry = full_registry();
        let names = vec![assessment::NAME.to_string(), memory::NAME.to_string()];
        let specs = registry.specs_for(&names);
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].name, assessment::NAME);
        assert_eq!(specs[1].name, memory::NAME);
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = CapabilityRegistry::new();
        registry.register(Box::new(MemoryCapability::new()));
        registry.register(Box::new(MemoryCapability::new()));
        assert_eq!(registry.names().len(), 1);
    }
}
