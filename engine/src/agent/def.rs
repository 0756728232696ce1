//! Agent definitions
//!
//! An `AgentDef` is an immutable configuration record: it exposes no
//! behavior of its own, and the runtime interprets it. Definitions are
//! built bottom-up with `AgentBuilder`; children are owned by value, so a
//! definition can never reach itself through its own sub-agents and the
//! tree is acyclic by construction.

use sdk::errors::EngineError;
use serde::Serialize;
use std::collections::HashSet;

/// Declarative definition of one agent
#[derive(Debug, Clone, Serialize)]
pub struct AgentDef {
    name: String,
    model: String,
    instruction: String,
    capabilities: Vec<String>,
    sub_agents: Vec<AgentDef>,
}

impl AgentDef {
    /// Start building an agent definition
    pub fn builder(name: impl Into<String>) -> AgentBuilder {
        AgentBuilder {
            name: name.into(),
            model: String::new(),
            instruction: String::new(),
            capabilities: Vec::new(),
            sub_agents: Vec::new(),
        }
    }

    /// Unique agent name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque model identifier for the backend
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Instruction text handed to the model
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Names of the capabilities this agent may invoke, in declared order
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Specialist agents this agent may delegate to, in declared order
    pub fn sub_agents(&self) -> &[AgentDef] {
        &self.sub_agents
    }

    /// Find an agent by name in this subtree (including self)
    pub fn find(&self, name: &str) -> Option<&AgentDef> {
        if self.name == name {
            return Some(self);
        }
        self.sub_agents.iter().find_map(|child| child.find(name))
    }

    /// Direct specialists as (name, one-line summary) pairs for prompt
    /// assembly. The summary is the first line of the instruction.
    pub fn roster(&self) -> Vec<(&str, &str)> {
        self.sub_agents
            .iter()
            .map(|child| {
                let summary = child.instruction.lines().next().unwrap_or("");
                (child.name.as_str(), summary)
            })
            .collect()
    }

    /// Validate the whole tree against a set of known capability names.
    ///
    /// Rejects duplicate agent names anywhere in the tree and capability
    /// references that do not resolve.
    pub fn validate(&self, known_capabilities: &HashSet<String>) -> Result<(), EngineError> {
        let mut seen = HashSet::new();
        self.validate_node(known_capabilities, &mut seen)
    }

    fn validate_node(
        &self,
        known_capabilities: &HashSet<String>,
        seen: &mut HashSet<String>,
    ) -> Result<(), EngineError> {
        if !seen.insert(self.name.clone()) {
            return Err(EngineError::DuplicateAgent(self.name.clone()));
        }
        for capability in &self.capabilities {
            if !known_capabilities.contains(capability) {
                return Err(EngineError::UnknownCapability {
                    agent: self.name.clone(),
                    capability: capability.clone(),
                });
            }
        }
        for child in &self.sub_agents {
            child.validate_node(known_capabilities, seen)?;
        }
        Ok(())
    }
}

/// Builder for `AgentDef`
pub struct AgentBuilder {
    name: String,
    model: String,
    instruction: String,
    capabilities: Vec<String>,
    sub_agents: Vec<AgentDef>,
}

impl AgentBuilder {
    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the instruction text
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Grant access to a capability by name
    pub fn capability(mut self, name: impl Into<String>) -> Self {
        self.capabilities.push(name.into());
        self
    }

    /// Attach a specialist. The child is moved into the parent, which is
    /// what makes reference cycles unrepresentable.
    pub fn sub_agent(mut self, agent: AgentDef) -> Self {
        self.sub_agents.push(agent);
        self
    }

    /// Finish the definition
    pub fn build(self) -> Result<AgentDef, EngineError> {
        if self.name.trim().is_empty() {
            return Err(EngineError::EmptyAgentName);
        }
        Ok(AgentDef {
            name: self.name,
            model: self.model,
            instruction: self.instruction,
            capabilities: self.capabilities,
            sub_agents: self.sub_agents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn specialist(name: &str, capability: &str) -> AgentDef {
        AgentDef::builder(name)
            .model("test-model")
            .instruction(format!("Handle {capability} requests.\nMore detail."))
            .capability(capability)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_rejects_empty_name() {
        let result = AgentDef::builder("  ").model("m").build();
        assert!(matches!(result, Err(EngineError::EmptyAgentName)));
    }

    #[test]
    fn test_find_searches_whole_subtree() {
        let root = AgentDef::builder("root")
            .model("m")
            .sub_agent(specialist("planner", "plan"))
            .sub_agent(specialist("assessor", "quiz"))
            .build()
            .unwrap();

        assert_eq!(root.find("root").unwrap().name(), "root");
        assert_eq!(root.find("assessor").unwrap().name(), "assessor");
        assert!(root.find("stranger").is_none());
    }

    #[test]
    fn test_roster_uses_first_instruction_line() {
        let root = AgentDef::builder("root")
            .model("m")
            .sub_agent(specialist("planner", "plan"))
            .build()
            .unwrap();

        let roster = root.roster();
        assert_eq!(roster, vec![("planner", "Handle plan requests.")]);
    }

    #[test]
    fn test_validate_accepts_well_formed_tree() {
        let root = AgentDef::builder("root")
            .model("m")
            .capability("memory")
            .sub_agent(specialist("planner", "plan"))
            .build()
            .unwrap();

        assert!(root.validate(&known(&["memory", "plan"])).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let root = AgentDef::builder("tutor")
            .model("m")
            .sub_agent(specialist("planner", "plan"))
            .sub_agent(specialist("planner", "quiz"))
            .build()
            .unwrap();

        let err = root.validate(&known(&["plan", "quiz"])).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateAgent(name) if name == "planner"));
    }

    #[test]
    fn test_validate_rejects_parent_name_reused_by_child() {
        let root = AgentDef::builder("tutor")
            .model("m")
            .sub_agent(specialist("tutor", "plan"))
            .build()
            .unwrap();

        assert!(matches!(
            root.validate(&known(&["plan"])),
            Err(EngineError::DuplicateAgent(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_capability() {
        let root = AgentDef::builder("tutor")
            .model("m")
            .capability("grade_essay")
            .build()
            .unwrap();

        let err = root.validate(&known(&["memory"])).unwrap_err();
        match err {
            EngineError::UnknownCapability { agent, capability } => {
                assert_eq!(agent, "tutor");
                assert_eq!(capability, "grade_essay");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
