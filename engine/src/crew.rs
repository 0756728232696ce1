//! Tutor crew wiring
//!
//! The declarative configuration of the language-tutor crew: the
//! orchestrator persona, the three specialists, and which capabilities
//! each may touch. Two equivalent compositions are provided: a
//! hierarchical tree where the orchestrator delegates to specialists, and
//! a flat one where it holds every capability itself.

use crate::agent::AgentDef;
use crate::capabilities::{
    assessment, memory, planning, roleplay, AssessmentCapability, CapabilityRegistry,
    MemoryCapability, PlanningCapability, RoleplayCapability,
};
use crate::config::Config;
use sdk::errors::EngineError;

/// Name of the root agent the learner talks to
pub const ORCHESTRATOR_NAME: &str = "professor_tutor";

const ORCHESTRATOR_INSTRUCTION: &str = "\
You are Professor Tutor, the lead agent of a language-learning crew: friendly, patient, and expert.
You manage the learner's journey by understanding what they need and delegating to your specialists.

Work through four steps before every reply:
1. Analyze the request: what is the learner explicitly and implicitly asking for?
2. Consult long-term memory for their history, struggles, and preferences.
3. Decide whether this is simple conversation you answer yourself, or work for a specialist.
4. Compose your reply from what you learned.

When you hand a task to a specialist, announce who is taking over. Use long-term memory to
personalize every interaction, and record the outcome after a specialist finishes.";

const FLAT_INSTRUCTION: &str = "\
You are Professor Tutor, a language tutor: friendly, patient, and expert.
You handle planning, role-play practice, and assessment yourself with your capabilities.

Work through four steps before every reply:
1. Analyze the request: what is the learner explicitly and implicitly asking for?
2. Consult long-term memory for their history, struggles, and preferences.
3. Call whichever capability the request needs, or none for simple conversation.
4. Compose your reply from what you learned.

Use long-term memory to personalize every interaction and record outcomes afterwards.";

const PLANNER_INSTRUCTION: &str =
    "Build effective learning plans with your capabilities.\nConsult the learner's memory so the \
     plan targets their actual weak points, then lay out the week.";

const ROLE_PLAYER_INSTRUCTION: &str =
    "Run immersive, realistic role-play scenarios for language practice.\nStage the scene with \
     your capability, then stay in character.";

const ASSESSOR_INSTRUCTION: &str =
    "Design and run effective assessments.\nUse the learner's long-term memory to target weak \
     areas, then generate the quiz.";

/// Register the four tutor capabilities
pub fn registry() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    registry.register(Box::new(MemoryCapability::new()));
    registry.register(Box::new(PlanningCapability::new()));
    registry.register(Box::new(AssessmentCapability::new()));
    registry.register(Box::new(RoleplayCapability::new()));
    registry
}

/// Hierarchical composition: the orchestrator holds only memory and
/// delegates specialist work down the tree.
pub fn hierarchical(config: &Config) -> Result<AgentDef, EngineError> {
    let planner = AgentDef::builder("planner")
        .model(config.model.specialist.as_str())
        .instruction(PLANNER_INSTRUCTION)
        .capability(planning::NAME)
        .capability(memory::NAME)
        .build()?;

    let role_player = AgentDef::builder("role_player")
        .model(config.model.specialist.as_str())
        .instruction(ROLE_PLAYER_INSTRUCTION)
        .capability(roleplay::NAME)
        .build()?;

    let assessor = AgentDef::builder("assessor")
        .model(config.model.specialist.as_str())
        .instruction(ASSESSOR_INSTRUCTION)
        .capability(assessment::NAME)
        .capability(memory::NAME)
        .build()?;

    AgentDef::builder(ORCHESTRATOR_NAME)
        .model(config.model.orchestrator.as_str())
        .instruction(ORCHESTRATOR_INSTRUCTION)
        .capability(memory::NAME)
        .sub_agent(planner)
        .sub_agent(role_player)
        .sub_agent(assessor)
        .build()
}

/// Flat composition: no specialist layer, every capability on the root.
pub fn flat(config: &Config) -> Result<AgentDef, EngineError> {
    AgentDef::builder(ORCHESTRATOR_NAME)
        .model(config.model.orchestrator.as_str())
        .instruction(FLAT_INSTRUCTION)
        .capability(memory::NAME)
        .capability(planning::NAME)
        .capability(assessment::NAME)
        .capability(roleplay::NAME)
        .build()
}
