//! Role-play scenario capability
//!
//! Stub for the scenario library: always stages the restaurant scene with
//! its fixed opening line.

use async_trait::async_trait;
use sdk::{Capability, CapabilityArgs, CapabilitySpec, ParamKind};
use serde_json::json;
use tracing::info;

/// Registry name of this capability
pub const NAME: &str = "setup_scenario";

/// Opening line used to start every staged scenario
pub const OPENING_LINE: &str = "Hello, a table for one, please.";

const DEFAULT_DIFFICULTY: &str = "intermediate";

pub struct RoleplayCapability {
    spec: CapabilitySpec,
}

impl RoleplayCapability {
    pub fn new() -> Self {
        Self {
            spec: CapabilitySpec::new(
                NAME,
                "Get the details for a role-playing scenario. Returns the \
                 setting, your role, and an opening line to start the \
                 conversation.",
            )
            .required("scenario_name", ParamKind::String)
            .optional("difficulty", ParamKind::String, json!(DEFAULT_DIFFICULTY)),
        }
    }
}

impl Default for RoleplayCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for RoleplayCapability {
    fn spec(&self) -> &CapabilitySpec {
        &self.spec
    }

    async fn invoke(&self, args: CapabilityArgs) -> String {
        let scenario_name = args.str_or("scenario_name", "a conversation");
        let difficulty = args.str_or("difficulty", DEFAULT_DIFFICULTY);

        info!(%scenario_name, %difficulty, "setting up scenario");

        format!(
            "Scenario '{scenario_name}' ready at {difficulty} difficulty. \
             You are at a restaurant. Your opening line is '{OPENING_LINE}'"
        )
    }
}
