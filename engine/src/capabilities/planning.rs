//! Learning-plan capability
//!
//! Stub for the curriculum planner: returns a one-line plan confirmation
//! instead of a real day-by-day schedule.

use async_trait::async_trait;
use sdk::{Capability, CapabilityArgs, CapabilitySpec, ParamKind};
use tracing::info;

/// Registry name of this capability
pub const NAME: &str = "create_learning_plan";

pub struct PlanningCapability {
    spec: CapabilitySpec,
}

impl PlanningCapability {
    pub fn new() -> Self {
        Self {
            spec: CapabilitySpec::new(
                NAME,
                "Create a structured, weekly learning plan based on the learner's \
                 goals and past performance. Returns a day-by-day schedule of \
                 activities.",
            )
            .required("current_level", ParamKind::String)
            .required("goals", ParamKind::String)
            .required("time_per_week", ParamKind::Integer)
            .required("past_performance_summary", ParamKind::String),
        }
    }
}

impl Default for PlanningCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for PlanningCapability {
    fn spec(&self) -> &CapabilitySpec {
        &self.spec
    }

    async fn invoke(&self, args: CapabilityArgs) -> String {
        let current_level = args.str_or("current_level", "unspecified");
        let goals = args.str_or("goals", "general fluency");
        let time_per_week = args.i64_or("time_per_week", 3);

        info!(%current_level, time_per_week, "creating learning plan");

        format!("Weekly plan created: focus on '{goals}', building on past performance.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_plan_names_the_goals() {
        let capability = PlanningCapability::new();
        let args = CapabilityArgs::new()
            .with("current_level", json!("B1"))
            .with("goals", json!("conversational Spanish"))
            .with("time_per_week", json!(5))
            .with("past_performance_summary", json!("strong vocabulary"));
        let result = capability.invoke(args).await;
        assert!(result.contains("conversational Spanish"));
    }

    #[tokio::test]
    async fn test_missing_arguments_degrade_gracefully() {
        let capability = PlanningCapability::new();
        let result = capability.invoke(CapabilityArgs::new()).await;
        assert!(!result.is_empty());
        assert!(result.contains("general fluency"));
    }
}
