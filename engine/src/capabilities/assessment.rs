//! Assessment capability
//!
//! Stub for the quiz engine: confirms that a quiz is ready rather than
//! generating real questions.

use async_trait::async_trait;
use sdk::{Capability, CapabilityArgs, CapabilitySpec, ParamKind};
use serde_json::json;
use tracing::info;

/// Registry name of this capability
pub const NAME: &str = "generate_assessment";

pub struct AssessmentCapability {
    spec: CapabilitySpec,
}

impl AssessmentCapability {
    pub fn new() -> Self {
        Self {
            spec: CapabilitySpec::new(
                NAME,
                "Create a quiz on a specific topic, often informed by the \
                 learner's past mistakes from long-term memory. Returns a set \
                 of questions and answers.",
            )
            .required("topic", ParamKind::String)
            .optional("num_questions", ParamKind::Integer, json!(5))
            .optional("focus_on_past_mistakes", ParamKind::Boolean, json!(true)),
        }
    }
}

impl Default for AssessmentCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for AssessmentCapability {
    fn spec(&self) -> &CapabilitySpec {
        &self.spec
    }

    async fn invoke(&self, args: CapabilityArgs) -> String {
        let topic = args.str_or("topic", "general review");
        let num_questions = args.i64_or("num_questions", 5);
        let focus_on_past_mistakes = args.bool_or("focus_on_past_mistakes", true);

        info!(
            %topic,
            num_questions, focus_on_past_mistakes, "generating assessment"
        );

        format!("Quiz on '{topic}' is ready.")
    }
}
