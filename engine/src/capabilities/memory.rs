//! Long-term memory capability
//!
//! Stub over the learner's permanent memory file. A production build
//! would back this with a document store; here every call is logged and
//! answered with canned text so routing behavior stays observable.

use async_trait::async_trait;
use sdk::{Capability, CapabilityArgs, CapabilitySpec, ParamKind};
use serde_json::json;
use tracing::info;

/// Registry name of this capability
pub const NAME: &str = "access_long_term_memory";

/// Summary returned for `read_summary`, whatever the user id
pub const PRIOR_STRUGGLES_SUMMARY: &str =
    "User previously struggled with irregular past tense verbs.";

const GENERIC_CONFIRMATION: &str = "Memory access successful.";

pub struct MemoryCapability {
    spec: CapabilitySpec,
}

impl MemoryCapability {
    pub fn new() -> Self {
        Self {
            spec: CapabilitySpec::new(
                NAME,
                "Read from or write to the learner's permanent memory file. \
                 Essential for personalization and tracking progress. \
                 'mode' can be 'write', 'read_summary', or 'query_mistakes'.",
            )
            .required("user_id", ParamKind::String)
            .required("mode", ParamKind::String)
            .optional("data", ParamKind::String, json!("")),
        }
    }
}

impl Default for MemoryCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for MemoryCapability {
    fn spec(&self) -> &CapabilitySpec {
        &self.spec
    }

    async fn invoke(&self, args: CapabilityArgs) -> String {
        let user_id = args.str_or("user_id", "anonymous");
        let mode = args.str_or("mode", "write");
        let data = args.str_or("data", "");

        info!(%user_id, %mode, %data, "accessing long-term memory");

        // Only read_summary has distinctive content; every other mode,
        // recognized or not, confirms generically.
        if mode == "read_summary" {
            PRIOR_STRUGGLES_SUMMARY.to_string()
        } else {
            GENERIC_CONFIRMATION.to_string()
        }
    }
}
