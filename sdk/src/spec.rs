//! Declarative capability signatures
//!
//! A `CapabilitySpec` is construction-time metadata: the capability's name,
//! the description the router uses as its only routing hint, and the
//! declared parameters. Specs are rendered into the system prompt, so the
//! description should say *when* to use the capability, not how it works.

use serde::{Deserialize, Serialize};

/// Parameter value kinds a capability can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamKind::String => write!(f, "string"),
            ParamKind::Integer => write!(f, "integer"),
            ParamKind::Boolean => write!(f, "boolean"),
        }
    }
}

/// A single declared parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub required: bool,

    /// Default value rendered into prompts for optional parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

/// Declarative signature of one capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilitySpec {
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl CapabilitySpec {
    /// Start a spec with a name and a routing-hint description
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
        }
    }

    /// Declare a required parameter
    pub fn required(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            required: true,
            default: None,
        });
        self
    }

    /// Declare an optional parameter with its default value
    pub fn optional(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        default: serde_json::Value,
    ) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind,
            required: false,
            default: Some(default),
        });
        self
    }

    /// Look up a declared parameter by name
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Render this spec as a prompt section.
    ///
    /// Format:
    /// ```text
    /// ## setup_scenario
    /// Get the details for a role-playing scenario.
    /// Arguments: {"scenario_name": string, "difficulty": string (optional, default "intermediate")}
    /// ```
    pub fn prompt_block(&self) -> String {
        let rendered: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                let mut entry = format!("\"{}\": {}", p.name, p.kind);
                if !p.required {
                    match &p.default {
                        Some(d) => entry.push_str(&format!(" (optional, default {d})")),
                        None => entry.push_str(" (optional)"),
                    }
                }
                entry
            })
            .collect();

        format!(
            "## {}\n{}\nArguments: {{{}}}",
            self.name,
            self.description,
            rendered.join(", ")
        )
    }
}
