//! Configuration management
//!
//! The engine is configured entirely from environment variables, resolved
//! once at startup into an immutable `Config` that is passed down
//! explicitly. Missing variables are filled with defaults, never treated
//! as errors.
//!
//! # Variables
//!
//! - `LINGUA_LOG`: log level (error, warn, info, debug, trace)
//! - `LINGUA_PROJECT`: cloud project id (empty selects API-key mode)
//! - `LINGUA_LOCATION`: cloud region
//! - `LINGUA_USE_VERTEX`: backend-selection flag; defaults to on when a
//!   project id is set
//! - `LINGUA_MODEL_BASE_URL`: model endpoint override (used by tests)
//! - `LINGUA_ORCHESTRATOR_MODEL` / `LINGUA_SPECIALIST_MODEL`: model ids
//! - `GEMINI_API_KEY`: API key (access token in Vertex mode)

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOCATION: &str = "global";
const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_VERTEX_BASE_URL: &str = "https://aiplatform.googleapis.com/v1";

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    /// Core engine settings
    pub core: CoreConfig,

    /// Cloud backend selection
    pub cloud: CloudConfig,

    /// Model backend settings
    pub model: ModelConfig,
}

/// Core engine configuration
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

/// Cloud backend configuration
#[derive(Debug, Clone)]
pub struct CloudConfig {
    /// Cloud project id; empty means no project (API-key mode)
    pub project: String,

    /// Cloud region
    pub location: String,

    /// Route model calls through the Vertex endpoint
    pub use_vertex: bool,
}

/// Model backend configuration
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model id used by the orchestrator agent
    pub orchestrator: String,

    /// Model id used by specialist agents
    pub specialist: String,

    /// Base URL of the model endpoint
    pub base_url: String,

    /// API key for the public endpoint (access token in Vertex mode).
    /// Empty means unauthenticated; the backend reports this at call time.
    pub api_key: String,
}

impl Config {
    /// Resolve configuration from process environment variables.
    ///
    /// Called once at startup; the result is immutable for the life of
    /// the process.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary lookup function.
    ///
    /// Exists so tests can exercise resolution without touching the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let project = lookup("LINGUA_PROJECT").unwrap_or_default();

        // A configured project implies the Vertex backend unless the
        // flag says otherwise.
        let use_vertex = lookup("LINGUA_USE_VERTEX")
            .map(|v| flag_is_set(&v))
            .unwrap_or(!project.is_empty());

        let base_url = lookup("LINGUA_MODEL_BASE_URL").unwrap_or_else(|| {
            if use_vertex {
                DEFAULT_VERTEX_BASE_URL.to_string()
            } else {
                DEFAULT_GEMINI_BASE_URL.to_string()
            }
        });

        Self {
            core: CoreConfig {
                log_level: lookup("LINGUA_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            cloud: CloudConfig {
                project,
                location: lookup("LINGUA_LOCATION")
                    .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
                use_vertex,
            },
            model: ModelConfig {
                orchestrator: lookup("LINGUA_ORCHESTRATOR_MODEL")
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                specialist: lookup("LINGUA_SPECIALIST_MODEL")
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url,
                api_key: lookup("GEMINI_API_KEY").unwrap_or_default(),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn flag_is_set(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
