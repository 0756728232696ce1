use super::{BackendError, Message, MessageRole, ModelBackend, ModelReply};
use crate::config::Config;
use async_trait::async_trait;
use serde_json::json;

/// Gemini REST backend.
///
/// Speaks `generateContent` against either the public API-key endpoint or
/// the Vertex endpoint, selected by the startup configuration.
pub struct GeminiBackend {
    base_url: String,
    api_key: String,
    project: String,
    location: String,
    use_vertex: bool,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.model.base_url.clone(),
            api_key: config.model.api_key.clone(),
            project: config.cloud.project.clone(),
            location: config.cloud.location.clone(),
            use_vertex: config.cloud.use_vertex,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        if self.use_vertex {
            format!(
                "{}/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
                self.base_url, self.project, self.location, model
            )
        } else {
            format!("{}/models/{}:generateContent", self.base_url, model)
        }
    }

    fn payload(messages: &[Message]) -> serde_json::Value {
        let mut contents = Vec::new();
        let mut system_instruction = None;

        for msg in messages {
            if msg.role == MessageRole::System {
                system_instruction = Some(json!({
                    "parts": [{"text": msg.content}]
                }));
                continue;
            }

            // Capability results go back as user turns; Gemini only
            // distinguishes "user" and "model".
            let role = if msg.role == MessageRole::Assistant {
                "model"
            } else {
                "user"
            };
            contents.push(json!({
                "role": role,
                "parts": [{"text": msg.content}]
            }));
        }

        let mut payload = serde_json::Map::new();
        payload.insert("contents".to_string(), json!(contents));
        if let Some(sys) = system_instruction {
            payload.insert("systemInstruction".to_string(), sys);
        }
        serde_json::Value::Object(payload)
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn check_health(&self) -> bool {
        if self.use_vertex {
            !self.project.is_empty() && !self.api_key.is_empty()
        } else {
            !self.api_key.is_empty()
        }
    }

    async fn generate(&self, model: &str, messages: &[Message]) -> super::Result<ModelReply> {
        if self.api_key.is_empty() {
            return Err(BackendError::Auth(
                "no credentials configured; set GEMINI_API_KEY".to_string(),
            ));
        }

        let mut request = self
            .client
            .post(self.endpoint(model))
            .header("Content-Type", "application/json")
            .json(&Self::payload(messages));

        // Vertex expects a bearer token; the public endpoint takes the
        // key as a query parameter.
        request = if self.use_vertex {
            request.bearer_auth(&self.api_key)
        } else {
            request.query(&[("key", self.api_key.as_str())])
        };

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                400 | 404 => BackendError::InvalidRequest(text),
                401 | 403 => BackendError::Auth(text),
                429 => BackendError::RateLimited,
                _ => BackendError::Unavailable(format!("Gemini API error ({status}): {text}")),
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        let parts = data
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| BackendError::Parse("no candidates in response".to_string()))?;

        let mut full_text = String::new();
        for part in parts {
            if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                full_text.push_str(text);
            }
        }

        if let Some(call) = super::parse_capability_call(&full_text) {
            return Ok(ModelReply::Call(call));
        }

        Ok(ModelReply::Text(full_text))
    }
}
