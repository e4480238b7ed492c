//! Founder extraction client.
//!
//! Builds the founder prompt (with or without a scraped context snippet),
//! sends it to a [`FounderModel`], and turns the outcome into a
//! [`ModelReply`]. Model failures are values here, not errors: the pipeline
//! records them and moves on to the next company.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use founderlens_shared::{FounderLensError, Result};

// ---------------------------------------------------------------------------
// Model capability
// ---------------------------------------------------------------------------

/// A text-in/text-out generative model.
#[async_trait]
pub trait FounderModel: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier for tracing.
    fn name(&self) -> &str;
}

/// Outcome of one model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    /// Raw model text, trimmed.
    Text(String),
    /// The call failed; carries the failure detail.
    Failed(String),
}

impl ModelReply {
    /// Display form. Failures render as `Error: <detail>`.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Failed(detail) => format!("Error: {detail}"),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

/// Build the founder prompt. A missing or empty `context` selects the
/// name-only variant.
pub fn build_prompt(company: &str, url: &str, context: Option<&str>) -> String {
    match context.filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "Company: {company}\n\
             Website text snippet:\n\
             {context}\n\
             \n\
             Task: Extract ONLY the founders or co-founders of {company} : {url}.\n\
             Rules:\n\
             - Output must be a valid JSON array of strings (e.g., [\"Alice Smith\", \"Bob Lee\"])\n\
             - Include only founders/co-founders (no advisors, no employees, no investors).\n"
        ),
        None => format!(
            "Return ONLY the founders or co-founders of {company}.\n\
             Rules:\n\
             - Output must be a valid JSON array of strings.\n\
             - Example: [\"Brian Chesky\", \"Joe Gebbia\", \"Nathan Blecharczyk\"]\n\
             - No extra text, no explanations.\n"
        ),
    }
}

/// Ask `model` for the founders of one company.
#[instrument(
    skip(model, context),
    fields(model_name = model.name(), with_context = context.is_some())
)]
pub async fn ask_founders(
    model: &dyn FounderModel,
    company: &str,
    url: &str,
    context: Option<&str>,
) -> ModelReply {
    let prompt = build_prompt(company, url, context);

    match model.generate(&prompt).await {
        Ok(text) => ModelReply::Text(text.trim().to_string()),
        Err(e) => {
            warn!(error = %e, "model call failed");
            ModelReply::Failed(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// OpenRouter
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenRouter chat-completions client (OpenAI-compatible API).
#[derive(Clone)]
pub struct OpenRouterModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenRouterModel {
    /// Create a client for `model` at the given API base URL.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FounderModel for OpenRouterModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| FounderLensError::Model(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(200).collect();
            return Err(FounderLensError::Model(format!("HTTP {status}: {body}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| FounderLensError::Model(format!("invalid response body: {e}")))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| FounderLensError::Model("response has no content".into()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            "chat completion"
        );

        Ok(content)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingModel {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FounderModel for RecordingModel {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct FailingModel;

    #[async_trait]
    impl FounderModel for FailingModel {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(FounderLensError::Model("quota exceeded".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn prompt_with_context() {
        let prompt = build_prompt(
            "Acme",
            "https://acme.com",
            Some("Acme was founded by Jane Doe."),
        );
        assert!(prompt.starts_with("Company: Acme\n"));
        assert!(prompt.contains("Website text snippet:\nAcme was founded by Jane Doe.\n"));
        assert!(prompt.contains("founders or co-founders of Acme : https://acme.com."));
        assert!(prompt.contains(r#"["Alice Smith", "Bob Lee"]"#));
        assert!(prompt.contains("no advisors, no employees, no investors"));
        assert!(!prompt.contains("Brian Chesky"));
    }

    #[test]
    fn prompt_without_context() {
        let prompt = build_prompt("Airbnb", "https://airbnb.com", None);
        assert!(prompt.starts_with("Return ONLY the founders or co-founders of Airbnb.\n"));
        assert!(prompt.contains(r#"["Brian Chesky", "Joe Gebbia", "Nathan Blecharczyk"]"#));
        assert!(prompt.contains("No extra text, no explanations."));
        assert!(!prompt.contains("https://airbnb.com"));
    }

    #[test]
    fn empty_context_uses_name_only_prompt() {
        assert_eq!(
            build_prompt("Airbnb", "https://airbnb.com", Some("")),
            build_prompt("Airbnb", "https://airbnb.com", None)
        );
    }

    #[test]
    fn model_reply_display() {
        assert_eq!(ModelReply::Text("[]".into()).as_text(), "[]");
        let failed = ModelReply::Failed("model error: quota exceeded".into());
        assert_eq!(failed.as_text(), "Error: model error: quota exceeded");
        assert!(failed.is_failure());
    }

    #[tokio::test]
    async fn ask_founders_trims_reply() {
        let model = RecordingModel {
            reply: "  [\"Jane Doe\"]\n".into(),
            prompts: Mutex::new(Vec::new()),
        };
        let reply = ask_founders(&model, "Acme", "https://acme.com", Some("ctx")).await;
        assert_eq!(reply, ModelReply::Text(r#"["Jane Doe"]"#.into()));

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Website text snippet:\nctx\n"));
    }

    #[tokio::test]
    async fn ask_founders_captures_failure() {
        let reply = ask_founders(&FailingModel, "Acme", "https://acme.com", None).await;
        match reply {
            ModelReply::Failed(detail) => assert!(detail.contains("quota exceeded")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn openrouter_returns_first_choice() {
        let server = wiremock::MockServer::start().await;
        let body = serde_json::json!({
            "id": "gen-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "[\"Brian Chesky\",\"Joe Gebbia\"]" } }
            ]
        });

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/api/v1/chat/completions"))
            .and(wiremock::matchers::header("authorization", "Bearer test-key"))
            .and(wiremock::matchers::body_partial_json(serde_json::json!({
                "model": "google/gemini-2.5-flash",
                "messages": [{ "role": "user", "content": "hello" }]
            })))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let model = OpenRouterModel::new(
            "test-key",
            "google/gemini-2.5-flash",
            format!("{}/api/v1/", server.uri()),
        );
        let text = model.generate("hello").await.unwrap();
        assert_eq!(text, r#"["Brian Chesky","Joe Gebbia"]"#);
        assert_eq!(model.name(), "google/gemini-2.5-flash");
    }

    #[tokio::test]
    async fn openrouter_maps_http_error() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(401).set_body_string("{\"error\":\"no auth\"}"),
            )
            .mount(&server)
            .await;

        let model = OpenRouterModel::new("bad-key", "m", server.uri());
        let err = model.generate("hello").await.unwrap_err();
        assert!(matches!(err, FounderLensError::Model(_)));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn openrouter_rejects_empty_choices() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let model = OpenRouterModel::new("key", "m", server.uri());
        let err = model.generate("hello").await.unwrap_err();
        assert!(err.to_string().contains("no content"));
    }
}
