use std::fmt;

use appscout_core::LlmSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClassifierError;

/// A chat-completion service that answers one system + user exchange.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, system_prompt: &str, user_text: &str)
        -> Result<String, ClassifierError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints (Groq by default).
#[derive(Clone)]
pub struct OpenAiCompatibleBackend {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
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

impl fmt::Debug for OpenAiCompatibleBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleBackend")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleBackend {
    pub fn new(settings: &LlmSettings) -> Result<Self, ClassifierError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ClassifierError::Init("missing API key".to_string()))?
            .to_string();

        let base_url = reqwest::Url::parse(&settings.base_url).map_err(|err| {
            ClassifierError::Init(format!("invalid base url {}: {err}", settings.base_url))
        })?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| ClassifierError::Init(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/chat/completions",
                base_url.as_str().trim_end_matches('/')
            ),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionBackend for OpenAiCompatibleBackend {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, ClassifierError> {
        let payload = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "calling completion backend");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(ClassifierError::from_transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ClassifierError::from_transport)?;
        if !status.is_success() {
            return Err(ClassifierError::from_status(status.as_u16(), &body));
        }

        extract_first_content(&body)
    }
}

fn extract_first_content(body: &str) -> Result<String, ClassifierError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|err| ClassifierError::Malformed(err.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(ClassifierError::EmptyCompletion)
}
