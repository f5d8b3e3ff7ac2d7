//! Language model boundary
//!
//! One client for all model calls, speaking the OpenAI-compatible
//! chat-completions protocol (Groq by default). The model returns free-form
//! text with no schema enforcement; callers parse defensively.

pub mod prompts;

pub use prompts::build_match_prompt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::config::LlmConfig;
use crate::errors::Result;
use crate::errors::SmartApplyError;

/// Language model collaborator boundary
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate free-form text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Chat-completions client for OpenAI-compatible endpoints
pub struct LlmService {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl LlmService {
    /// Create a new LLM service
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| SmartApplyError::Http(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    async fn chat_completion(&self, prompt: &str) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage<'a>>,
            temperature: f32,
        }

        #[derive(Serialize)]
        struct ChatMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        // Chat endpoints answer with `message.content`; legacy completion
        // endpoints answer with `text`. Tolerate both shapes.
        #[derive(Deserialize)]
        struct Choice {
            message: Option<MessageContent>,
            text: Option<String>,
        }

        #[derive(Deserialize)]
        struct MessageContent {
            content: String,
        }

        let url = format!("{}/chat/completions", self.endpoint);
        debug!("Calling chat completions API: {} (model {})", url, self.model);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SmartApplyError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SmartApplyError::Llm(format!(
                "Chat completions API error ({status}): {error_text}"
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| SmartApplyError::Llm(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.map(|m| m.content).or(choice.text))
            .ok_or_else(|| SmartApplyError::Llm("Model returned no content".to_string()))
    }
}

#[async_trait]
impl LanguageModel for LlmService {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat_completion(prompt).await
    }
}
