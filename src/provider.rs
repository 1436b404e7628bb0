use crate::config::Config;
use crate::errors::ProviderError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Only the fields we read; everything else in the reply is ignored.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Client for the hosted chat-completion endpoint.
///
/// No timeout or retry is configured; a hanging provider holds the calling
/// request until the transport gives up.
#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    referer: String,
}

impl CompletionClient {
    /// Creates a new `CompletionClient` from the provider section of `config`.
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            ProviderError::Transport(format!("Failed to create provider client: {}", e))
        })?;

        Ok(Self {
            client,
            url: config.provider_url.clone(),
            api_key: config.provider_api_key.clone(),
            model: config.provider_model.clone(),
            referer: config.provider_referer.clone(),
        })
    }

    /// Sends `prompt` as a single user message and returns the text of the
    /// first choice.
    ///
    /// # Errors
    ///
    /// * [`ProviderError::Transport`] when no response was received.
    /// * [`ProviderError::Status`] on any non-2xx status, carrying the raw body.
    /// * [`ProviderError::MalformedResponse`] when a 2xx body lacks
    ///   `choices[0].message.content`.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("HTTP-Referer", &self.referer)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("Provider returned {}", status);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes).map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse provider response: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse(
                    "missing choices[0].message.content".to_string(),
                )
            })
    }
}
