use crate::config::CompletionSettings;
use crate::models::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling the completion model
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("OPENAI_API_KEY is not set; add OPENAI_API_KEY=sk-... to your environment or .env file")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("completion API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("model returned no text output")]
    EmptyOutput,
}

/// OpenAI-compatible chat completion client
///
/// Sends a single non-streaming request per call to
/// `{api_url}/chat/completions` with bearer authentication.
pub struct CompletionClient {
    api_url: String,
    api_key: String,
    model: String,
    json_mode: bool,
    client: Client,
}

impl CompletionClient {
    /// Create a client from settings; fails when no API key is configured
    pub fn from_settings(settings: &CompletionSettings) -> Result<Self, CompletionError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CompletionError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            api_url: settings.api_url.clone(),
            api_key,
            model: settings.model.clone(),
            json_mode: settings.json_mode,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }

    /// Map a non-success status and body to an error
    fn parse_error_response(status: StatusCode, body: &str) -> CompletionError {
        let message = match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(error_response) => match error_response.error.error_type {
                Some(kind) => format!("{} ({})", error_response.error.message, kind),
                None => error_response.error.message,
            },
            Err(_) => body.chars().take(200).collect(),
        };

        CompletionError::ApiError {
            status: status.as_u16(),
            message,
        }
    }

    /// Send `system` and `prompt` and return the model's text output
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            response_format: self.json_mode.then(ResponseFormat::json_object),
        };

        tracing::debug!(
            "Sending completion request to {} (model: {}, prompt: {} chars)",
            self.api_url,
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!("Completion API error: {}", status);
            return Err(Self::parse_error_response(status, &body));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = completion.usage {
            tracing::debug!(
                "Token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::InvalidResponse("API returned no choices".to_string()))?;

        tracing::debug!(
            "Completion finished (model: {}, finish_reason: {:?})",
            completion.model.as_deref().unwrap_or(&self.model),
            choice.finish_reason
        );

        choice
            .message
            .content
            .filter(|text| !text.trim().is_empty())
            .ok_or(CompletionError::EmptyOutput)
    }
}
