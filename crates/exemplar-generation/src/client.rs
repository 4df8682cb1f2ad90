//! Blocking chat-completions client with a bounded retry loop.
//!
//! Every failed attempt (transport error, non-2xx status, unparseable body,
//! no choices) sleeps a fixed delay and tries again until the attempt
//! ceiling is reached.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use exemplar_core::config::GenerationConfig;
use exemplar_core::errors::{ExemplarResult, GenerationError};
use exemplar_core::traits::IQuestionGenerator;
use tracing::{debug, warn};

use crate::request::{is_azure, AuthHeader, ChatMessage, ChatRequest, ChatResponse, SYSTEM_PROMPT};

/// Tokens consumed across all successful calls of one client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

pub struct ChatCompletionsClient {
    endpoint: String,
    model: String,
    auth: AuthHeader,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
    max_retries: u32,
    retry_delay: Duration,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
}

impl ChatCompletionsClient {
    /// Reads the API key from `config.api_key_env`.
    pub fn from_config(config: &GenerationConfig) -> ExemplarResult<Self> {
        let key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenerationError::MissingApiKey {
                env: config.api_key_env.clone(),
            })?;
        Ok(Self::new(config, &key))
    }

    pub fn new(config: &GenerationConfig, api_key: &str) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            auth: AuthHeader::for_endpoint(&config.endpoint, api_key),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay(),
            prompt_tokens: AtomicU64::new(0),
            completion_tokens: AtomicU64::new(0),
        }
    }

    pub fn build_request(&self, prompt: &str, temperature: f64) -> ChatRequest {
        ChatRequest {
            model: (!is_azure(&self.endpoint)).then(|| self.model.clone()),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            max_tokens: self.max_tokens,
            temperature,
            top_p: self.top_p,
            n: 1,
        }
    }

    /// Complete at the configured temperature.
    pub fn complete(&self, prompt: &str) -> ExemplarResult<String> {
        self.generate(prompt, self.temperature)
    }

    pub fn usage(&self) -> TokenUsage {
        TokenUsage {
            prompt_tokens: self.prompt_tokens.load(Ordering::Relaxed),
            completion_tokens: self.completion_tokens.load(Ordering::Relaxed),
        }
    }

    fn send(&self, body: &ChatRequest) -> ExemplarResult<ChatResponse> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GenerationError::RequestFailed {
                reason: format!("runtime error: {e}"),
            })?;

        let (header, value) = self.auth.header();
        rt.block_on(async {
            let response = reqwest::Client::new()
                .post(&self.endpoint)
                .header(header, value)
                .json(body)
                .send()
                .await
                .map_err(|e| GenerationError::RequestFailed {
                    reason: format!("HTTP error: {e}"),
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(GenerationError::RequestFailed {
                    reason: format!("endpoint returned {status}: {text}"),
                }
                .into());
            }

            response.json::<ChatResponse>().await.map_err(|e| {
                GenerationError::RequestFailed {
                    reason: format!("JSON parse error: {e}"),
                }
                .into()
            })
        })
    }

    fn record_usage(&self, response: &ChatResponse) {
        if let Some(usage) = response.usage {
            self.prompt_tokens.fetch_add(usage.prompt_tokens, Ordering::Relaxed);
            self.completion_tokens
                .fetch_add(usage.completion_tokens, Ordering::Relaxed);
        }
    }
}

impl IQuestionGenerator for ChatCompletionsClient {
    fn generate(&self, prompt: &str, temperature: f64) -> ExemplarResult<String> {
        let body = self.build_request(prompt, temperature);
        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            let outcome = self.send(&body).and_then(|resp| {
                self.record_usage(&resp);
                resp.first_content()
                    .map(str::to_string)
                    .ok_or_else(|| GenerationError::EmptyResponse.into())
            });
            match outcome {
                Ok(content) => {
                    debug!(attempt, chars = content.len(), "generation succeeded");
                    return Ok(content);
                }
                Err(e) => {
                    warn!(attempt, max = self.max_retries, error = %e, "generation attempt failed");
                    last_error = e.to_string();
                }
            }
            if attempt < self.max_retries {
                std::thread::sleep(self.retry_delay);
            }
        }

        Err(GenerationError::RetriesExhausted {
            attempts: self.max_retries,
            last_error,
        }
        .into())
    }

    fn name(&self) -> &str {
        &self.model
    }
}
