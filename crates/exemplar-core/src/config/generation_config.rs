use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Chat-completions client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
    /// Attempt ceiling for one request.
    pub max_retries: u32,
    /// Fixed sleep between attempts.
    pub retry_delay_ms: u64,
}

impl GenerationConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_GENERATION_ENDPOINT.to_string(),
            model: defaults::DEFAULT_GENERATION_MODEL.to_string(),
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
            temperature: defaults::DEFAULT_TEMPERATURE,
            top_p: defaults::DEFAULT_TOP_P,
            max_tokens: defaults::DEFAULT_MAX_TOKENS,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            retry_delay_ms: defaults::DEFAULT_RETRY_DELAY_MS,
        }
    }
}
