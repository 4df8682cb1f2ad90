//! Chat-completions wire types.

use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str = "You are an SQL expert, skilled in handling various SQL-related issues.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body. Azure deployments name the model in the URL, so `model`
/// is omitted for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub n: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

impl ChatResponse {
    /// Content of the first choice.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// How the API key is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthHeader {
    /// `api-key: <key>` (Azure OpenAI).
    ApiKey(String),
    /// `Authorization: Bearer <key>`.
    Bearer(String),
}

impl AuthHeader {
    pub fn for_endpoint(endpoint: &str, key: &str) -> Self {
        if is_azure(endpoint) {
            Self::ApiKey(key.to_string())
        } else {
            Self::Bearer(key.to_string())
        }
    }

    pub fn header(&self) -> (&'static str, String) {
        match self {
            Self::ApiKey(key) => ("api-key", key.clone()),
            Self::Bearer(key) if key.starts_with("Bearer") => ("Authorization", key.clone()),
            Self::Bearer(key) => ("Authorization", format!("Bearer {key}")),
        }
    }
}

pub fn is_azure(endpoint: &str) -> bool {
    endpoint.contains("azure.com")
}
