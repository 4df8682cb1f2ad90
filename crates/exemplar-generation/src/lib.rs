//! # exemplar-generation
//!
//! A blocking chat-completions client implementing
//! [`IQuestionGenerator`](exemplar_core::traits::IQuestionGenerator).

pub mod client;
pub mod request;

pub use client::{ChatCompletionsClient, TokenUsage};
pub use request::{AuthHeader, ChatMessage, ChatRequest, ChatResponse, SYSTEM_PROMPT};
