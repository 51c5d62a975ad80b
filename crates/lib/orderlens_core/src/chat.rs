//! Chat pipeline: question in, assistant message appended.
//!
//! Model failures never surface as errors; they become an apology message
//! in the conversation. Only a last message with no `content` field sets
//! [`ChatReply::error`].

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::{ChatModel, LlmError};
use crate::prompt;
use crate::summary::OrderSummary;

/// Greeting appended when the conversation is empty.
pub const GREETING: &str = "Hi! What would you like to know about the order data?";

/// Prefix of the assistant message appended when answering fails.
pub const APOLOGY_PREFIX: &str = "Sorry, there was a problem processing your request: ";

/// One conversation message. Fields are echoed back as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// `None` when the field is absent; `Some(Value::Null)` for `"content": null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub content: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            content: Some(serde_json::Value::String(content.into())),
            extra: serde_json::Map::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// The content when it is a string.
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().and_then(serde_json::Value::as_str)
    }
}

/// Body of a chat request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Result of the pipeline: the conversation with the assistant reply appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatReply {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reasons a question could not be answered. Reported in-band as an apology.
#[derive(Debug, Error)]
enum AnswerError {
    #[error("message content is not text")]
    NotText,

    #[error(transparent)]
    Model(#[from] LlmError),
}

/// Answers the last message of `request` using the order summary.
///
/// - No messages: appends [`GREETING`].
/// - Last message without a `content` field: returns the conversation
///   unchanged with `error` set.
/// - Non-text content or model failure: appends an apology carrying the
///   error text.
pub async fn respond(
    model: &dyn ChatModel,
    summary: &OrderSummary,
    request: ChatRequest,
) -> ChatReply {
    let mut messages = request.messages;

    if messages.is_empty() {
        messages.push(ChatMessage::assistant(GREETING));
        return ChatReply {
            messages,
            error: None,
        };
    }

    let Some(content) = messages.last().and_then(|m| m.content.clone()) else {
        return ChatReply {
            messages,
            error: Some("last message has no content".to_string()),
        };
    };

    let outcome = match content.as_str() {
        Some(question) => answer(model, summary, question).await,
        None => Err(AnswerError::NotText),
    };
    let text = outcome.unwrap_or_else(|e| {
        warn!(error = %e, "could not answer chat question");
        format!("{APOLOGY_PREFIX}{e}")
    });

    messages.push(ChatMessage::assistant(text));
    ChatReply {
        messages,
        error: None,
    }
}

async fn answer(
    model: &dyn ChatModel,
    summary: &OrderSummary,
    question: &str,
) -> Result<String, AnswerError> {
    let chart = prompt::is_chart_question(question);
    debug!(chart, question, "processing chat question");
    let prompt = prompt::build_prompt(summary, question);
    Ok(model.complete(&prompt).await?)
}
