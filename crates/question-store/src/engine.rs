use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::question::QuestionKind;

/// A single prompt handed to the engine. The engine resolves it to a raw
/// answer object carrying the value under the question's own name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PromptRequest {
    pub name: String,
    pub kind: QuestionKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Suggested value shown to the user, honored on empty input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Failures an engine can surface. A failing prompt aborts the remainder
/// of the ask session it belongs to.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt input closed")]
    InputClosed,
    #[error("prompt cancelled")]
    Cancelled,
    #[error("prompt io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("prompt engine error: {0}")]
    Engine(String),
}

/// Interactive prompt backend. `question-term` supplies the terminal
/// implementation; tests script their own.
#[async_trait]
pub trait PromptEngine: Send + Sync {
    async fn prompt(&self, request: &PromptRequest) -> Result<Value, PromptError>;
}

#[async_trait]
impl<T: PromptEngine + ?Sized> PromptEngine for std::sync::Arc<T> {
    async fn prompt(&self, request: &PromptRequest) -> Result<Value, PromptError> {
        (**self).prompt(request).await
    }
}
