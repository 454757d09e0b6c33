use thiserror::Error;

use crate::engine::PromptError;

/// Errors surfaced by the store and the ask pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown question '{0}'")]
    UnknownQuestion(String),
    #[error("question definition has no name")]
    UnnamedQuestion,
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("answer storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("answer serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
