//! In-process store and orchestrator for interactive question/answer
//! definitions used by command-line tools.
//!
//! Callers register named questions, organize them into dot-namespaced
//! groups, queue and reorder them, overlay pre-supplied data, and ask a
//! subset or all of them. Answers accumulate into a single JSON object
//! while per-question answer state persists keyed by locale and working
//! directory.

pub mod answers;
pub mod data;
pub mod engine;
pub mod error;
pub mod events;
pub mod group;
pub mod interrupt;
pub mod options;
mod pipeline;
pub mod question;
pub mod store;

pub use answers::{AnswerFile, AnswerRecord};
pub use engine::{PromptEngine, PromptError, PromptRequest};
pub use error::Error;
pub use events::{Listeners, StoreEvent};
pub use group::GroupIndex;
pub use options::{AskOptions, AskSettings, DEFAULT_LOCALE, StoreOptions};
pub use question::{Question, QuestionDefinition, QuestionKind, QuestionOptions};
pub use store::{AskTarget, AskToken, Entry, Questions};
