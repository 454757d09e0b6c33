use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::answers::AnswerFile;
use crate::data;
use crate::engine::{PromptEngine, PromptRequest};
use crate::error::Error;
use crate::options::{AskSettings, StoreOptions};

/// Prompt style a question is rendered with.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    #[default]
    Input,
    Confirm,
    Select,
    MultiSelect,
    Password,
}

/// Everything a caller can say about a question up front. A bare message
/// string converts into a definition, so `set("name", "Your name?")`
/// and a full builder both work.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct QuestionDefinition {
    /// Only consulted by `set_question`; `set` takes the name explicitly.
    pub name: Option<String>,
    pub kind: QuestionKind,
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Suggested value forwarded to the prompt engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<bool>,
}

impl QuestionDefinition {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn kind(mut self, kind: QuestionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = Some(force);
        self
    }

    pub fn save(mut self, save: bool) -> Self {
        self.save = Some(save);
        self
    }
}

impl From<&str> for QuestionDefinition {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for QuestionDefinition {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Behavior flags resolved at registration from store and definition
/// options; call-level options can still tighten them per ask.
#[derive(Debug, Clone)]
pub struct QuestionOptions {
    pub force: bool,
    pub save: bool,
    /// Answers to this question also become the stored per-locale
    /// default, and an existing default short-circuits the prompt.
    pub is_default: bool,
}

/// One named, ask-able prompt with its own locale/cwd-scoped answer
/// storage.
#[derive(Debug, Clone)]
pub struct Question {
    name: String,
    kind: QuestionKind,
    message: String,
    choices: Vec<String>,
    default_value: Option<Value>,
    options: QuestionOptions,
    answers: AnswerFile,
}

impl Question {
    pub(crate) fn new(
        name: String,
        definition: QuestionDefinition,
        store: &StoreOptions,
        cwd: &Path,
        dest: &Path,
    ) -> Self {
        let options = QuestionOptions {
            force: definition.force.unwrap_or(store.force),
            save: definition.save.or(store.save).unwrap_or(true),
            is_default: false,
        };
        let answers = AnswerFile::new(&name, dest, cwd);
        let message = definition.message.unwrap_or_else(|| name.clone());
        Self {
            name,
            kind: definition.kind,
            message,
            choices: definition.choices,
            default_value: definition.default,
            options,
            answers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn options(&self) -> &QuestionOptions {
        &self.options
    }

    pub fn answers(&self) -> &AnswerFile {
        &self.answers
    }

    pub(crate) fn mark_default(&mut self) {
        self.options.is_default = true;
    }

    /// Seeds an in-memory answer, as if the question had already been
    /// answered for `locale`.
    pub fn set_answer(&mut self, value: Value, locale: Option<&str>) {
        self.answers.set(value, locale);
    }

    pub fn answer(&self, locale: Option<&str>) -> Result<Option<Value>, Error> {
        self.answers.answer(locale)
    }

    pub fn is_answered(&self, locale: Option<&str>) -> Result<bool, Error> {
        self.answers.is_answered(locale)
    }

    pub fn delete_answer(&mut self, locale: Option<&str>) -> Result<(), Error> {
        self.answers.delete_locale(locale)
    }

    pub fn erase_answers(&mut self) -> Result<(), Error> {
        self.answers.erase()
    }

    /// Resolves this question to a raw answer object keyed by its own
    /// name. Unless forced, an existing answer for (locale, cwd) wins
    /// without prompting, then a stored default for default-marked
    /// questions; only then does the engine run. Fresh answers are
    /// persisted unless saving is disabled.
    pub async fn ask(
        &mut self,
        settings: &AskSettings,
        engine: &dyn PromptEngine,
    ) -> Result<Value, Error> {
        let force = settings.force || self.options.force;
        if !force {
            if let Some(answer) = self.answers.answer(Some(&settings.locale))? {
                debug!(name = %self.name, "reusing stored answer");
                return Ok(self.wrap(answer));
            }
            if self.options.is_default
                && let Some(default) = self.answers.default_answer(Some(&settings.locale))?
            {
                debug!(name = %self.name, "reusing stored default");
                return Ok(self.wrap(default));
            }
        }

        let mut suggestion = self.default_value.clone();
        if suggestion.is_none() && self.options.is_default {
            suggestion = self.answers.default_answer(Some(&settings.locale))?;
        }
        let request = PromptRequest {
            name: self.name.clone(),
            kind: self.kind,
            message: self.message.clone(),
            choices: self.choices.clone(),
            default: suggestion,
        };
        let raw = engine.prompt(&request).await?;

        let value = data::answer_value(&raw, &self.name).unwrap_or(Value::Null);
        if settings.save && self.options.save {
            self.answers.store(value.clone(), Some(&settings.locale))?;
            if self.options.is_default {
                self.answers.set_default(value, Some(&settings.locale))?;
            }
        }
        Ok(raw)
    }

    fn wrap(&self, value: Value) -> Value {
        let mut raw = Value::Object(Map::new());
        data::set_path(&mut raw, &self.name, value);
        raw
    }
}

impl AsRef<str> for Question {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
