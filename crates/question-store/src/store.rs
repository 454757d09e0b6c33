use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use tracing::debug;

use crate::data;
use crate::engine::PromptEngine;
use crate::error::Error;
use crate::events::{Listeners, StoreEvent};
use crate::group::GroupIndex;
use crate::options::{AskOptions, StoreOptions};
use crate::pipeline;
use crate::question::{Question, QuestionDefinition};

/// A cache lookup: either a concrete question or a group's member names.
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Question(&'a Question),
    Group(&'a [String]),
}

/// One element of an ask selector: a name (or group name) to match
/// against the queue, or a question that is already resolved.
#[derive(Debug, Clone)]
pub enum AskToken {
    Name(String),
    Resolved(Box<Question>),
}

/// Normalized ask selector: everything currently cached, or a list of
/// tokens.
#[derive(Debug, Clone)]
pub enum AskTarget {
    All,
    Tokens(Vec<AskToken>),
}

impl From<&str> for AskTarget {
    fn from(name: &str) -> Self {
        AskTarget::Tokens(vec![AskToken::Name(name.to_string())])
    }
}

impl From<String> for AskTarget {
    fn from(name: String) -> Self {
        AskTarget::Tokens(vec![AskToken::Name(name)])
    }
}

impl From<&[&str]> for AskTarget {
    fn from(names: &[&str]) -> Self {
        AskTarget::Tokens(
            names
                .iter()
                .map(|name| AskToken::Name((*name).to_string()))
                .collect(),
        )
    }
}

impl<const N: usize> From<[&str; N]> for AskTarget {
    fn from(names: [&str; N]) -> Self {
        names.as_slice().into()
    }
}

impl From<Vec<String>> for AskTarget {
    fn from(names: Vec<String>) -> Self {
        AskTarget::Tokens(names.into_iter().map(AskToken::Name).collect())
    }
}

impl From<Question> for AskTarget {
    fn from(question: Question) -> Self {
        AskTarget::Tokens(vec![AskToken::Resolved(Box::new(question))])
    }
}

impl From<Vec<Question>> for AskTarget {
    fn from(questions: Vec<Question>) -> Self {
        AskTarget::Tokens(
            questions
                .into_iter()
                .map(|question| AskToken::Resolved(Box::new(question)))
                .collect(),
        )
    }
}

/// In-process store and orchestrator for interactive questions.
///
/// Questions are registered by dotted name, grouped by their prefix,
/// queued for asking, optionally overlaid with pre-supplied data, and
/// asked sequentially through a [`PromptEngine`], with answers persisted
/// per locale and working directory.
pub struct Questions {
    options: StoreOptions,
    engine: Box<dyn PromptEngine>,
    cache: BTreeMap<String, Question>,
    groups: GroupIndex,
    queue: Vec<String>,
    enqueued: bool,
    data: Value,
    listeners: Listeners,
    resolved_cwd: OnceCell<PathBuf>,
}

impl Questions {
    pub fn new(engine: impl PromptEngine + 'static) -> Self {
        Self::with_options(StoreOptions::default(), engine)
    }

    pub fn with_options(options: StoreOptions, engine: impl PromptEngine + 'static) -> Self {
        Self {
            options: options.normalize(),
            engine: Box::new(engine),
            cache: BTreeMap::new(),
            groups: GroupIndex::default(),
            queue: Vec::new(),
            enqueued: false,
            data: Value::Object(Map::new()),
            listeners: Listeners::default(),
            resolved_cwd: OnceCell::new(),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Subscribes a listener to store lifecycle events.
    pub fn on(&mut self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) -> &mut Self {
        self.listeners.subscribe(listener);
        self
    }

    /// The working directory answers are scoped to, resolved once and
    /// memoized for the life of the store.
    pub fn cwd(&self) -> &Path {
        self.resolved_cwd.get_or_init(|| {
            self.options
                .cwd
                .clone()
                .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
        })
    }

    /// Replaces the memoized working directory. Questions registered
    /// afterwards scope their answers to the new directory.
    pub fn set_cwd(&mut self, cwd: impl Into<PathBuf>) {
        self.resolved_cwd = OnceCell::with_value(cwd.into());
    }

    fn answers_dir(&self) -> PathBuf {
        if let Some(dest) = &self.options.dest {
            return dest.clone();
        }
        ProjectDirs::from("", "", "question-store")
            .map(|dirs| dirs.data_dir().join("answers"))
            .unwrap_or_else(|| PathBuf::from(".question-store"))
    }

    /// Registers a question under `name`, replacing any prior entity of
    /// the same name.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        definition: impl Into<QuestionDefinition>,
    ) -> &mut Self {
        self.add_question(name.into(), definition.into(), false);
        self
    }

    /// Registers a definition that carries its own name.
    pub fn set_question(&mut self, definition: QuestionDefinition) -> Result<&mut Self, Error> {
        let Some(name) = definition.name.clone() else {
            return Err(Error::UnnamedQuestion);
        };
        self.add_question(name, definition, false);
        Ok(self)
    }

    /// Registers a question whose answer becomes the stored per-locale
    /// default; an existing default is reused instead of re-prompting.
    pub fn set_default(
        &mut self,
        name: impl Into<String>,
        definition: impl Into<QuestionDefinition>,
    ) -> &mut Self {
        self.add_question(name.into(), definition.into(), true);
        self
    }

    fn add_question(&mut self, name: String, definition: QuestionDefinition, is_default: bool) {
        let cwd = self.cwd().to_path_buf();
        let dest = self.answers_dir();
        let mut question = Question::new(name.clone(), definition, &self.options, &cwd, &dest);
        if is_default {
            question.mark_default();
        }
        debug!(name = %name, "registering question");
        self.listeners.emit(&StoreEvent::Set {
            name: name.clone(),
            question: question.clone(),
        });
        self.cache.insert(name.clone(), question);
        if !self.queue.contains(&name) {
            self.queue.push(name.clone());
        }
        self.groups.add(&name);
    }

    /// Looks up a name as either a cached question or a group.
    pub fn get(&self, name: &str) -> Option<Entry<'_>> {
        if let Some(question) = self.cache.get(name) {
            return Some(Entry::Question(question));
        }
        self.groups.get(name).map(Entry::Group)
    }

    /// The cached question for `name`; asking for an absent name is a
    /// fatal error, unlike queue resolution which skips it.
    pub fn question(&self, name: &str) -> Result<&Question, Error> {
        self.cache
            .get(name)
            .ok_or_else(|| Error::UnknownQuestion(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Member names for the group addressed by `key`; a full member name
    /// and a bare group name resolve the same group.
    pub fn get_group(&self, key: &str) -> Option<&[String]> {
        self.groups.members_for(key)
    }

    pub fn groups(&self) -> &GroupIndex {
        &self.groups
    }

    pub fn is_answered(&self, name: &str, locale: Option<&str>) -> Result<bool, Error> {
        self.question(name)?.is_answered(locale)
    }

    /// Assigns an overlay value at dotted `key`, consulted when ask
    /// lists are built. Never touches the queue or cache.
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        data::set_path(&mut self.data, &key, value.clone());
        self.listeners.emit(&StoreEvent::Data { key, value });
        self
    }

    /// Applies each top-level property of `object` as a batch of
    /// overlay assignments.
    pub fn set_data_object(&mut self, object: Map<String, Value>) -> &mut Self {
        for (key, value) in object {
            self.set_data(key, value);
        }
        self
    }

    pub fn get_data(&self, key: &str) -> Option<&Value> {
        data::get_path(&self.data, key)
    }

    pub fn has_data(&self, key: &str) -> bool {
        data::has_path(&self.data, key)
    }

    /// Current ask order. The pipeline follows this, not registration
    /// order.
    pub fn queue(&self) -> &[String] {
        &self.queue
    }

    /// Adds names to the queue, expanding group names to their members.
    /// The first explicit call discards the registration-time queue;
    /// names already queued keep their original slot.
    pub fn enqueue(&mut self, names: &[&str]) -> &mut Self {
        let mut expanded: Vec<String> = Vec::new();
        for name in names {
            if let Some(members) = self.groups.get(name) {
                expanded.extend(members.iter().cloned());
            } else {
                expanded.push((*name).to_string());
            }
        }
        if !self.enqueued {
            self.enqueued = true;
            self.queue.clear();
        }
        for name in expanded {
            if !self.queue.contains(&name) {
                debug!(name = %name, "enqueueing question");
                self.queue.push(name);
            }
        }
        self
    }

    /// Removes names from the queue; absent names are a no-op.
    pub fn dequeue(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            if let Some(index) = self.queue.iter().position(|queued| queued == name) {
                self.queue.remove(index);
            }
        }
        self
    }

    /// Queue position of a name or of a question entity.
    pub fn index_of(&self, name: impl AsRef<str>) -> Option<usize> {
        let name = name.as_ref();
        self.queue.iter().position(|queued| queued == name)
    }

    /// Deletes questions by name. A cached name is removed from cache,
    /// group membership, and queue; a group name recurses over its
    /// members. Unknown names are ignored.
    pub fn delete(&mut self, names: &[&str]) -> &mut Self {
        for name in names {
            self.delete_one(name);
        }
        self
    }

    pub fn delete_one(&mut self, name: &str) -> &mut Self {
        if self.cache.remove(name).is_some() {
            debug!(name = %name, "deleting question");
            self.groups.remove(name);
            self.dequeue(&[name]);
        } else if let Some(members) = self.groups.get(name).map(<[String]>::to_vec) {
            for member in members {
                self.delete_one(&member);
            }
        }
        self
    }

    /// Deletes the stored answer for `name` (a question or a group, the
    /// latter fanning out over members) for the given locale.
    pub fn delete_answer(&mut self, name: &str, locale: Option<&str>) -> Result<(), Error> {
        if let Some(question) = self.cache.get_mut(name) {
            return question.delete_answer(locale);
        }
        let Some(members) = self.groups.get(name).map(<[String]>::to_vec) else {
            return Err(Error::UnknownQuestion(name.to_string()));
        };
        for member in members {
            if let Some(question) = self.cache.get_mut(&member) {
                question.delete_answer(locale)?;
            }
        }
        Ok(())
    }

    /// Erases every persisted answer for `name` (question or group) from
    /// the file system.
    pub fn erase_answers(&mut self, name: &str) -> Result<(), Error> {
        if let Some(question) = self.cache.get_mut(name) {
            return question.erase_answers();
        }
        let Some(members) = self.groups.get(name).map(<[String]>::to_vec) else {
            return Err(Error::UnknownQuestion(name.to_string()));
        };
        for member in members {
            if let Some(question) = self.cache.get_mut(&member) {
                question.erase_answers()?;
            }
        }
        Ok(())
    }

    /// Deletes answers for every queued name, tail first so the queue
    /// may be mutated underneath. Stale queue entries are skipped.
    pub fn delete_all_answers(&mut self, locale: Option<&str>) -> Result<(), Error> {
        let mut index = self.queue.len();
        while index > 0 {
            index -= 1;
            if index >= self.queue.len() {
                continue;
            }
            let name = self.queue[index].clone();
            if self.cache.contains_key(&name) || self.groups.contains(&name) {
                self.delete_answer(&name, locale)?;
            }
        }
        Ok(())
    }

    /// Erases answers for every queued name, tail first.
    pub fn erase_all_answers(&mut self) -> Result<(), Error> {
        let mut index = self.queue.len();
        while index > 0 {
            index -= 1;
            if index >= self.queue.len() {
                continue;
            }
            let name = self.queue[index].clone();
            if self.cache.contains_key(&name) || self.groups.contains(&name) {
                self.erase_answers(&name)?;
            }
        }
        Ok(())
    }

    /// Resolves a selector into the ordered, duplicate-free list of
    /// questions to ask. Already-resolved questions are included
    /// directly; name tokens are matched against the queue in queue
    /// order, so callers who reorder the queue get queue-driven
    /// sequencing regardless of token order. Matched questions receive
    /// any overlay data as a pre-seeded answer. Queued names missing
    /// from the cache are skipped silently.
    pub fn build_ask_list(&mut self, target: AskTarget, locale: Option<&str>) -> Vec<Question> {
        let tokens = match target {
            AskTarget::All => self
                .cache
                .keys()
                .cloned()
                .map(AskToken::Name)
                .collect::<Vec<_>>(),
            AskTarget::Tokens(tokens) => tokens,
        };

        let mut names: Vec<String> = Vec::new();
        let mut list: Vec<Question> = Vec::new();
        for token in &tokens {
            if let AskToken::Resolved(question) = token
                && !names.iter().any(|name| name == question.name())
            {
                names.push(question.name().to_string());
                list.push((**question).clone());
            }
        }

        let suffix_match = self.options.suffix_match;
        let queue = self.queue.clone();
        for name in &queue {
            let matched = tokens.iter().any(|token| match token {
                AskToken::Name(token) => matches_token(token, name, suffix_match),
                AskToken::Resolved(_) => false,
            });
            if !matched {
                continue;
            }
            let Some(question) = self.cache.get_mut(name) else {
                continue;
            };
            if let Some(value) = data::get_path(&self.data, name).cloned() {
                question.set_answer(value, locale);
            }
            if !names.iter().any(|seen| seen == name) {
                names.push(name.clone());
                list.push(question.clone());
            }
        }
        list
    }

    /// Asks the selected questions strictly sequentially, returning the
    /// accumulated answers object. The first prompt failure aborts the
    /// session and surfaces as-is.
    pub async fn ask(&mut self, target: impl Into<AskTarget>) -> Result<Value, Error> {
        self.ask_with(target, AskOptions::default()).await
    }

    pub async fn ask_with(
        &mut self,
        target: impl Into<AskTarget>,
        options: AskOptions,
    ) -> Result<Value, Error> {
        let settings = self.options.resolve(&options);
        let list = self.build_ask_list(target.into(), Some(&settings.locale));
        debug!(count = list.len(), locale = %settings.locale, "ask session");
        pipeline::run(list, &settings, self.engine.as_ref(), &self.listeners).await
    }

    /// Asks everything currently cached.
    pub async fn ask_all(&mut self) -> Result<Value, Error> {
        self.ask_with(AskTarget::All, AskOptions::default()).await
    }

    pub async fn ask_all_with(&mut self, options: AskOptions) -> Result<Value, Error> {
        self.ask_with(AskTarget::All, options).await
    }
}

/// Exact name match first, then group-prefix match; dotted-suffix match
/// only when opted in.
fn matches_token(token: &str, name: &str, suffix_match: bool) -> bool {
    if token == name {
        return true;
    }
    if name
        .strip_prefix(token)
        .is_some_and(|rest| rest.starts_with('.'))
    {
        return true;
    }
    suffix_match
        && name
            .strip_suffix(token)
            .is_some_and(|rest| rest.ends_with('.'))
}
