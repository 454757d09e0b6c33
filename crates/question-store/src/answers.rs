use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::options::DEFAULT_LOCALE;

/// On-disk shape of one question's persisted answers: values keyed by
/// locale then working directory, plus a locale-wide default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerRecord {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locales: BTreeMap<String, BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, Value>,
}

/// Durable answer storage for a single question, one JSON document per
/// question name. In-memory seeds overlay the file until an answer is
/// stored, so pre-supplied data wins without touching disk.
#[derive(Debug, Clone)]
pub struct AnswerFile {
    name: String,
    path: PathBuf,
    cwd: String,
    seeds: BTreeMap<String, Value>,
}

impl AnswerFile {
    pub fn new(name: &str, dest: &Path, cwd: &Path) -> Self {
        Self {
            name: name.to_string(),
            path: dest.join(format!("{name}.json")),
            cwd: cwd.to_string_lossy().into_owned(),
            seeds: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seeds an in-memory answer for `locale` without touching the file.
    pub fn set(&mut self, value: Value, locale: Option<&str>) {
        self.seeds.insert(resolve(locale).to_string(), value);
    }

    /// The answer for (locale, cwd), preferring an in-memory seed.
    pub fn answer(&self, locale: Option<&str>) -> Result<Option<Value>, Error> {
        let locale = resolve(locale);
        if let Some(seed) = self.seeds.get(locale) {
            return Ok(Some(seed.clone()));
        }
        let record = self.read()?;
        Ok(record
            .locales
            .get(locale)
            .and_then(|answers| answers.get(&self.cwd))
            .cloned())
    }

    pub fn is_answered(&self, locale: Option<&str>) -> Result<bool, Error> {
        Ok(self.answer(locale)?.is_some())
    }

    /// Persists `value` as the answer for (locale, cwd).
    pub fn store(&mut self, value: Value, locale: Option<&str>) -> Result<(), Error> {
        let locale = resolve(locale);
        let mut record = self.read()?;
        record
            .locales
            .entry(locale.to_string())
            .or_default()
            .insert(self.cwd.clone(), value);
        debug!(name = %self.name, locale, "storing answer");
        self.write(&record)
    }

    /// The locale-wide default answer, independent of cwd.
    pub fn default_answer(&self, locale: Option<&str>) -> Result<Option<Value>, Error> {
        let record = self.read()?;
        Ok(record.defaults.get(resolve(locale)).cloned())
    }

    /// Persists `value` as the locale-wide default answer.
    pub fn set_default(&mut self, value: Value, locale: Option<&str>) -> Result<(), Error> {
        let mut record = self.read()?;
        record.defaults.insert(resolve(locale).to_string(), value);
        self.write(&record)
    }

    /// Drops the answer stored for (locale, cwd), seed included. Missing
    /// entries are a no-op.
    pub fn delete_locale(&mut self, locale: Option<&str>) -> Result<(), Error> {
        let locale = resolve(locale);
        self.seeds.remove(locale);
        if !self.path.exists() {
            return Ok(());
        }
        let mut record = self.read()?;
        if let Some(answers) = record.locales.get_mut(locale) {
            answers.remove(&self.cwd);
            if answers.is_empty() {
                record.locales.remove(locale);
            }
        }
        self.write(&record)
    }

    /// Removes the whole answer file for this question.
    pub fn erase(&mut self) -> Result<(), Error> {
        self.seeds.clear();
        if self.path.exists() {
            debug!(name = %self.name, path = %self.path.display(), "erasing answers");
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn read(&self) -> Result<AnswerRecord, Error> {
        if !self.path.exists() {
            return Ok(AnswerRecord::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, record: &AnswerRecord) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut raw = serde_json::to_string_pretty(record)?;
        raw.push('\n');
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

fn resolve(locale: Option<&str>) -> &str {
    locale.unwrap_or(DEFAULT_LOCALE)
}
