use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Locale used whenever a caller does not name one.
pub const DEFAULT_LOCALE: &str = "en";

/// Store-wide configuration. Call-level [`AskOptions`] override these on a
/// per-ask basis; unset call-level fields fall back to the store values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StoreOptions {
    /// Working directory answers are scoped to. Resolved from the ambient
    /// process directory when unset.
    pub cwd: Option<PathBuf>,
    /// Directory answer files are written to. Defaults to the platform
    /// data directory.
    pub dest: Option<PathBuf>,
    pub locale: Option<String>,
    /// Re-prompt every question even when a stored answer exists.
    pub force: bool,
    pub force_all: bool,
    /// Persist answers after prompting. Defaults to true.
    pub save: Option<bool>,
    /// Let selector tokens also match dotted suffixes of queued names.
    pub suffix_match: bool,
}

impl StoreOptions {
    /// Store-level `force` is a blanket request, so it implies `force_all`.
    pub(crate) fn normalize(mut self) -> Self {
        if self.force {
            self.force_all = true;
        }
        self
    }

    /// Merges call-level options over the store options into the settings
    /// one ask session runs with.
    pub fn resolve(&self, call: &AskOptions) -> AskSettings {
        let force_all = call.force_all.unwrap_or(self.force_all);
        let mut force = call.force.unwrap_or(self.force);
        if force_all {
            force = true;
        }
        AskSettings {
            locale: call
                .locale
                .clone()
                .or_else(|| self.locale.clone())
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            force,
            save: call.save.or(self.save).unwrap_or(true),
        }
    }
}

/// Per-ask overrides. `None` fields defer to the store options.
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    pub locale: Option<String>,
    pub force: Option<bool>,
    pub force_all: Option<bool>,
    pub save: Option<bool>,
}

/// Fully-resolved settings handed to each question in a session.
#[derive(Debug, Clone)]
pub struct AskSettings {
    pub locale: String,
    pub force: bool,
    pub save: bool,
}
