use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::question::Question;

/// Lifecycle notifications published by the store and the ask pipeline.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A question was registered or replaced.
    Set { name: String, question: Question },
    /// An overlay value was assigned.
    Data { key: String, value: Value },
    /// A question is about to be asked; `answers` holds what the session
    /// has accumulated so far.
    Ask {
        name: String,
        question: Question,
        answers: Value,
    },
    /// A question resolved to `value`.
    Answer {
        name: String,
        value: Value,
        question: Question,
    },
}

type Listener = dyn Fn(&StoreEvent) + Send + Sync;

/// Listener registry with synchronous dispatch at the emission point.
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Vec<Arc<Listener>>,
}

impl Listeners {
    pub fn subscribe(&mut self, listener: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.inner.push(Arc::new(listener));
    }

    pub fn emit(&self, event: &StoreEvent) {
        for listener in &self.inner {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.inner.len())
            .finish()
    }
}
