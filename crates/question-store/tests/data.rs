use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tempfile::TempDir;

use question_store::engine::{PromptEngine, PromptError, PromptRequest};
use question_store::{Questions, StoreEvent, StoreOptions};

struct NullEngine;

#[async_trait]
impl PromptEngine for NullEngine {
    async fn prompt(&self, _request: &PromptRequest) -> Result<Value, PromptError> {
        Err(PromptError::Engine("no prompts in this test".to_string()))
    }
}

fn store(dir: &TempDir) -> Questions {
    Questions::with_options(
        StoreOptions {
            dest: Some(dir.path().to_path_buf()),
            cwd: Some(PathBuf::from("/work/project")),
            ..StoreOptions::default()
        },
        NullEngine,
    )
}

#[test]
fn set_and_get_round_trip() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions.set_data("author.name", "Brian");
    assert_eq!(questions.get_data("author.name"), Some(&json!("Brian")));
    assert_eq!(questions.get_data("author.url"), None);
}

#[test]
fn has_data_sees_intermediate_segments() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions.set_data("author.name", "Brian");
    assert!(questions.has_data("author.name"));
    assert!(questions.has_data("author"));
    assert!(!questions.has_data("author.url"));
    assert!(!questions.has_data("project"));
}

#[test]
fn object_assignment_applies_each_property() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    let mut object = Map::new();
    object.insert("author.name".to_string(), json!("Brian"));
    object.insert("license".to_string(), json!("MIT"));
    questions.set_data_object(object);

    assert_eq!(questions.get_data("author.name"), Some(&json!("Brian")));
    assert_eq!(questions.get_data("license"), Some(&json!("MIT")));
}

#[test]
fn data_events_fire_per_assignment() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    let keys = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&keys);
    questions.on(move |event| {
        if let StoreEvent::Data { key, .. } = event {
            sink.lock().expect("keys lock").push(key.clone());
        }
    });

    questions.set_data("a.b", 1).set_data("c", 2);
    assert_eq!(*keys.lock().expect("keys lock"), vec!["a.b", "c"]);
}

#[test]
fn overlay_never_touches_queue_or_cache() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions.set("author.name", "Name?");
    questions.set_data("author.url", "https://x");

    assert_eq!(questions.queue(), ["author.name"]);
    assert!(!questions.has("author.url"));
}
