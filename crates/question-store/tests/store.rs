use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tempfile::TempDir;

use question_store::engine::{PromptEngine, PromptError, PromptRequest};
use question_store::{Questions, StoreOptions, data};

/// Answers every prompt with the question's own name.
struct EchoEngine;

#[async_trait]
impl PromptEngine for EchoEngine {
    async fn prompt(&self, request: &PromptRequest) -> Result<Value, PromptError> {
        let mut raw = Value::Object(Map::new());
        data::set_path(&mut raw, &request.name, json!(request.name.clone()));
        Ok(raw)
    }
}

fn store(dir: &TempDir) -> Questions {
    Questions::with_options(
        StoreOptions {
            dest: Some(dir.path().to_path_buf()),
            cwd: Some(PathBuf::from("/work/project")),
            ..StoreOptions::default()
        },
        EchoEngine,
    )
}

#[tokio::test]
async fn deleting_a_group_answer_fans_out_over_members() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions.set("author.name", "Name?").set("author.url", "Url?");
    questions.ask("author").await.expect("ask");

    assert!(questions.is_answered("author.name", None).expect("answered"));
    assert!(questions.is_answered("author.url", None).expect("answered"));

    questions.delete_answer("author", None).expect("delete");
    assert!(!questions.is_answered("author.name", None).expect("answered"));
    assert!(!questions.is_answered("author.url", None).expect("answered"));
}

#[tokio::test]
async fn deleting_one_locale_leaves_the_other() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions.set("name", "Name?");
    questions.ask("name").await.expect("ask en");
    questions
        .ask_with(
            "name",
            question_store::AskOptions {
                locale: Some("fr".to_string()),
                ..question_store::AskOptions::default()
            },
        )
        .await
        .expect("ask fr");

    questions.delete_answer("name", Some("fr")).expect("delete fr");
    assert!(!questions.is_answered("name", Some("fr")).expect("answered"));
    assert!(questions.is_answered("name", None).expect("answered"));
}

#[tokio::test]
async fn erasing_a_group_removes_answer_files() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions.set("author.name", "Name?").set("author.url", "Url?");
    questions.ask("author").await.expect("ask");

    assert!(dir.path().join("author.name.json").exists());
    assert!(dir.path().join("author.url.json").exists());

    questions.erase_answers("author").expect("erase");
    assert!(!dir.path().join("author.name.json").exists());
    assert!(!dir.path().join("author.url.json").exists());
}

#[tokio::test]
async fn delete_all_answers_walks_the_queue() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions.set("a", "A?").set("b.c", "C?").set("b.d", "D?");
    questions.ask_all().await.expect("ask");

    questions.delete_all_answers(None).expect("delete all");
    assert!(!questions.is_answered("a", None).expect("answered"));
    assert!(!questions.is_answered("b.c", None).expect("answered"));
    assert!(!questions.is_answered("b.d", None).expect("answered"));
}

#[tokio::test]
async fn erase_all_answers_clears_the_files() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions.set("a", "A?").set("b", "B?");
    questions.ask_all().await.expect("ask");

    questions.erase_all_answers().expect("erase all");
    assert!(!dir.path().join("a.json").exists());
    assert!(!dir.path().join("b.json").exists());
}

#[test]
fn set_question_uses_the_definition_name() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions
        .set_question(
            question_store::QuestionDefinition::new("Your name?").named("author.name"),
        )
        .expect("set question");
    assert!(questions.has("author.name"));

    let err = questions
        .set_question(question_store::QuestionDefinition::new("Nameless?"))
        .map(|_| ())
        .expect_err("unnamed definition");
    assert!(matches!(err, question_store::Error::UnnamedQuestion));
}

#[test]
fn reregistration_replaces_the_cached_entity() {
    let dir = TempDir::new().expect("tempdir");
    let mut questions = store(&dir);
    questions.set("name", "First message?");
    questions.set("name", "Second message?");

    assert_eq!(questions.len(), 1);
    let question = questions.question("name").expect("question");
    assert_eq!(question.message(), "Second message?");
}
