use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use question_store::AnswerFile;

fn file(dir: &TempDir, cwd: &str) -> AnswerFile {
    AnswerFile::new("author.name", dir.path(), Path::new(cwd))
}

#[test]
fn stored_answers_survive_a_fresh_handle() {
    let dir = TempDir::new().expect("tempdir");
    let mut answers = file(&dir, "/work/project");
    answers.store(json!("Jon"), None).expect("store");

    let fresh = file(&dir, "/work/project");
    assert_eq!(fresh.answer(None).expect("answer"), Some(json!("Jon")));
    assert!(fresh.is_answered(None).expect("answered"));
}

#[test]
fn answers_are_scoped_by_locale_and_cwd() {
    let dir = TempDir::new().expect("tempdir");
    let mut answers = file(&dir, "/work/project");
    answers.store(json!("Jon"), None).expect("store en");
    answers.store(json!("Jean"), Some("fr")).expect("store fr");

    assert_eq!(answers.answer(None).expect("answer"), Some(json!("Jon")));
    assert_eq!(
        answers.answer(Some("fr")).expect("answer"),
        Some(json!("Jean"))
    );

    let elsewhere = file(&dir, "/work/other");
    assert_eq!(elsewhere.answer(None).expect("answer"), None);
}

#[test]
fn delete_locale_removes_only_that_locale() {
    let dir = TempDir::new().expect("tempdir");
    let mut answers = file(&dir, "/work/project");
    answers.store(json!("Jon"), None).expect("store en");
    answers.store(json!("Jean"), Some("fr")).expect("store fr");

    answers.delete_locale(Some("fr")).expect("delete fr");
    assert_eq!(answers.answer(Some("fr")).expect("answer"), None);
    assert_eq!(answers.answer(None).expect("answer"), Some(json!("Jon")));

    // deleting an absent locale is a no-op
    answers.delete_locale(Some("de")).expect("delete de");
}

#[test]
fn erase_removes_the_file() {
    let dir = TempDir::new().expect("tempdir");
    let mut answers = file(&dir, "/work/project");
    answers.store(json!("Jon"), None).expect("store");
    assert!(answers.path().exists());

    answers.erase().expect("erase");
    assert!(!answers.path().exists());
    assert_eq!(answers.answer(None).expect("answer"), None);

    // erasing again is a no-op
    answers.erase().expect("erase again");
}

#[test]
fn seeds_overlay_the_file_until_stored() {
    let dir = TempDir::new().expect("tempdir");
    let mut answers = file(&dir, "/work/project");
    answers.store(json!("Jon"), None).expect("store");

    answers.set(json!("Brian"), None);
    assert_eq!(answers.answer(None).expect("answer"), Some(json!("Brian")));

    // the seed never reached the file
    let fresh = file(&dir, "/work/project");
    assert_eq!(fresh.answer(None).expect("answer"), Some(json!("Jon")));
}

#[test]
fn defaults_round_trip_independent_of_cwd() {
    let dir = TempDir::new().expect("tempdir");
    let mut answers = file(&dir, "/work/project");
    answers.set_default(json!("Jon"), None).expect("set default");

    let elsewhere = file(&dir, "/work/other");
    assert_eq!(
        elsewhere.default_answer(None).expect("default"),
        Some(json!("Jon"))
    );
    assert_eq!(elsewhere.answer(None).expect("answer"), None);
}
