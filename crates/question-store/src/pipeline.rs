use serde_json::{Map, Value};
use tracing::debug;

use crate::data;
use crate::engine::PromptEngine;
use crate::error::Error;
use crate::events::{Listeners, StoreEvent};
use crate::interrupt;
use crate::options::AskSettings;
use crate::question::Question;

/// Asks the resolved questions one at a time as an async sequential
/// fold. Each step emits `Ask`, awaits the question, emits `Answer`,
/// deep-sets the value at the question's dotted name, then yields back
/// to the scheduler so listeners observe events between prompts. The
/// first failure aborts the session; partial answers are not returned.
pub(crate) async fn run(
    questions: Vec<Question>,
    settings: &AskSettings,
    engine: &dyn PromptEngine,
    listeners: &Listeners,
) -> Result<Value, Error> {
    let _guard = interrupt::engage();
    let mut answers = Value::Object(Map::new());
    for mut question in questions {
        let name = question.name().to_string();
        listeners.emit(&StoreEvent::Ask {
            name: name.clone(),
            question: question.clone(),
            answers: answers.clone(),
        });
        debug!(name = %name, "asking question");

        let raw = question.ask(settings, engine).await?;
        let value = data::answer_value(&raw, &name).unwrap_or(Value::Null);

        listeners.emit(&StoreEvent::Answer {
            name: name.clone(),
            value: value.clone(),
            question: question.clone(),
        });
        data::set_path(&mut answers, &name, value);
        tokio::task::yield_now().await;
    }
    Ok(answers)
}
