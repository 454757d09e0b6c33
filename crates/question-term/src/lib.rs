//! Line-oriented terminal implementation of the `question-store` prompt
//! engine: renders a question to the writer, reads one line from the
//! reader, and maps it to an answer by question kind. Invalid confirm
//! and select input is re-prompted until a line parses or input closes.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;
use tracing::debug;

use question_store::data;
use question_store::engine::{PromptEngine, PromptError, PromptRequest};
use question_store::question::QuestionKind;

/// Prompt engine over a buffered reader/writer pair. Production code
/// uses [`TermEngine::new`] for stdin/stdout; tests drive it with
/// in-memory buffers via [`TermEngine::from_parts`].
pub struct TermEngine<R, W> {
    io: Mutex<Io<R, W>>,
}

struct Io<R, W> {
    reader: R,
    writer: W,
}

impl TermEngine<BufReader<Stdin>, Stdout> {
    pub fn new() -> Self {
        Self::from_parts(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl Default for TermEngine<BufReader<Stdin>, Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W> TermEngine<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn from_parts(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new(Io { reader, writer }),
        }
    }
}

#[async_trait]
impl<R, W> PromptEngine for TermEngine<R, W>
where
    R: AsyncBufRead + Unpin + Send + Sync,
    W: AsyncWrite + Unpin + Send + Sync,
{
    async fn prompt(&self, request: &PromptRequest) -> Result<Value, PromptError> {
        let mut io = self.io.lock().await;
        let io = &mut *io;
        debug!(name = %request.name, kind = ?request.kind, "prompting");

        write_all(&mut io.writer, &render_prompt(request)).await?;
        let value = loop {
            let line = read_line(&mut io.reader).await?;
            match interpret(line.trim(), request) {
                Ok(value) => break value,
                Err(retry) => {
                    write_all(&mut io.writer, &format!("{retry}\n> ")).await?;
                }
            }
        };

        let mut raw = Value::Object(Map::new());
        data::set_path(&mut raw, &request.name, value);
        Ok(raw)
    }
}

async fn write_all<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> Result<(), PromptError> {
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<String, PromptError> {
    let mut line = String::new();
    let read = reader.read_line(&mut line).await?;
    if read == 0 {
        return Err(PromptError::InputClosed);
    }
    Ok(line)
}

fn render_prompt(request: &PromptRequest) -> String {
    let mut prompt = format!("? {}", request.message);
    if let Some(hint) = default_hint(request.default.as_ref()) {
        prompt.push_str(&format!(" ({hint})"));
    }
    if matches!(
        request.kind,
        QuestionKind::Select | QuestionKind::MultiSelect
    ) {
        prompt.push('\n');
        for (index, choice) in request.choices.iter().enumerate() {
            prompt.push_str(&format!("  {}) {}\n", index + 1, choice));
        }
        prompt.push_str("> ");
    } else {
        prompt.push(' ');
    }
    prompt
}

fn default_hint(default: Option<&Value>) -> Option<String> {
    match default? {
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Maps one input line to an answer value, or a retry message when the
/// line does not parse for the question kind.
fn interpret(input: &str, request: &PromptRequest) -> Result<Value, String> {
    match request.kind {
        // Password input is echoed; raw-mode terminal handling is the
        // caller's concern.
        QuestionKind::Input | QuestionKind::Password => Ok(parse_input(input, request.default.as_ref())),
        QuestionKind::Confirm => parse_confirm(input, request.default.as_ref())
            .map(Value::Bool)
            .ok_or_else(|| "Please answer yes or no.".to_string()),
        QuestionKind::Select => parse_select(input, &request.choices, request.default.as_ref())
            .map(Value::String)
            .ok_or_else(|| "Please pick a listed choice or its number.".to_string()),
        QuestionKind::MultiSelect => parse_multi_select(input, &request.choices, request.default.as_ref())
            .map(|choices| Value::Array(choices.into_iter().map(Value::String).collect()))
            .ok_or_else(|| "Please pick listed choices, comma separated.".to_string()),
    }
}

fn parse_input(input: &str, default: Option<&Value>) -> Value {
    if input.is_empty() {
        return default.cloned().unwrap_or_else(|| Value::String(String::new()));
    }
    Value::String(input.to_string())
}

fn parse_confirm(input: &str, default: Option<&Value>) -> Option<bool> {
    match input.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        "" => default.and_then(Value::as_bool),
        _ => None,
    }
}

fn parse_select(input: &str, choices: &[String], default: Option<&Value>) -> Option<String> {
    if input.is_empty() {
        return default.and_then(Value::as_str).map(str::to_string);
    }
    parse_choice(input, choices)
}

fn parse_multi_select(
    input: &str,
    choices: &[String],
    default: Option<&Value>,
) -> Option<Vec<String>> {
    if input.is_empty() {
        return match default {
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| value.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(text)) => Some(vec![text.clone()]),
            _ => Some(Vec::new()),
        };
    }
    input
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_choice(part, choices))
        .collect()
}

/// A 1-based index into the choices, or a literal choice.
fn parse_choice(input: &str, choices: &[String]) -> Option<String> {
    if let Ok(index) = input.parse::<usize>() {
        if index >= 1 && index <= choices.len() {
            return Some(choices[index - 1].clone());
        }
        return None;
    }
    choices.iter().find(|choice| choice.as_str() == input).cloned()
}
