//! Writing a session to a JSON file.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use interpreter::Number;
use num::ToPrimitive;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::{history::HistoryEntry, Session};

pub const DEFAULT_FILE_NAME: &str = "historico_calculadora";
pub const EXTENSION: &str = ".json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no operations to save")]
    NothingToSave,
    #[error("could not write history file: {0}")]
    Io(#[from] io::Error),
    #[error("could not serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord<'a> {
    total_operations: u64,
    memory: Value,
    last_result: Option<Value>,
    history: Vec<EntryRecord<'a>>,
}

#[derive(Serialize)]
struct EntryRecord<'a> {
    timestamp: String,
    expression: &'a str,
    result: Value,
    kind: &'static str,
}

impl<'a> From<&'a HistoryEntry> for EntryRecord<'a> {
    fn from(entry: &'a HistoryEntry) -> Self {
        EntryRecord {
            timestamp: entry.timestamp_text(),
            expression: entry.expression(),
            result: Value::from(entry.result().to_f64()),
            kind: entry.kind().name(),
        }
    }
}

impl<'a> From<&'a Session> for SessionRecord<'a> {
    fn from(session: &'a Session) -> Self {
        SessionRecord {
            total_operations: session.total_operations(),
            memory: json_number(session.memory()),
            last_result: session.last_result().map(json_number),
            history: session.history().iter().map(EntryRecord::from).collect(),
        }
    }
}

/// Integers that fit in an `i64` are written as JSON integers, everything
/// else as a float. Non-finite floats become `null`.
fn json_number(number: &Number) -> Value {
    match number {
        Number::Int(int) => match int.to_i64() {
            Some(int) => Value::from(int),
            None => Value::from(number.to_f64()),
        },
        Number::Float(float) => Value::from(*float),
    }
}

/// File name for the name the user typed: blank picks the default, and
/// `.json` is appended unless already there.
pub fn file_name(input: &str) -> String {
    let name = match input.trim() {
        "" => DEFAULT_FILE_NAME,
        name => name,
    };
    if name.ends_with(EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{EXTENSION}")
    }
}

/// Writes the session to `dir`, returning the path of the new file.
pub fn save(session: &Session, dir: &Path, name: &str) -> Result<PathBuf, PersistError> {
    if session.history().is_empty() {
        return Err(PersistError::NothingToSave);
    }
    let path = dir.join(file_name(name));
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, &SessionRecord::from(session))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!(path = %path.display(), entries = session.history().len(), "history saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryAction, Operation};

    #[test]
    fn file_names() {
        assert_eq!(file_name(""), "historico_calculadora.json");
        assert_eq!(file_name("  "), "historico_calculadora.json");
        assert_eq!(file_name("contas"), "contas.json");
        assert_eq!(file_name("contas.json"), "contas.json");
    }

    #[test]
    fn refuses_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::new();
        assert!(matches!(
            save(&session, dir.path(), ""),
            Err(PersistError::NothingToSave)
        ));
    }

    #[test]
    fn writes_session_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        session.manage_memory(MemoryAction::Set(Number::from(7)));
        session
            .perform(Operation::Multiply(Number::from(2), Number::Float(1.5)))
            .unwrap();
        session.evaluate_expression("M ^ 2").unwrap();

        let path = save(&session, dir.path(), "sessão").unwrap();
        assert_eq!(path, dir.path().join("sessão.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"totalOperations\": 2"));
        assert!(text.contains("2 × 1.5"));

        let json: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["totalOperations"], 2);
        assert_eq!(json["memory"], 7);
        assert_eq!(json["lastResult"], 49);
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["expression"], "2 × 1.5");
        assert_eq!(history[0]["result"], 3.0);
        assert_eq!(history[0]["kind"], "Multiplication");
        assert_eq!(history[1]["expression"], "7 ^ 2");
        assert_eq!(history[1]["kind"], "Expression");
        assert_eq!(history[1]["timestamp"].as_str().unwrap().len(), 19);
    }

    #[test]
    fn whole_floats_stay_floats() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::new();
        session
            .perform(Operation::SquareRoot(Number::from(9)))
            .unwrap();
        let path = save(&session, dir.path(), "raiz").unwrap();
        let json: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["memory"], 0.0);
        assert_eq!(json["lastResult"], 3.0);
    }
}
