//! Loader/writer for the node's YAML configuration document.
//!
//! The document is an ordered tree of mappings, sequences, and scalars.
//! `serde_yaml::Mapping` preserves key insertion order, so keys the tuner
//! never touches survive a load/write cycle unchanged and in their original
//! position.

use crate::error::{DocumentError, TunerError};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// The in-memory configuration document: the YAML root mapping.
pub type Document = Mapping;

/// Load a document from disk.
///
/// Fails if the file is absent, unreadable, not well-formed YAML, or its root
/// node is not a mapping.
pub fn load(path: &Path) -> Result<Document, DocumentError> {
    let text = fs::read_to_string(path).map_err(|e| DocumentError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let value: Value = serde_yaml::from_str(&text).map_err(|e| DocumentError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Mapping(map) => Ok(map),
        _ => Err(DocumentError::Parse {
            path: path.to_path_buf(),
            reason: "root node is not a mapping".to_string(),
        }),
    }
}

/// Render a document as block-style YAML text.
pub fn render(doc: &Document) -> Result<String, DocumentError> {
    serde_yaml::to_string(doc).map_err(|e| DocumentError::Serialize(e.to_string()))
}

/// Serialize `doc` and atomically replace the file at `path`.
///
/// Either the whole document lands on disk or the original file is left
/// intact; a crash mid-write never leaves a half-applied configuration.
pub fn write(path: &Path, doc: &Document) -> Result<(), DocumentError> {
    let text = render(doc)?;
    write_atomic(path, text.as_bytes()).map_err(|e| DocumentError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write bytes to a sibling temp file and rename it over the target.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path).map_err(|e| {
        // Clean up temp file on error
        let _ = fs::remove_file(&temp_path);
        e
    })
}

/// Overwrite a string-valued key at the document root.
pub fn set_str(doc: &mut Mapping, key: &str, value: &str) {
    doc.insert(
        Value::String(key.to_string()),
        Value::String(value.to_string()),
    );
}

/// Overwrite an integer-valued key at the document root.
pub fn set_int(doc: &mut Mapping, key: &str, value: i64) {
    doc.insert(Value::String(key.to_string()), Value::Number(value.into()));
}

/// Overwrite a boolean-valued key at the document root.
pub fn set_bool(doc: &mut Mapping, key: &str, value: bool) {
    doc.insert(Value::String(key.to_string()), Value::Bool(value));
}

/// Overwrite a key with a sequence of strings, even for a single element.
pub fn set_str_seq(doc: &mut Mapping, key: &str, values: &[String]) {
    let seq = values
        .iter()
        .map(|v| Value::String(v.clone()))
        .collect::<Vec<_>>();
    doc.insert(Value::String(key.to_string()), Value::Sequence(seq));
}

/// The string value of a scalar key, if present and a string.
pub fn str_value<'a>(doc: &'a Mapping, key: &str) -> Option<&'a str> {
    let key = Value::String(key.to_string());
    match doc.get(&key) {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

/// Mutable access to a nested mapping under `key`.
///
/// The sub-mapping must already exist in the loaded document; the tuner never
/// creates these structures.
pub fn nested_mapping_mut<'a>(
    doc: &'a mut Mapping,
    key: &str,
) -> Result<&'a mut Mapping, TunerError> {
    let index = Value::String(key.to_string());
    match doc.get_mut(&index) {
        Some(Value::Mapping(map)) => Ok(map),
        Some(_) => Err(TunerError::Structure(format!("'{key}' is not a mapping"))),
        None => Err(TunerError::Structure(format!("'{key}' mapping is missing"))),
    }
}
