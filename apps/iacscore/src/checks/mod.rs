//! Rule evaluators over parsed YAML trees.
//!
//! Each check is a plain function that inspects one structural pattern and
//! pushes findings. The set is closed: `playbook::TASK_CHECKS`,
//! `playbook::evaluate` and `compose::COMPOSE_CHECKS` list every rule that
//! runs, in the order their findings are emitted.
//!
//! Trees are loosely typed, so every check verifies the shape it expects and
//! silently skips anything else.

pub mod compose;
pub mod playbook;

use crate::models::policy::{Conventions, LineHints};
use crate::models::{Category, Finding, Severity};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Per-file inputs shared by all checks.
pub struct CheckContext<'a> {
    pub path: &'a Path,
    pub file: String,
    pub conventions: &'a Conventions,
    pub line_hints: LineHints,
}

impl<'a> CheckContext<'a> {
    pub fn new(path: &'a Path, conventions: &'a Conventions, line_hints: LineHints) -> Self {
        Self {
            path,
            file: path.to_string_lossy().to_string(),
            conventions,
            line_hints,
        }
    }

    pub fn finding(
        &self,
        line: usize,
        severity: Severity,
        category: Category,
        message: impl Into<String>,
    ) -> Finding {
        Finding::new(self.file.clone(), line, severity, category, message)
    }
}

/// Look through YAML tags (`!vault`, `!!map`, ...) to the tagged value.
pub(crate) fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

pub(crate) fn as_mapping(value: &Value) -> Option<&Mapping> {
    match untag(value) {
        Value::Mapping(m) => Some(m),
        _ => None,
    }
}

pub(crate) fn as_sequence(value: &Value) -> Option<&[Value]> {
    match untag(value) {
        Value::Sequence(s) => Some(s.as_slice()),
        _ => None,
    }
}

pub(crate) fn as_str(value: &Value) -> Option<&str> {
    match untag(value) {
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Truthiness of a scalar or collection: null, false, zero and empty
/// strings or collections are false.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match untag(value) {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(s) => !s.is_empty(),
        Value::Mapping(m) => !m.is_empty(),
        Value::Tagged(_) => true,
    }
}

/// Display form of a mapping key.
pub(crate) fn key_name(key: &Value) -> String {
    match untag(key) {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
