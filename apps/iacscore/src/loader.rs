//! YAML tree loading.
//!
//! Syntax errors are turned into a maintainability finding instead of an
//! error so a single broken file never stops the run. Read failures and
//! content that is not UTF-8 are returned as [`Error`].

use crate::checks::is_truthy;
use crate::error::{Error, Result};
use crate::models::policy::LineHints;
use crate::models::{Category, Finding, Severity};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum Loaded {
    /// Empty document, or a root that is null, false, zero or empty.
    Empty,
    Tree(Value),
    /// The file is not valid YAML; holds the single finding describing it.
    Malformed(Finding),
}

pub fn load_tree(path: &Path, line_hints: LineHints) -> Result<Loaded> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let src = std::str::from_utf8(&bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_tree(path, src, line_hints))
}

pub fn parse_tree(path: &Path, src: &str, line_hints: LineHints) -> Loaded {
    if is_blank(src) {
        return Loaded::Empty;
    }
    match serde_yaml::from_str::<Value>(src) {
        Ok(tree) if is_truthy(&tree) => Loaded::Tree(tree),
        Ok(_) => Loaded::Empty,
        Err(err) => {
            let line = err.location().map_or(1, |loc| loc.line());
            Loaded::Malformed(Finding::new(
                path.to_string_lossy(),
                line_hints.pick(line),
                Severity::Error,
                Category::Maintainability,
                format!("YAML parsing error: {err}"),
            ))
        }
    }
}

/// Only whitespace and comment lines.
fn is_blank(src: &str) -> bool {
    src.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}
