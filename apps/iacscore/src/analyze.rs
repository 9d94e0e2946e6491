//! Project analysis: discovery, per-file evaluation, and report assembly.
//!
//! Phases run in a fixed order: playbooks, then compose files, then scoring
//! and summarizing inside [`Report::assemble`]. Files within a phase are
//! evaluated in parallel and merged back in discovery order, so two runs over
//! the same tree produce the same findings in the same order.

use crate::checks::{compose, playbook, CheckContext};
use crate::error::{Error, Result};
use crate::loader::{load_tree, Loaded};
use crate::models::policy::{Conventions, LineHints};
use crate::models::{Finding, Report};
use chrono::{DateTime, Utc};
use glob::glob;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Playbook,
    Compose,
}

impl FileKind {
    fn label(self) -> &'static str {
        match self {
            FileKind::Playbook => "playbooks",
            FileKind::Compose => "compose",
        }
    }
}

#[derive(Debug, Clone)]
/// Inputs that shape a run; everything here comes from config or CLI.
pub struct AnalyzeOptions {
    /// Playbooks directory, relative to the project root.
    pub playbooks_dir: PathBuf,
    /// Stacks directory, relative to the project root.
    pub stacks_dir: PathBuf,
    pub conventions: Conventions,
    pub line_hints: LineHints,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            playbooks_dir: PathBuf::from("playbooks"),
            stacks_dir: PathBuf::from("stacks"),
            conventions: Conventions::default(),
            line_hints: LineHints::default(),
        }
    }
}

/// Analyze a project root and assemble its report.
///
/// `generated_at` is stamped on the report as-is. A missing `root` is an
/// error; missing playbooks or stacks directories just contribute no files.
pub fn analyze_project(
    root: &Path,
    opts: &AnalyzeOptions,
    generated_at: DateTime<Utc>,
) -> Result<Report> {
    if !root.is_dir() {
        return Err(Error::MissingRoot(root.to_path_buf()));
    }
    tracing::info!("analyzing infrastructure-as-code project at {}", root.display());

    let mut findings: Vec<Finding> = Vec::new();
    let mut files_analyzed = 0usize;
    for kind in [FileKind::Playbook, FileKind::Compose] {
        let targets = discover(root, opts, kind)?;
        let (found, count) = scan(&targets, kind, opts);
        tracing::debug!(
            phase = kind.label(),
            files = count,
            findings = found.len(),
            "phase complete"
        );
        findings.extend(found);
        files_analyzed += count;
    }

    Ok(Report::assemble(generated_at, findings, files_analyzed))
}

/// Load and evaluate one file.
pub fn analyze_file(path: &Path, kind: FileKind, opts: &AnalyzeOptions) -> Result<Vec<Finding>> {
    let tree = match load_tree(path, opts.line_hints)? {
        Loaded::Empty => return Ok(Vec::new()),
        Loaded::Malformed(finding) => return Ok(vec![finding]),
        Loaded::Tree(tree) => tree,
    };
    let ctx = CheckContext::new(path, &opts.conventions, opts.line_hints);
    Ok(match kind {
        FileKind::Playbook => playbook::evaluate(&tree, &ctx),
        FileKind::Compose => compose::evaluate(&tree, &ctx),
    })
}

/// Files of one kind under the project root, sorted by path.
pub fn discover(root: &Path, opts: &AnalyzeOptions, kind: FileKind) -> Result<Vec<PathBuf>> {
    let (dir, file_glob) = match kind {
        FileKind::Playbook => (root.join(&opts.playbooks_dir), "*.yml".to_string()),
        FileKind::Compose => (
            root.join(&opts.stacks_dir),
            glob::Pattern::escape(&opts.conventions.compose_file),
        ),
    };
    if !dir.is_dir() {
        tracing::debug!("skipping {}: {} not found", kind.label(), dir.display());
        return Ok(Vec::new());
    }
    let pattern = format!(
        "{}/**/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        file_glob
    );
    let mut targets = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(p) if p.is_file() => targets.push(p),
            Ok(_) => {}
            Err(e) => tracing::warn!("cannot read {}: {}", e.path().display(), e.error()),
        }
    }
    targets.sort();
    Ok(targets)
}

/// Evaluate `targets` in parallel; returns findings in target order and the
/// number of files that could be read and decoded.
fn scan(targets: &[PathBuf], kind: FileKind, opts: &AnalyzeOptions) -> (Vec<Finding>, usize) {
    let per_file: Vec<Option<Vec<Finding>>> = targets
        .par_iter()
        .map(|path| match analyze_file(path, kind, opts) {
            Ok(found) => Some(found),
            Err(e) => {
                tracing::warn!("error analyzing {}: {}", path.display(), e);
                None
            }
        })
        .collect();
    let count = per_file.iter().flatten().count();
    let findings: Vec<Finding> = per_file.into_iter().flatten().flatten().collect();
    (findings, count)
}
