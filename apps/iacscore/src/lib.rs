//! iacscore core library.
//!
//! Static analysis for Infrastructure-as-Code trees: Ansible playbooks and
//! compose stacks are loaded as YAML, run through a fixed set of checks, and
//! reduced into a scored report.
//!
//! High-level modules:
//! - `analyze`: Discovery, per-file evaluation, and report assembly.
//! - `checks`: Playbook and compose rule evaluators.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `error`: Crate error type.
//! - `loader`: YAML tree loading with parse errors as findings.
//! - `models`: Findings, summaries, the report, and project conventions.
//! - `output`: Text/JSON/Markdown renderers.
//! - `scoring`: Category and weighted overall scores.
//! - `utils`: Supporting helpers.
pub mod analyze;
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod output;
pub mod scoring;
pub mod utils;

pub use analyze::{analyze_project, AnalyzeOptions};
pub use error::{Error, Result};
pub use models::{Category, Finding, Report, Severity, Summary};
pub use scoring::Scores;
