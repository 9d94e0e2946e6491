//! CLI argument parsing via `clap`.

use crate::models::policy::LineHints;
use crate::output::OutputMode;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "iacscore",
    version,
    about = "Infrastructure-as-Code quality analyzer",
    long_about = "iacscore: static analysis for Ansible playbooks and compose stacks.\n\nScores atomicity, idempotence, maintainability, and project standards, and fails when the overall score drops below 80.\n\nConfiguration precedence: CLI > iacscore.toml > defaults.",
    after_help = "Examples:\n  iacscore analyze\n  iacscore analyze --root infra --output json --report tests/artifacts/quality_report.json\n  iacscore analyze --output markdown --line-hints ordinal",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current iacscore version.")]
    Version,
    /// Analyze playbooks and compose stacks
    #[command(
        about = "Analyze a project",
        long_about = "Analyze playbooks/ and stacks/ under the project root and print a scored report. Exits 1 when the overall score is below 80.",
        after_help = "Examples:\n  iacscore analyze --root .\n  iacscore analyze --output json"
    )]
    Analyze {
        #[arg(long, help = "Project root (default: detected from current dir)")]
        root: Option<String>,
        #[arg(long, help = "Output mode: text|json|markdown (default: text)")]
        output: Option<OutputMode>,
        #[arg(long, help = "Write the rendered report to this file instead of stdout")]
        report: Option<String>,
        #[arg(long, help = "Line attribution: fixed|ordinal (default: fixed)")]
        line_hints: Option<LineHints>,
    },
}
