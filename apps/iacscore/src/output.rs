//! Report rendering.
//!
//! Supports `text` (default, alias `human`), `json` and `markdown`. The JSON
//! form is the serialized [`Report`] with stable key order.

use crate::error::{Error, Result};
use crate::models::{Category, Finding, Report, Severity, PASS_THRESHOLD};
use crate::scoring::WEIGHTS;
use owo_colors::OwoColorize;
use serde::Deserialize;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;
use std::str::FromStr;

const RULE: &str = "================================================================================";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    #[serde(alias = "human")]
    Text,
    Json,
    Markdown,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "human" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            "markdown" | "md" => Ok(OutputMode::Markdown),
            other => Err(format!("unknown output mode '{other}' (text|json|markdown)")),
        }
    }
}

pub fn use_colors(mode: OutputMode) -> bool {
    mode == OutputMode::Text && std::env::var_os("NO_COLOR").is_none()
}

/// Render `report` in the requested mode.
pub fn render(report: &Report, mode: OutputMode, color: bool) -> Result<String> {
    match mode {
        OutputMode::Json => render_json(report),
        OutputMode::Text => render_text(report, color),
        OutputMode::Markdown => render_markdown(report),
    }
}

pub fn render_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Error::from)
}

/// Issues for listing, ordered by severity label then file.
fn sorted_findings(report: &Report) -> Vec<&Finding> {
    let mut items: Vec<&Finding> = report.findings().iter().collect();
    items.sort_by(|a, b| {
        a.severity
            .as_str()
            .cmp(b.severity.as_str())
            .then_with(|| a.file.cmp(&b.file))
    });
    items
}

fn severity_tag(severity: Severity, color: bool) -> String {
    let tag = format!("[{}]", severity.as_str().to_ascii_uppercase());
    if !color {
        return tag;
    }
    match severity {
        Severity::Error => tag.red().bold().to_string(),
        Severity::Warning => tag.yellow().bold().to_string(),
        Severity::Info => tag.blue().bold().to_string(),
    }
}

pub fn render_text(report: &Report, color: bool) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, report, color)?;
    Ok(out)
}

fn write_text(out: &mut String, report: &Report, color: bool) -> fmt::Result {
    let scores = report.scores();
    let title = "Infrastructure-as-Code Quality Report";
    writeln!(out, "{RULE}")?;
    if color {
        writeln!(out, "{}", title.bold())?;
    } else {
        writeln!(out, "{title}")?;
    }
    writeln!(out, "{RULE}\n")?;
    writeln!(out, "Files Analyzed: {}", report.files_analyzed())?;
    writeln!(out, "Total Issues: {}\n", report.summary().total)?;
    writeln!(out, "Scores:")?;
    writeln!(out, "  Atomicity:       {:.1}/100", scores.atomicity)?;
    writeln!(out, "  Idempotence:     {:.1}/100", scores.idempotence)?;
    writeln!(out, "  Maintainability: {:.1}/100", scores.maintainability)?;
    writeln!(out, "  Standards:       {:.1}/100", scores.standards)?;
    writeln!(out, "  Overall:         {:.1}/100", scores.overall)?;

    let findings = sorted_findings(report);
    if !findings.is_empty() {
        writeln!(out, "\nIssues Found:")?;
    }
    for f in findings {
        writeln!(
            out,
            "\n{} {}:{}",
            severity_tag(f.severity, color),
            f.file,
            f.line
        )?;
        writeln!(out, "  Category: {}", f.category)?;
        writeln!(out, "  Message: {}", f.message)?;
        if let Some(fix) = &f.remediation {
            writeln!(out, "  Fix: {fix}")?;
        }
    }
    Ok(())
}

fn status(score: f64) -> &'static str {
    if score >= PASS_THRESHOLD {
        "pass"
    } else {
        "fail"
    }
}

pub fn render_markdown(report: &Report) -> Result<String> {
    let mut md = String::new();
    write_markdown(&mut md, report)?;
    Ok(md)
}

fn write_markdown(md: &mut String, report: &Report) -> fmt::Result {
    let scores = report.scores();
    let summary = report.summary();
    writeln!(md, "# Infrastructure-as-Code Quality Report\n")?;
    writeln!(
        md,
        "**Overall: {:.1}/100 ({})** | Files analyzed: {} | Generated: {}\n",
        scores.overall,
        status(scores.overall),
        report.files_analyzed(),
        report.generated_at().to_rfc3339()
    )?;

    md.push_str("## Scores\n\n| Category | Weight | Score |\n|----------|--------|-------|\n");
    for (category, weight) in WEIGHTS {
        writeln!(
            md,
            "| {} | {:.0}% | {:.1}/100 |",
            category,
            weight * 100.0,
            scores.category(category)
        )?;
    }

    md.push_str("\n## Summary\n\n| Severity | Count |\n|----------|-------|\n");
    for severity in Severity::ALL {
        writeln!(md, "| {} | {} |", severity, summary.by_severity.get(severity))?;
    }
    writeln!(md, "| **Total** | **{}** |", summary.total)?;
    md.push_str("\n| Category | Count |\n|----------|-------|\n");
    for category in Category::ALL {
        writeln!(md, "| {} | {} |", category, summary.by_category.get(category))?;
    }

    md.push_str("\n## Issues\n\n");
    if report.findings().is_empty() {
        md.push_str("No issues found.\n");
        return Ok(());
    }
    for severity in Severity::ALL {
        let group: Vec<&Finding> = report
            .findings()
            .iter()
            .filter(|f| f.severity == severity)
            .collect();
        if group.is_empty() {
            continue;
        }
        writeln!(md, "### {} ({})\n", severity, group.len())?;
        for f in group {
            writeln!(
                md,
                "- `{}:{}` **{}**: {}",
                f.file, f.line, f.category, f.message
            )?;
            if let Some(fix) = &f.remediation {
                writeln!(md, "  - Fix: {fix}")?;
            }
        }
        md.push('\n');
    }
    Ok(())
}

/// Write the rendered report to `path`, creating parent directories.
pub fn write_report(path: &Path, rendered: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, rendered).map_err(|e| Error::io(path, e))
}
