//! Shared data models: findings, summaries, and the assembled report.

pub mod policy;

use crate::scoring::{self, Scores};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Overall score required for a run to pass.
pub const PASS_THRESHOLD: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Info];

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Atomicity,
    Idempotence,
    Maintainability,
    Standards,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Atomicity,
        Category::Idempotence,
        Category::Maintainability,
        Category::Standards,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Atomicity => "atomicity",
            Category::Idempotence => "idempotence",
            Category::Maintainability => "maintainability",
            Category::Standards => "standards",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A single quality issue with its location and classification.
pub struct Finding {
    pub file: String,
    pub line: usize,
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(rename = "fix_suggestion")]
    pub remediation: Option<String>,
}

impl Finding {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        severity: Severity,
        category: Category,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line: line.max(1),
            severity,
            category,
            message: message.into(),
            remediation: None,
        }
    }

    pub fn with_remediation(mut self, text: impl Into<String>) -> Self {
        self.remediation = Some(text.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
            Severity::Info => self.info,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub atomicity: usize,
    pub idempotence: usize,
    pub maintainability: usize,
    pub standards: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Atomicity => self.atomicity,
            Category::Idempotence => self.idempotence,
            Category::Maintainability => self.maintainability,
            Category::Standards => self.standards,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Count-based aggregates over a findings sequence.
pub struct Summary {
    #[serde(rename = "total_issues")]
    pub total: usize,
    pub by_severity: SeverityCounts,
    pub by_category: CategoryCounts,
}

impl Summary {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut summary = Self::default();
        for f in findings {
            match f.severity {
                Severity::Error => summary.by_severity.error += 1,
                Severity::Warning => summary.by_severity.warning += 1,
                Severity::Info => summary.by_severity.info += 1,
            }
            match f.category {
                Category::Atomicity => summary.by_category.atomicity += 1,
                Category::Idempotence => summary.by_category.idempotence += 1,
                Category::Maintainability => summary.by_category.maintainability += 1,
                Category::Standards => summary.by_category.standards += 1,
            }
            summary.total += 1;
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Result of one analysis run.
///
/// Built once by [`Report::assemble`]; scores and summary are derived from
/// the findings at that point and cannot be changed afterwards.
pub struct Report {
    #[serde(rename = "timestamp")]
    generated_at: DateTime<Utc>,
    scores: Scores,
    summary: Summary,
    files_analyzed: usize,
    #[serde(rename = "issues")]
    findings: Vec<Finding>,
}

impl Report {
    pub fn assemble(
        generated_at: DateTime<Utc>,
        findings: Vec<Finding>,
        files_analyzed: usize,
    ) -> Self {
        let scores = scoring::score(&findings);
        let summary = Summary::from_findings(&findings);
        Self {
            generated_at,
            scores,
            summary,
            files_analyzed,
            findings,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn files_analyzed(&self) -> usize {
        self.files_analyzed
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Whether the overall score clears [`PASS_THRESHOLD`].
    pub fn passed(&self) -> bool {
        self.scores.overall >= PASS_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn finding(severity: Severity, category: Category) -> Finding {
        Finding::new("playbooks/site.yml", 1, severity, category, "msg")
    }

    #[test]
    fn test_summary_counts_by_severity_and_category() {
        let findings = vec![
            finding(Severity::Error, Category::Standards),
            finding(Severity::Warning, Category::Maintainability),
            finding(Severity::Info, Category::Atomicity),
            finding(Severity::Info, Category::Idempotence),
        ];
        let summary = Summary::from_findings(&findings);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.by_severity.get(Severity::Error), 1);
        assert_eq!(summary.by_severity.get(Severity::Warning), 1);
        assert_eq!(summary.by_severity.get(Severity::Info), 2);
        let by_sev: usize = Severity::ALL
            .iter()
            .map(|s| summary.by_severity.get(*s))
            .sum();
        assert_eq!(by_sev, summary.total);
        let by_cat: usize = Category::ALL
            .iter()
            .map(|c| summary.by_category.get(*c))
            .sum();
        assert_eq!(by_cat, summary.total);
    }

    #[test]
    fn test_finding_line_is_at_least_one() {
        let f = Finding::new("a.yml", 0, Severity::Info, Category::Atomicity, "m");
        assert_eq!(f.line, 1);
        assert!(f.remediation.is_none());
        let f = f.with_remediation("fix");
        assert_eq!(f.remediation.as_deref(), Some("fix"));
    }

    #[test]
    fn test_report_gate() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let clean = Report::assemble(at, Vec::new(), 3);
        assert!(clean.passed());
        assert_eq!(clean.summary().total, 0);
        assert_eq!(clean.files_analyzed(), 3);

        let errors: Vec<Finding> = (0..10)
            .map(|_| finding(Severity::Error, Category::Standards))
            .collect();
        let failing = Report::assemble(at, errors, 1);
        assert_eq!(failing.scores().standards, 0.0);
        assert!(!failing.passed());
        assert_eq!(failing.summary().total, failing.findings().len());
    }
}
