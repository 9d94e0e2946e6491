//! Category and overall scores.
//!
//! Every category starts at 100 and loses a fixed number of points per
//! finding, floored at 0. The overall score is a fixed weighted sum of the
//! four category scores.

use crate::models::{Category, Finding, Severity};
use serde::Serialize;

const MAX_SCORE: f64 = 100.0;

/// Weights per category; they sum to 1.0.
pub const WEIGHTS: [(Category, f64); 4] = [
    (Category::Atomicity, 0.25),
    (Category::Idempotence, 0.30),
    (Category::Maintainability, 0.20),
    (Category::Standards, 0.25),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scores {
    pub atomicity: f64,
    pub idempotence: f64,
    pub maintainability: f64,
    pub standards: f64,
    pub overall: f64,
}

impl Scores {
    pub fn category(&self, category: Category) -> f64 {
        match category {
            Category::Atomicity => self.atomicity,
            Category::Idempotence => self.idempotence,
            Category::Maintainability => self.maintainability,
            Category::Standards => self.standards,
        }
    }
}

/// Points removed from a category per finding.
pub const fn deduction(severity: Severity) -> f64 {
    match severity {
        Severity::Error => 10.0,
        Severity::Warning => 5.0,
        Severity::Info => 2.0,
    }
}

pub fn category_score(findings: &[Finding], category: Category) -> f64 {
    let lost: f64 = findings
        .iter()
        .filter(|f| f.category == category)
        .map(|f| deduction(f.severity))
        .sum();
    (MAX_SCORE - lost).clamp(0.0, MAX_SCORE)
}

pub fn score(findings: &[Finding]) -> Scores {
    let atomicity = category_score(findings, Category::Atomicity);
    let idempotence = category_score(findings, Category::Idempotence);
    let maintainability = category_score(findings, Category::Maintainability);
    let standards = category_score(findings, Category::Standards);
    let mut scores = Scores {
        atomicity,
        idempotence,
        maintainability,
        standards,
        overall: 0.0,
    };
    scores.overall = WEIGHTS
        .iter()
        .map(|(category, weight)| scores.category(*category) * weight)
        .sum::<f64>()
        .clamp(0.0, MAX_SCORE);
    scores
}
