//! Pattern heuristics over generated code.
//!
//! Nothing here parses the code. Each entry of [`rules::RULES`] is a plain text
//! test, and [`analyze`] folds the entries that fire into a [`CodeAnalysis`].

pub mod rules;

use crate::language::Language;
use rules::{Finding, RULES};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn from_line_count(lines: usize) -> Self {
        if lines > 50 {
            Complexity::High
        } else if lines > 20 {
            Complexity::Medium
        } else {
            Complexity::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SecurityKind {
    SqlInjection,
    Xss,
    UnsafeInput,
    HardcodedSecrets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceKind {
    Algorithm,
    Memory,
    Io,
    Complexity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityIssue {
    pub kind: SecurityKind,
    pub severity: Severity,
    pub description: String,
    pub remediation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceIssue {
    pub kind: PerformanceKind,
    pub severity: Severity,
    pub description: String,
    pub remediation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAnalysis {
    pub security: Vec<SecurityIssue>,
    pub performance: Vec<PerformanceIssue>,
    pub best_practices: Vec<String>,
    pub complexity: Complexity,
}

impl CodeAnalysis {
    pub fn is_clean(&self) -> bool {
        self.security.is_empty() && self.performance.is_empty() && self.best_practices.is_empty()
    }
}

/// Run every rule over `code`. The language does not change which rules
/// apply; it is taken so callers always pass the block's declared language.
pub fn analyze(code: &str, _language: Language) -> CodeAnalysis {
    let mut analysis = CodeAnalysis {
        security: Vec::new(),
        performance: Vec::new(),
        best_practices: Vec::new(),
        complexity: Complexity::from_line_count(code.split('\n').count()),
    };

    for finding in RULES.iter().filter_map(|rule| rule.evaluate(code)) {
        match finding {
            Finding::Security(issue) => analysis.security.push(issue),
            Finding::Performance(issue) => analysis.performance.push(issue),
            Finding::Practice(message) => analysis.best_practices.push(message.to_string()),
        }
    }

    analysis
}
