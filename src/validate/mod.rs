//! Quality validation of the accepted question/answer set
//!
//! Validation annotates, it never removes records: the final output is
//! written whatever the verdict.

use crate::config::ValidationConfig;
use crate::extract::{char_len, QARecord};
use std::fmt;

/// How many example issues a report keeps
const MAX_ISSUES: usize = 5;

/// Overall outcome of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
    /// No records at all; reported separately from a low pass ratio
    Empty,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Empty => write!(f, "FAIL (no records)"),
        }
    }
}

/// Result of validating a record set
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub total: usize,
    /// Records whose question is long enough
    pub question_length_ok: usize,
    /// Records whose answer is long enough
    pub answer_length_ok: usize,
    /// Records whose question ends with `?`
    pub question_mark_ok: usize,
    /// Records meeting every rule
    pub passing: usize,
    pub pass_ratio: f64,
    pub verdict: Verdict,
    /// Descriptions of the first few failing records
    pub issues: Vec<String>,
}

impl ValidationReport {
    pub fn question_length_failures(&self) -> usize {
        self.total - self.question_length_ok
    }

    pub fn answer_length_failures(&self) -> usize {
        self.total - self.answer_length_ok
    }

    pub fn question_mark_failures(&self) -> usize {
        self.total - self.question_mark_ok
    }
}

/// Checks every pair against the length and punctuation rules
///
/// # Arguments
///
/// * `records` - The accepted pairs
/// * `config` - Thresholds and the required pass ratio
///
/// # Returns
///
/// A report with per-rule pass counts and the overall verdict
pub fn validate_records(records: &[QARecord], config: &ValidationConfig) -> ValidationReport {
    let mut report = ValidationReport {
        total: records.len(),
        question_length_ok: 0,
        answer_length_ok: 0,
        question_mark_ok: 0,
        passing: 0,
        pass_ratio: 0.0,
        verdict: Verdict::Empty,
        issues: Vec::new(),
    };

    if records.is_empty() {
        report
            .issues
            .push("No question/answer pairs were extracted".to_string());
        return report;
    }

    for (i, record) in records.iter().enumerate() {
        let mut problems = Vec::new();

        let question_len = char_len(record.question.trim());
        if question_len >= config.min_question_chars {
            report.question_length_ok += 1;
        } else {
            problems.push(format!("question too short ({} chars)", question_len));
        }

        let answer_len = char_len(record.answer.trim());
        if answer_len >= config.min_answer_chars {
            report.answer_length_ok += 1;
        } else {
            problems.push(format!("answer too short ({} chars)", answer_len));
        }

        if record.question.trim_end().ends_with('?') {
            report.question_mark_ok += 1;
        } else {
            problems.push("question does not end with '?'".to_string());
        }

        if problems.is_empty() {
            report.passing += 1;
        } else if report.issues.len() < MAX_ISSUES {
            report.issues.push(format!("Pair {}: {}", i + 1, problems.join(", ")));
        }
    }

    report.pass_ratio = report.passing as f64 / report.total as f64;
    report.verdict = if report.pass_ratio >= config.min_pass_ratio {
        Verdict::Pass
    } else {
        Verdict::Fail
    };

    report
}
