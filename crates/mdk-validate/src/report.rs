//! Accumulated validation outcome for one variable.

use serde::{Deserialize, Serialize};

use crate::issue::{Issue, Severity};

/// Every violation found for one subject, in discovery order.
///
/// A report is valid when it carries zero errors; warnings never
/// invalidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub subject: String,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            issues: Vec::new(),
        }
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
            .count()
    }

    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// Rendered error messages in discovery order, one per violation.
    pub fn reasons(&self) -> Vec<String> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
            .map(Issue::message)
            .collect()
    }
}
