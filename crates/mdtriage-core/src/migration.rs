//! Migration log
//!
//! Structured record of everything a run did (or, under dry-run, would
//! have done), plus the warnings and errors stages attached along the
//! way. Renders as markdown for humans and serializes for `--format json`.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// What kind of operation a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Classify,
    Group,
    Merge,
    Archive,
    Write,
    Skip,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Classify => "classify",
            OperationKind::Group => "group",
            OperationKind::Merge => "merge",
            OperationKind::Archive => "archive",
            OperationKind::Write => "write",
            OperationKind::Skip => "skip",
        }
    }
}

/// One structured operation record
#[derive(Debug, Clone, Serialize)]
pub struct OperationRecord {
    pub op: OperationKind,
    pub source: String,
    pub destination: Option<String>,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationLog {
    pub operations: Vec<OperationRecord>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl MigrationLog {
    pub fn record(
        &mut self,
        op: OperationKind,
        source: impl Into<String>,
        destination: Option<String>,
        details: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) {
        self.operations.push(OperationRecord {
            op,
            source: source.into(),
            destination,
            details: details.into(),
            timestamp,
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    /// Markdown report for human review.
    pub fn render_markdown(&self) -> String {
        let mut out = String::from("# Migration Log\n");

        out.push_str(&format!(
            "\n{} operations, {} warnings, {} errors\n",
            self.operations.len(),
            self.warnings.len(),
            self.errors.len(),
        ));

        if !self.operations.is_empty() {
            out.push_str("\n## Operations\n\n");
            for record in &self.operations {
                let destination = record
                    .destination
                    .as_deref()
                    .map(|d| format!(" -> {d}"))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "- `{}` {} {}{}: {}\n",
                    record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    record.op.as_str(),
                    record.source,
                    destination,
                    record.details,
                ));
            }
        }

        if !self.warnings.is_empty() {
            out.push_str("\n## Warnings\n\n");
            for warning in &self.warnings {
                out.push_str(&format!("- {warning}\n"));
            }
        }

        if !self.errors.is_empty() {
            out.push_str("\n## Errors\n\n");
            for error in &self.errors {
                out.push_str(&format!("- {error}\n"));
            }
        }

        out
    }
}
