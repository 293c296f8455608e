//! Status reports collected during a run.
//!
//! Every stage returns its user-facing messages in a [`Reports`] collector
//! instead of printing them. Each entry is also forwarded to the `log`
//! facade as it is recorded.

use serde::{Deserialize, Serialize};

use crate::error::{BackendError, ValidationResult};

/// Severity of a report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Progress information.
    Info,
    /// Something was skipped or adjusted; the run continued.
    Warning,
    /// A unit of work failed.
    Error,
}

impl Severity {
    /// Upper-case tag used when printing entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Entry severity.
    pub severity: Severity,
    /// Stable code (e.g. "SPRITE_004", "W002"), if the entry has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl std::fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(ref code) => write!(f, "{}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Ordered collection of report entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reports {
    entries: Vec<ReportEntry>,
}

impl Reports {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry and forwards it to the log.
    pub fn push(&mut self, severity: Severity, code: Option<String>, message: impl Into<String>) {
        let entry = ReportEntry {
            severity,
            code,
            message: message.into(),
        };
        match severity {
            Severity::Info => log::info!("{}", entry),
            Severity::Warning => log::warn!("{}", entry),
            Severity::Error => log::error!("{}", entry),
        }
        self.entries.push(entry);
    }

    /// Records an informational message.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, None, message);
    }

    /// Records a warning.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, None, message);
    }

    /// Records an error.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, None, message);
    }

    /// Records a backend error with its code.
    pub fn backend_error(&mut self, err: &dyn BackendError) {
        self.push(Severity::Error, Some(err.code().to_string()), err.message());
    }

    /// Records a backend error as a warning (the unit was skipped).
    pub fn backend_warning(&mut self, err: &dyn BackendError) {
        self.push(Severity::Warning, Some(err.code().to_string()), err.message());
    }

    /// Records every error and warning of a validation result.
    pub fn extend_validation(&mut self, result: &ValidationResult) {
        for error in &result.errors {
            self.push(
                Severity::Error,
                Some(error.code.code().to_string()),
                with_path(&error.message, error.path.as_deref()),
            );
        }
        for warning in &result.warnings {
            self.push(
                Severity::Warning,
                Some(warning.code.code().to_string()),
                with_path(&warning.message, warning.path.as_deref()),
            );
        }
    }

    /// Appends all entries of another collector without logging them again.
    pub fn append(&mut self, other: Reports) {
        self.entries.extend(other.entries);
    }

    /// All entries in the order they were recorded.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Entries of one severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(move |e| e.severity == severity)
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.with_severity(Severity::Warning).count()
    }

    /// Number of errors.
    pub fn error_count(&self) -> usize {
        self.with_severity(Severity::Error).count()
    }

    /// Returns true if any error was recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn with_path(message: &str, path: Option<&str>) -> String {
    match path {
        Some(path) => format!("{} (at {})", message, path),
        None => message.to_string(),
    }
}
