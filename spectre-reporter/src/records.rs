// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Finished run records handed over by the execution engine.

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use quick_trx::Outcome;

/// The internal status a test run finished with.
///
/// This is richer than the TRX outcome: assertion failures and unexpected
/// errors are distinct here, and the distinction survives in the error-info
/// payload even though both classify as `Failed`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RunStatus {
    /// The test passed.
    Passed,

    /// An assertion failed; the record carries failure causes.
    Failed,

    /// The test raised an unexpected error; the record carries an error
    /// payload with a stack trace.
    Error,

    /// The test was not run.
    Skipped,
}

impl RunStatus {
    /// Classifies this status into the three-state TRX outcome.
    ///
    /// `Failed` and `Error` both map to [`Outcome::Failed`]; the mapping is
    /// lossy by design to match the target schema.
    pub fn outcome(self) -> Outcome {
        match self {
            RunStatus::Failed | RunStatus::Error => Outcome::Failed,
            RunStatus::Skipped => Outcome::Skipped,
            RunStatus::Passed => Outcome::Passed,
        }
    }

    /// Returns true for statuses that carry failure information.
    pub fn is_unsuccessful(self) -> bool {
        matches!(self, RunStatus::Failed | RunStatus::Error)
    }
}

/// Where a test was defined: its enclosing group and source file.
///
/// An explicit field on the record rather than a pass-through into the
/// execution engine's object graph.
#[derive(Clone, Debug)]
pub struct SpecSource {
    /// The group/spec name, used as the sort key for the report sections.
    pub name: String,

    /// The full human-readable description of the group.
    pub full_description: String,

    /// The source file the spec was loaded from.
    pub file: Utf8PathBuf,
}

impl SpecSource {
    /// Creates a new `SpecSource`.
    pub fn new(
        name: impl Into<String>,
        full_description: impl Into<String>,
        file: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            full_description: full_description.into(),
            file: file.into(),
        }
    }
}

/// One executed test case, frozen at report time.
///
/// Records are immutable snapshots: log entries and failure causes are
/// append-only during execution and never change once the record reaches the
/// reporter. `finished` is never earlier than `started`.
#[derive(Clone, Debug)]
pub struct RunRecord {
    /// The test's own name.
    pub name: String,

    /// The group the test belongs to.
    pub parent: SpecSource,

    /// When execution of this test started.
    pub started: DateTime<Utc>,

    /// When execution of this test finished.
    pub finished: DateTime<Utc>,

    /// The status the run finished with. Set exactly once.
    pub status: RunStatus,

    /// Custom metadata attached during the run, in insertion order.
    pub properties: IndexMap<String, String>,

    /// Optional data payload associated with the test. Scalar strings and
    /// numbers render as-is; structured values render as serialized JSON.
    pub data: Option<serde_json::Value>,

    /// Log entries captured during the run, in order.
    pub log_entries: Vec<LogEntry>,

    /// Failure causes, present when the status is [`RunStatus::Failed`].
    pub failures: Vec<FailureCause>,

    /// The error payload, present when the status is [`RunStatus::Error`].
    pub error: Option<ErrorCause>,
}

impl RunRecord {
    /// Creates a new `RunRecord` with no logs, properties or failure data.
    pub fn new(
        name: impl Into<String>,
        parent: SpecSource,
        started: DateTime<Utc>,
        finished: DateTime<Utc>,
        status: RunStatus,
    ) -> Self {
        Self {
            name: name.into(),
            parent,
            started,
            finished,
            status,
            properties: IndexMap::new(),
            data: None,
            log_entries: vec![],
            failures: vec![],
            error: None,
        }
    }

    /// Adds a custom property.
    pub fn add_property(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets the data payload.
    pub fn set_data(&mut self, data: serde_json::Value) -> &mut Self {
        self.data = Some(data);
        self
    }

    /// Appends a log entry.
    pub fn add_log_entry(&mut self, entry: LogEntry) -> &mut Self {
        self.log_entries.push(entry);
        self
    }

    /// Appends a failure cause.
    pub fn add_failure(&mut self, failure: FailureCause) -> &mut Self {
        self.failures.push(failure);
        self
    }

    /// Sets the error payload.
    pub fn set_error(&mut self, error: ErrorCause) -> &mut Self {
        self.error = Some(error);
        self
    }

    /// The display name used in both the definitions and results sections:
    /// `[<name>] <parent description>`.
    pub fn display_name(&self) -> String {
        format!("[{}] {}", self.name, self.parent.full_description)
    }
}

/// One captured log line.
#[derive(Clone, Debug)]
pub struct LogEntry {
    /// When the line was logged.
    pub timestamp: DateTime<Utc>,

    /// The severity it was logged at.
    pub level: LogLevel,

    /// The logger name that produced it.
    pub source: String,

    /// The message text. May contain arbitrary bytes' worth of rendering;
    /// sanitized at report time.
    pub message: String,
}

impl LogEntry {
    /// Creates a new `LogEntry`.
    pub fn new(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        source: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level,
            source: source.into(),
            message: message.into(),
        }
    }
}

/// Log severity, rendered upcased into the report.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the upcased form used in `<StdOut>` log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// One failed expectation: what was checked and how it came out.
#[derive(Clone, Debug)]
pub struct FailureCause {
    /// What the assertion was checking.
    pub description: String,

    /// The observed mismatch.
    pub message: String,
}

impl FailureCause {
    /// Creates a new `FailureCause`.
    pub fn new(description: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            message: message.into(),
        }
    }
}

/// An unexpected error raised during the run.
#[derive(Clone, Debug)]
pub struct ErrorCause {
    /// The error message.
    pub message: String,

    /// Stack frames in the order captured at error time, innermost first.
    pub backtrace: Vec<String>,
}

impl ErrorCause {
    /// Creates a new `ErrorCause`.
    pub fn new(message: impl Into<String>, backtrace: Vec<String>) -> Self {
        Self {
            message: message.into(),
            backtrace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(RunStatus::Passed => Outcome::Passed; "passed maps to passed")]
    #[test_case(RunStatus::Failed => Outcome::Failed; "failed maps to failed")]
    #[test_case(RunStatus::Error => Outcome::Failed; "error also maps to failed")]
    #[test_case(RunStatus::Skipped => Outcome::Skipped; "skipped maps to skipped")]
    fn outcome_classification(status: RunStatus) -> Outcome {
        status.outcome()
    }

    #[test]
    fn outcome_strings_are_exact() {
        assert_eq!(Outcome::Passed.as_str(), "Passed");
        assert_eq!(Outcome::Failed.as_str(), "Failed");
        assert_eq!(Outcome::Skipped.as_str(), "Skipped");
    }

    #[test]
    fn properties_keep_insertion_order() {
        let parent = SpecSource::new("calc", "Calculator", "specs/calc.spec");
        let now = Utc::now();
        let mut record = RunRecord::new("add", parent, now, now, RunStatus::Passed);
        record
            .add_property("zeta", "1")
            .add_property("alpha", "2")
            .add_property("mid", "3");
        let keys: Vec<_> = record.properties.keys().cloned().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
