// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{serialize::serialize_test_run, SerializeError, XmlString};
use chrono::{DateTime, Utc};
use std::io;
use uuid::Uuid;

/// The XML namespace every TRX document is rooted in.
pub static TEAM_TEST_NAMESPACE: &str =
    "http://microsoft.com/schemas/VisualStudio/TeamTest/2010";

/// The timestamp format used for every attribute carrying a point in time:
/// `YYYY-MM-DDTHH:MM:SS.mmm`, implicit UTC.
pub static TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// The root element of a TRX report.
///
/// The tree is fully typed; nothing is concatenated by hand. Sections are
/// serialized in the fixed order downstream parsers depend on: `Times`,
/// `ResultSummary/ResultFiles`, `TestDefinitions`, `Results`. Each
/// [`UnitTest`] carries both its definition half and its result half, so the
/// two sections always agree on counts and identifiers by construction.
#[derive(Clone, Debug)]
pub struct TestRun {
    /// The overall span of the run.
    pub times: Times,

    /// File attachments listed in the result summary.
    pub result_files: Vec<XmlString>,

    /// The tests in this run, in definition order.
    pub tests: Vec<UnitTest>,
}

impl TestRun {
    /// Creates a new `TestRun` covering the given span.
    pub fn new(times: Times) -> Self {
        Self {
            times,
            result_files: vec![],
            tests: vec![],
        }
    }

    /// Adds a file attachment to the result summary.
    pub fn add_result_file(&mut self, path: impl Into<XmlString>) -> &mut Self {
        self.result_files.push(path.into());
        self
    }

    /// Adds a test to this run.
    pub fn add_test(&mut self, test: UnitTest) -> &mut Self {
        self.tests.push(test);
        self
    }

    /// Adds several tests to this run.
    pub fn add_tests(&mut self, tests: impl IntoIterator<Item = UnitTest>) -> &mut Self {
        for test in tests {
            self.add_test(test);
        }
        self
    }

    /// Serialize this report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_test_run(self, writer)
    }

    /// Serialize this report to a string.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        // The writer only ever emits UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// The `Times` element: the span covered by the run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Times {
    /// When the run started.
    pub start: DateTime<Utc>,

    /// When the run finished.
    pub finish: DateTime<Utc>,
}

impl Times {
    /// Creates a new `Times` span.
    pub fn new(start: DateTime<Utc>, finish: DateTime<Utc>) -> Self {
        Self { start, finish }
    }
}

/// One test in the run: the `UnitTest` definition entry together with its
/// `UnitTestResult`.
///
/// The identity pair is generated once per test and serialized into both
/// sections, which is what makes cross-section lookups unambiguous.
#[derive(Clone, Debug)]
pub struct UnitTest {
    /// The identifier correlating the definition with its result.
    pub test_id: Uuid,

    /// The identifier of this particular execution.
    pub execution_id: Uuid,

    /// The display name, used as `name` in the definition and `testName` in
    /// the result.
    pub name: XmlString,

    /// The source file the test was loaded from.
    pub storage: XmlString,

    /// The outcome of executing this test.
    pub result: UnitTestResult,
}

impl UnitTest {
    /// Creates a new `UnitTest`.
    pub fn new(
        test_id: Uuid,
        execution_id: Uuid,
        name: impl Into<XmlString>,
        storage: impl Into<XmlString>,
        result: UnitTestResult,
    ) -> Self {
        Self {
            test_id,
            execution_id,
            name: name.into(),
            storage: storage.into(),
            result,
        }
    }
}

/// The result half of a [`UnitTest`].
#[derive(Clone, Debug)]
pub struct UnitTestResult {
    /// The machine the test ran on.
    pub computer_name: Option<XmlString>,

    /// When this test started.
    pub start_time: Option<DateTime<Utc>>,

    /// When this test finished. The duration attribute is derived from the
    /// two timestamps at serialization time.
    pub end_time: Option<DateTime<Utc>>,

    /// The three-state outcome.
    pub outcome: Outcome,

    /// Captured output, if any.
    pub output: Option<TestOutput>,
}

impl UnitTestResult {
    /// Creates a new `UnitTestResult` with the given outcome.
    pub fn new(outcome: Outcome) -> Self {
        Self {
            computer_name: None,
            start_time: None,
            end_time: None,
            outcome,
            output: None,
        }
    }

    /// Sets the computer name.
    pub fn set_computer_name(&mut self, computer_name: impl Into<XmlString>) -> &mut Self {
        self.computer_name = Some(computer_name.into());
        self
    }

    /// Sets the start timestamp.
    pub fn set_start_time(&mut self, start_time: DateTime<Utc>) -> &mut Self {
        self.start_time = Some(start_time);
        self
    }

    /// Sets the end timestamp.
    pub fn set_end_time(&mut self, end_time: DateTime<Utc>) -> &mut Self {
        self.end_time = Some(end_time);
        self
    }

    /// Sets the captured output.
    pub fn set_output(&mut self, output: TestOutput) -> &mut Self {
        self.output = Some(output);
        self
    }
}

/// The three-state outcome required by the TRX schema.
///
/// The schema does not distinguish assertion failures from unexpected
/// errors; both surface as `Failed`, and the distinction lives in the
/// error-info payload instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// The test passed.
    Passed,

    /// The test failed or errored.
    Failed,

    /// The test was not run.
    Skipped,
}

impl Outcome {
    /// Returns the exact string serialized into the `outcome` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Passed => "Passed",
            Outcome::Failed => "Failed",
            Outcome::Skipped => "Skipped",
        }
    }
}

/// The `<Output>` block of a result.
#[derive(Clone, Debug, Default)]
pub struct TestOutput {
    /// Text rendered into `<StdOut>`.
    pub std_out: Option<XmlString>,

    /// Failure details, present when the outcome is `Failed`.
    pub error_info: Option<ErrorInfo>,
}

impl TestOutput {
    /// Creates a new, empty `TestOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the standard output text.
    pub fn set_std_out(&mut self, std_out: impl Into<XmlString>) -> &mut Self {
        self.std_out = Some(std_out.into());
        self
    }

    /// Sets the error information.
    pub fn set_error_info(&mut self, error_info: ErrorInfo) -> &mut Self {
        self.error_info = Some(error_info);
        self
    }
}

/// The `<ErrorInfo>` block: why a test did not pass.
#[derive(Clone, Debug)]
pub struct ErrorInfo {
    /// The failure or error message.
    pub message: XmlString,

    /// The stack trace, present only for unexpected errors.
    pub stack_trace: Option<XmlString>,
}

impl ErrorInfo {
    /// Creates a new `ErrorInfo` with the given message.
    pub fn new(message: impl Into<XmlString>) -> Self {
        Self {
            message: message.into(),
            stack_trace: None,
        }
    }

    /// Sets the stack trace.
    pub fn set_stack_trace(&mut self, stack_trace: impl Into<XmlString>) -> &mut Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }
}
