// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembles a finished batch of run records into a TRX document.

use crate::{
    assign_identities, narrate, writer::write_report, IdSource, ReportEnv, RunRecord,
    TestIdentity, VstestConfig, WriteReportError,
};
use camino::{Utf8Path, Utf8PathBuf};
use quick_trx::{
    ErrorInfo, Outcome, TestOutput, TestRun, Times, UnitTest, UnitTestResult, TIMESTAMP_FORMAT,
};
use swrite::{swriteln, SWrite};

/// Builds TRX reports from finished spectre run batches.
///
/// A pure, single-threaded transform: one linear pass per batch, no retries,
/// no background work. The only external resource it touches is the output
/// directory, which it lists for attachments and writes the final file into.
#[derive(Clone, Debug)]
pub struct VstestReporter<'cfg> {
    config: &'cfg VstestConfig,
    env: ReportEnv,
}

impl<'cfg> VstestReporter<'cfg> {
    /// Creates a new reporter for the given config and ambient values.
    pub fn new(config: &'cfg VstestConfig, env: ReportEnv) -> Self {
        Self { config, env }
    }

    /// Assembles and writes the report for one run, returning the path of
    /// the written file.
    ///
    /// Callers invoke this exactly once per test-run execution; reports
    /// generated within the same second share a filename.
    pub fn report(
        &self,
        records: &[RunRecord],
        ids: &mut dyn IdSource,
    ) -> Result<Utf8PathBuf, WriteReportError> {
        let run = self.assemble(records, ids);
        write_report(&run, self.config.out_path(), self.env.now)
    }

    /// Assembles the document tree for one run without writing it.
    ///
    /// The run span is taken from the first record's start and the last
    /// record's finish in input order; callers pass records covering the
    /// full span. An empty batch degrades to a zero-length span at "now".
    pub fn assemble(&self, records: &[RunRecord], ids: &mut dyn IdSource) -> TestRun {
        let times = match (records.first(), records.last()) {
            (Some(first), Some(last)) => Times::new(first.started, last.finished),
            _ => Times::new(self.env.now, self.env.now),
        };

        let mut run = TestRun::new(times);
        self.collect_result_files(&mut run);
        run.add_tests(
            assign_identities(records, ids)
                .into_iter()
                .map(|identity| self.build_test(identity)),
        );
        run
    }

    /// Attachment discovery: the configured log file if it exists, then
    /// whatever the output directory contains at this moment. Racing writers
    /// are tolerated, not guarded against; an unreadable directory simply
    /// contributes nothing.
    fn collect_result_files(&self, run: &mut TestRun) {
        if let Some(log_file) = self.config.log_file() {
            if log_file.exists() {
                run.add_result_file(absolute(log_file).as_str());
            }
        }

        match self.config.out_path().read_dir_utf8() {
            Ok(entries) => {
                let mut paths: Vec<Utf8PathBuf> = entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.into_path())
                    .collect();
                paths.sort();
                for path in paths {
                    run.add_result_file(absolute(&path).as_str());
                }
            }
            Err(error) => {
                tracing::debug!(%error, "output directory not listable, skipping attachments");
            }
        }
    }

    fn build_test(&self, identity: TestIdentity<'_>) -> UnitTest {
        let record = identity.record;

        let mut result = UnitTestResult::new(record.status.outcome());
        result
            .set_computer_name(&self.env.computer_name)
            .set_start_time(record.started)
            .set_end_time(record.finished);

        if wants_output(record) {
            result.set_output(build_output(record));
        }

        UnitTest::new(
            identity.test_id,
            identity.execution_id,
            record.display_name(),
            record.parent.file.as_str(),
            result,
        )
    }
}

/// The `<Output>` emission rule: a result carries an `<Output>` block when
/// the record produced log entries, or when it did not pass.
///
/// The second half of the rule is what keeps `<ErrorInfo>` for failed runs
/// that logged nothing.
pub fn wants_output(record: &RunRecord) -> bool {
    !record.log_entries.is_empty() || record.status.is_unsuccessful()
}

fn build_output(record: &RunRecord) -> TestOutput {
    let mut std_out = String::new();
    for (key, value) in &record.properties {
        swriteln!(std_out, "{key}: {value}");
    }
    if let Some(data) = &record.data {
        swriteln!(std_out, "data: {}", render_data(data));
    }
    for entry in &record.log_entries {
        swriteln!(
            std_out,
            "{} {} -- {}: {}",
            entry.timestamp.format(TIMESTAMP_FORMAT),
            entry.level.as_str(),
            entry.source,
            entry.message
        );
    }

    let mut output = TestOutput::new();
    output.set_std_out(std_out);

    if record.status.outcome() == Outcome::Failed {
        let narrative = narrate::describe(record);
        let mut error_info = ErrorInfo::new(narrative.message);
        if let Some(stack_trace) = narrative.stack_trace {
            error_info.set_stack_trace(stack_trace);
        }
        output.set_error_info(error_info);
    }

    output
}

// Scalars render bare; everything else renders as serialized JSON.
fn render_data(data: &serde_json::Value) -> String {
    match data {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn absolute(path: &Utf8Path) -> Utf8PathBuf {
    camino::absolute_utf8(path).unwrap_or_else(|_| path.to_owned())
}
