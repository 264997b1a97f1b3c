// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a [`TestRun`].

use crate::{
    report::{TEAM_TEST_NAMESPACE, TIMESTAMP_FORMAT},
    ErrorInfo, SerializeError, TestOutput, TestRun, Times, UnitTest, UnitTestResult,
};
use chrono::{DateTime, Utc};
use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use std::io;

static TEST_RUN_TAG: &str = "TestRun";
static TIMES_TAG: &str = "Times";
static RESULT_SUMMARY_TAG: &str = "ResultSummary";
static RESULT_FILES_TAG: &str = "ResultFiles";
static RESULT_FILE_TAG: &str = "ResultFile";
static TEST_DEFINITIONS_TAG: &str = "TestDefinitions";
static UNIT_TEST_TAG: &str = "UnitTest";
static EXECUTION_TAG: &str = "Execution";
static RESULTS_TAG: &str = "Results";
static UNIT_TEST_RESULT_TAG: &str = "UnitTestResult";
static OUTPUT_TAG: &str = "Output";
static STD_OUT_TAG: &str = "StdOut";
static ERROR_INFO_TAG: &str = "ErrorInfo";
static MESSAGE_TAG: &str = "Message";
static STACK_TRACE_TAG: &str = "StackTrace";

pub(crate) fn serialize_test_run(
    run: &TestRun,
    writer: impl io::Write,
) -> Result<(), SerializeError> {
    let mut writer = Writer::new(writer);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_test_run_impl(run, &mut writer)
}

fn serialize_test_run_impl(
    run: &TestRun,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let TestRun {
        times,
        result_files,
        tests,
    } = run;

    let mut run_tag = BytesStart::new(TEST_RUN_TAG);
    run_tag.push_attribute(("xmlns", TEAM_TEST_NAMESPACE));
    writer.write_event(Event::Start(run_tag))?;

    serialize_times(times, writer)?;
    serialize_result_summary(result_files, writer)?;

    serialize_start_tag(TEST_DEFINITIONS_TAG, writer)?;
    for test in tests {
        serialize_definition(test, writer)?;
    }
    serialize_end_tag(TEST_DEFINITIONS_TAG, writer)?;

    serialize_start_tag(RESULTS_TAG, writer)?;
    for test in tests {
        serialize_result(test, writer)?;
    }
    serialize_end_tag(RESULTS_TAG, writer)?;

    serialize_end_tag(TEST_RUN_TAG, writer)?;
    Ok(())
}

fn serialize_times(times: &Times, writer: &mut Writer<impl io::Write>) -> Result<(), SerializeError> {
    let mut times_tag = BytesStart::new(TIMES_TAG);
    times_tag.extend_attributes([
        ("start", serialize_timestamp(times.start).as_str()),
        ("finish", serialize_timestamp(times.finish).as_str()),
    ]);
    writer.write_event(Event::Empty(times_tag))?;
    Ok(())
}

fn serialize_result_summary(
    result_files: &[crate::XmlString],
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    serialize_start_tag(RESULT_SUMMARY_TAG, writer)?;
    serialize_start_tag(RESULT_FILES_TAG, writer)?;
    for path in result_files {
        let mut file_tag = BytesStart::new(RESULT_FILE_TAG);
        file_tag.push_attribute(("path", path.as_str()));
        writer.write_event(Event::Empty(file_tag))?;
    }
    serialize_end_tag(RESULT_FILES_TAG, writer)?;
    serialize_end_tag(RESULT_SUMMARY_TAG, writer)?;
    Ok(())
}

fn serialize_definition(
    test: &UnitTest,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let mut test_tag = BytesStart::new(UNIT_TEST_TAG);
    test_tag.extend_attributes([
        ("name", test.name.as_str()),
        ("storage", test.storage.as_str()),
        ("id", test.test_id.to_string().as_str()),
    ]);
    writer.write_event(Event::Start(test_tag))?;

    let mut execution_tag = BytesStart::new(EXECUTION_TAG);
    execution_tag.push_attribute(("id", test.execution_id.to_string().as_str()));
    writer.write_event(Event::Empty(execution_tag))?;

    serialize_end_tag(UNIT_TEST_TAG, writer)?;
    Ok(())
}

fn serialize_result(
    test: &UnitTest,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let UnitTestResult {
        computer_name,
        start_time,
        end_time,
        outcome,
        output,
    } = &test.result;

    let mut result_tag = BytesStart::new(UNIT_TEST_RESULT_TAG);
    result_tag.extend_attributes([
        ("executionId", test.execution_id.to_string().as_str()),
        ("testId", test.test_id.to_string().as_str()),
        ("testName", test.name.as_str()),
    ]);
    if let Some(computer_name) = computer_name {
        result_tag.push_attribute(("computerName", computer_name.as_str()));
    }
    if let (Some(start), Some(end)) = (start_time, end_time) {
        result_tag.push_attribute(("duration", serialize_duration(*start, *end).as_str()));
    }
    if let Some(start) = start_time {
        result_tag.push_attribute(("startTime", serialize_timestamp(*start).as_str()));
    }
    if let Some(end) = end_time {
        result_tag.push_attribute(("endTime", serialize_timestamp(*end).as_str()));
    }
    result_tag.push_attribute(("outcome", outcome.as_str()));

    match output {
        Some(output) => {
            writer.write_event(Event::Start(result_tag))?;
            serialize_output(output, writer)?;
            serialize_end_tag(UNIT_TEST_RESULT_TAG, writer)?;
        }
        None => {
            writer.write_event(Event::Empty(result_tag))?;
        }
    }
    Ok(())
}

fn serialize_output(
    output: &TestOutput,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let TestOutput {
        std_out,
        error_info,
    } = output;

    serialize_start_tag(OUTPUT_TAG, writer)?;

    if let Some(std_out) = std_out {
        serialize_start_tag(STD_OUT_TAG, writer)?;
        writer.write_event(Event::Text(BytesText::new(std_out.as_str())))?;
        serialize_end_tag(STD_OUT_TAG, writer)?;
    }

    if let Some(error_info) = error_info {
        serialize_error_info(error_info, writer)?;
    }

    serialize_end_tag(OUTPUT_TAG, writer)?;
    Ok(())
}

fn serialize_error_info(
    error_info: &ErrorInfo,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    serialize_start_tag(ERROR_INFO_TAG, writer)?;

    serialize_start_tag(MESSAGE_TAG, writer)?;
    writer.write_event(Event::Text(BytesText::new(error_info.message.as_str())))?;
    serialize_end_tag(MESSAGE_TAG, writer)?;

    if let Some(stack_trace) = &error_info.stack_trace {
        serialize_start_tag(STACK_TRACE_TAG, writer)?;
        writer.write_event(Event::Text(BytesText::new(stack_trace.as_str())))?;
        serialize_end_tag(STACK_TRACE_TAG, writer)?;
    }

    serialize_end_tag(ERROR_INFO_TAG, writer)?;
    Ok(())
}

fn serialize_start_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let tag = BytesStart::new(tag_name);
    writer.write_event(Event::Start(tag))?;
    Ok(())
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> Result<(), SerializeError> {
    let end_tag = BytesEnd::new(tag_name);
    writer.write_event(Event::End(end_tag))?;
    Ok(())
}

fn serialize_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

// `HH:MM:SS.mmm`, with hours free to exceed 24.
fn serialize_duration(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let millis = (end - start).num_milliseconds().max(0);
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        millis / 3_600_000,
        millis / 60_000 % 60,
        millis / 1_000 % 60,
        millis % 1_000
    )
}
