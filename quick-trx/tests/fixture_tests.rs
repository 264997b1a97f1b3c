// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pretty_assertions::assert_eq;
use quick_trx::{ErrorInfo, Outcome, TestOutput, TestRun, Times, UnitTest, UnitTestResult};
use uuid::Uuid;

fn run_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

#[test]
fn basic_report_serializes_exactly() {
    let report = basic_report();
    let actual = report.to_string().expect("serializing basic report succeeds");

    let expected = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<TestRun xmlns="http://microsoft.com/schemas/VisualStudio/TeamTest/2010">"#,
        r#"<Times start="2024-03-01T10:00:00.000" finish="2024-03-01T10:00:06.500"/>"#,
        r#"<ResultSummary><ResultFiles>"#,
        r#"<ResultFile path="/var/log/spectre.log"/>"#,
        r#"</ResultFiles></ResultSummary>"#,
        r#"<TestDefinitions>"#,
        r#"<UnitTest name="[add] Calculator adds" storage="specs/calc.spec" id="00000000-0000-0000-0000-000000000011">"#,
        r#"<Execution id="00000000-0000-0000-0000-000000000012"/>"#,
        r#"</UnitTest>"#,
        r#"<UnitTest name="[sum] Calculator &lt;checks&gt; &amp; &quot;signs&quot;" storage="specs/calc.spec" id="00000000-0000-0000-0000-000000000021">"#,
        r#"<Execution id="00000000-0000-0000-0000-000000000022"/>"#,
        r#"</UnitTest>"#,
        r#"</TestDefinitions>"#,
        r#"<Results>"#,
        r#"<UnitTestResult executionId="00000000-0000-0000-0000-000000000012" testId="00000000-0000-0000-0000-000000000011" testName="[add] Calculator adds" computerName="test-host" duration="00:00:01.250" startTime="2024-03-01T10:00:00.000" endTime="2024-03-01T10:00:01.250" outcome="Passed"/>"#,
        r#"<UnitTestResult executionId="00000000-0000-0000-0000-000000000022" testId="00000000-0000-0000-0000-000000000021" testName="[sum] Calculator &lt;checks&gt; &amp; &quot;signs&quot;" computerName="test-host" duration="00:00:05.250" startTime="2024-03-01T10:00:01.250" endTime="2024-03-01T10:00:06.500" outcome="Failed">"#,
        r#"<Output>"#,
        "<StdOut>result: 5\n</StdOut>",
        r#"<ErrorInfo><Message>sum check, but expected 4 got 5 </Message></ErrorInfo>"#,
        r#"</Output>"#,
        r#"</UnitTestResult>"#,
        r#"</Results>"#,
        r#"</TestRun>"#,
    );
    assert_eq!(actual, expected);
}

fn basic_report() -> TestRun {
    let start = run_start();
    let mid = start + TimeDelta::milliseconds(1_250);
    let finish = start + TimeDelta::milliseconds(6_500);

    let mut report = TestRun::new(Times::new(start, finish));
    report.add_result_file("/var/log/spectre.log");

    let mut passed = UnitTestResult::new(Outcome::Passed);
    passed
        .set_computer_name("test-host")
        .set_start_time(start)
        .set_end_time(mid);
    report.add_test(UnitTest::new(
        Uuid::from_u128(0x11),
        Uuid::from_u128(0x12),
        "[add] Calculator adds",
        "specs/calc.spec",
        passed,
    ));

    let mut failed = UnitTestResult::new(Outcome::Failed);
    failed
        .set_computer_name("test-host")
        .set_start_time(mid)
        .set_end_time(finish);
    let mut output = TestOutput::new();
    output
        .set_std_out("result: 5\n")
        .set_error_info(ErrorInfo::new("sum check, but expected 4 got 5 "));
    failed.set_output(output);
    report.add_test(UnitTest::new(
        Uuid::from_u128(0x21),
        Uuid::from_u128(0x22),
        "[sum] Calculator <checks> & \"signs\"",
        "specs/calc.spec",
        failed,
    ));

    report
}

#[test]
fn error_info_carries_stack_trace_in_order() {
    let start = run_start();
    let mut report = TestRun::new(Times::new(start, start + TimeDelta::seconds(1)));

    let mut result = UnitTestResult::new(Outcome::Failed);
    result
        .set_start_time(start)
        .set_end_time(start + TimeDelta::seconds(1));
    let mut output = TestOutput::new();
    let mut error_info = ErrorInfo::new("nil reference");
    error_info.set_stack_trace("specs/calc.spec:12\nlib/runner.rb:80");
    output.set_error_info(error_info);
    result.set_output(output);
    report.add_test(UnitTest::new(
        Uuid::from_u128(0x31),
        Uuid::from_u128(0x32),
        "[boom] Calculator explodes",
        "specs/calc.spec",
        result,
    ));

    let actual = report.to_string().expect("serialization succeeds");
    assert!(
        actual.contains(concat!(
            "<ErrorInfo><Message>nil reference</Message>",
            "<StackTrace>specs/calc.spec:12\nlib/runner.rb:80</StackTrace></ErrorInfo>",
        )),
        "stack frames stay newline-joined in captured order: {actual}"
    );
    // No <StdOut> was set, so none is emitted.
    assert!(!actual.contains("<StdOut>"), "unexpected StdOut: {actual}");
}

#[test]
fn reserved_characters_never_break_well_formedness() {
    let start = run_start();
    let mut report = TestRun::new(Times::new(start, start));
    report.add_result_file("/out/report's <final> & \"best\".txt");

    let mut result = UnitTestResult::new(Outcome::Failed);
    let mut output = TestOutput::new();
    output
        .set_std_out("a < b && c > d\n")
        .set_error_info(ErrorInfo::new("it doesn't hold: 'x' < 'y'"));
    result.set_output(output);
    report.add_test(UnitTest::new(
        Uuid::from_u128(0x41),
        Uuid::from_u128(0x42),
        "<name>",
        "specs/\"quoted\".spec",
        result,
    ));

    let actual = report.to_string().expect("serialization succeeds");
    assert!(actual.contains(r#"path="/out/report&apos;s &lt;final&gt; &amp; &quot;best&quot;.txt""#));
    assert!(actual.contains(r#"name="&lt;name&gt;""#));
    assert!(actual.contains(r#"storage="specs/&quot;quoted&quot;.spec""#));
    assert!(actual.contains("<StdOut>a &lt; b &amp;&amp; c &gt; d\n</StdOut>"));
    assert!(actual.contains("<Message>it doesn&apos;t hold: &apos;x&apos; &lt; &apos;y&apos;</Message>"));

    // Every raw reserved character in the document belongs to markup, not data.
    let body = actual
        .strip_prefix(r#"<?xml version="1.0" encoding="UTF-8"?>"#)
        .expect("declaration present");
    assert_eq!(body.matches("<TestRun").count(), 1);
    assert_eq!(body.matches("</TestRun>").count(), 1);
}

#[test]
fn definitions_and_results_sections_stay_paired() {
    let report = basic_report();
    let actual = report.to_string().expect("serialization succeeds");

    assert_eq!(actual.matches("<UnitTest ").count(), 2);
    assert_eq!(actual.matches("<UnitTestResult ").count(), 2);
    for id in ["00000000-0000-0000-0000-000000000011", "00000000-0000-0000-0000-000000000021"] {
        assert_eq!(
            actual.matches(id).count(),
            2,
            "test id appears once per section: {id}"
        );
    }

    // Section order is fixed.
    let times = actual.find("<Times ").unwrap();
    let summary = actual.find("<ResultSummary>").unwrap();
    let definitions = actual.find("<TestDefinitions>").unwrap();
    let results = actual.find("<Results>").unwrap();
    assert!(times < summary && summary < definitions && definitions < results);
}
