// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the command line, capturing stdout through [`OutputWriter`].
//!
//! These live in the library rather than in `tests/` so they can use the test-only
//! [`OutputWriter::Captured`] variant.

use crate::{ExpectedError, WptReportApp};
use clap::{Parser, error::ErrorKind};
use indoc::indoc;
use pretty_assertions::assert_eq;
use wptreport_metadata::ReportExitCode;


use fixtures::*;

#[test]
fn summary_human() {
    let logs = TempLogs::new();
    let stdout = run(&["summary", &logs.log_arg("stable"), &logs.log_arg("nightly")])
        .expect("summary succeeds");
    assert_eq!(
        stdout,
        indoc! {"
            stable: 3 ran, 3 passed, 0 failed
            nightly: 3 ran, 1 passed, 2 failed
        "}
    );
}

#[test]
fn results_human() {
    let logs = TempLogs::new();
    let stdout = run(&["results", &logs.log_arg("stable"), &logs.log_arg("nightly")])
        .expect("results succeeds");
    assert_eq!(
        stdout,
        indoc! {"
            stable  nightly test
            OK      OK      /a.html
            PASS    TIMEOUT /b.html
        "}
    );

    let stdout = run(&[
        "results",
        "--verbose",
        &logs.log_arg("stable"),
        &logs.log_arg("nightly"),
    ])
    .expect("results succeeds");
    assert_eq!(
        stdout,
        indoc! {r#"
            run info for stable: {"product":"stable"}
            stable  nightly test
            OK      OK      /a.html
            PASS    FAIL      first
            PASS    TIMEOUT /b.html
        "#}
    );
}

#[test]
fn results_json() {
    let logs = TempLogs::new();
    let stdout = run(&[
        "results",
        "--message-format",
        "json",
        &logs.log_arg("stable"),
        &logs.log_arg("nightly"),
    ])
    .expect("results succeeds");

    let value: serde_json::Value = serde_json::from_str(&stdout).expect("output is JSON");
    assert_eq!(value["products"], serde_json::json!(["stable", "nightly"]));
    assert_eq!(value["results"][0]["id"], "/a.html");
    assert_eq!(value["results"][1]["test"], serde_json::json!(["PASS", "TIMEOUT"]));
}

#[test]
fn failures_human() {
    let logs = TempLogs::new();
    let stdout = run(&[
        "failures",
        "--target",
        "nightly",
        &logs.log_arg("stable"),
        &logs.log_arg("nightly"),
    ])
    .expect("failures succeeds");
    assert_eq!(
        stdout,
        indoc! {"
               FAIL /a.html > first
            TIMEOUT /b.html
            ------------
            nightly: 2 of 3 results did not pass
        "}
    );
}

#[test]
fn failures_verbose() {
    let logs = TempLogs::new();
    let stdout = run(&[
        "failures",
        "--verbose",
        "--target",
        "nightly",
        &logs.log_arg("nightly"),
    ])
    .expect("failures succeeds");
    assert_eq!(
        stdout,
        indoc! {"
               FAIL /a.html > first
            TIMEOUT /b.html
                    test timed out
            ------------
            nightly: 2 of 3 results did not pass
        "}
    );

    let stdout = run(&[
        "failures",
        "-T",
        "json",
        "--target",
        "nightly",
        &logs.log_arg("nightly"),
    ])
    .expect("failures succeeds");
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("output is JSON");
    assert_eq!(value["failures"][0]["message"], serde_json::Value::Null);
    assert_eq!(value["failures"][1]["message"], "test timed out");
}

#[test]
fn regressions_json() {
    let logs = TempLogs::new();
    let by_name = run(&[
        "regressions",
        "-T",
        "json",
        "--base",
        "stable",
        "--target",
        "nightly",
        &logs.log_arg("stable"),
        &logs.log_arg("nightly"),
    ])
    .expect("regressions succeeds");
    let by_pair = run(&[
        "regressions",
        "-T",
        "json",
        "--compare",
        "stable:nightly",
        &logs.log_arg("stable"),
        &logs.log_arg("nightly"),
    ])
    .expect("regressions succeeds");
    assert_eq!(by_name, by_pair);

    let value: serde_json::Value = serde_json::from_str(&by_name).expect("output is JSON");
    assert_eq!(
        value,
        serde_json::json!({
            "base": "stable",
            "target": "nightly",
            "total": 3,
            "unranked": 0,
            "regressions": [
                {
                    "test": "/a.html",
                    "subtest": "first",
                    "base_status": "PASS",
                    "target_status": "FAIL",
                    "message": null,
                },
                {
                    "test": "/b.html",
                    "subtest": null,
                    "base_status": "PASS",
                    "target_status": "TIMEOUT",
                    "message": "test timed out",
                },
            ],
        })
    );
}

#[test]
fn unranked_status_profile() {
    let logs = TempLogs::new();
    let config = logs.config_args(indoc! {r#"
        [profile.strict]
        unranked-status = "error"
    "#});

    let stdout = run(&[
        config[0].as_str(),
        config[1].as_str(),
        "regressions",
        "--compare",
        "stable:beta",
        &logs.log_arg("stable"),
        &logs.log_arg("beta"),
    ])
    .expect("unranked statuses are excluded by default");
    assert_eq!(
        stdout,
        indoc! {"
            ------------
            stable -> beta: 0 of 1 compared results regressed (1 could not be ranked)
        "}
    );

    let err = run(&[
        config[0].as_str(),
        config[1].as_str(),
        "--profile",
        "strict",
        "regressions",
        "--compare",
        "stable:beta",
        &logs.log_arg("stable"),
        &logs.log_arg("beta"),
    ])
    .expect_err("strict profile rejects unranked statuses");
    assert_eq!(err.process_exit_code(), ReportExitCode::UNRANKED_STATUS);
}

#[test]
fn exit_codes() {
    let logs = TempLogs::new();

    let err = run(&[
        "failures",
        "--target",
        "beta",
        &logs.log_arg("stable"),
        &logs.log_arg("nightly"),
    ])
    .expect_err("beta wasn't loaded");
    assert!(
        matches!(err, ExpectedError::UnknownProduct { .. }),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.process_exit_code(), ReportExitCode::UNKNOWN_PRODUCT);

    let err = run(&[
        "regressions",
        "--compare",
        "stable:beta",
        &logs.log_arg("stable"),
    ])
    .expect_err("beta wasn't loaded");
    assert_eq!(err.process_exit_code(), ReportExitCode::UNKNOWN_PRODUCT);

    let err = run(&["summary", &logs.log_arg("stable"), &logs.log_arg("missing")])
        .expect_err("missing log");
    assert_eq!(err.process_exit_code(), ReportExitCode::INGEST_FAILED);

    let err = run(&["summary", &logs.log_arg("stable"), &logs.log_arg("stable")])
        .expect_err("duplicate product");
    assert_eq!(err.process_exit_code(), ReportExitCode::SETUP_ERROR);

    let err = run(&[
        "--profile",
        "no-such-profile",
        "summary",
        &logs.log_arg("stable"),
    ])
    .expect_err("unknown profile");
    assert!(
        matches!(err, ExpectedError::ProfileNotFound { .. }),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.process_exit_code(), ReportExitCode::SETUP_ERROR);

    let config = logs.config_args(indoc! {r#"
        [profile.default]
        unranked-status = "sometimes"
    "#});
    let err = run(&[
        config[0].as_str(),
        config[1].as_str(),
        "summary",
        &logs.log_arg("stable"),
    ])
    .expect_err("invalid config");
    assert!(
        matches!(err, ExpectedError::ConfigParseError { .. }),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.process_exit_code(), ReportExitCode::SETUP_ERROR);
}

#[test]
fn argument_errors() {
    let parse = |args: &[&str]| {
        WptReportApp::try_parse_from(std::iter::once("wptreport").chain(args.iter().copied()))
            .map(|_| ())
            .map_err(|err| err.kind())
    };

    assert_eq!(parse(&["summary", "stable:stable.json"]), Ok(()));
    assert_eq!(
        parse(&["summary"]),
        Err(ErrorKind::MissingRequiredArgument)
    );
    assert_eq!(
        parse(&["summary", "stable.json"]),
        Err(ErrorKind::ValueValidation)
    );
    assert_eq!(
        parse(&["failures", "stable:stable.json"]),
        Err(ErrorKind::MissingRequiredArgument)
    );
    assert_eq!(
        parse(&["regressions", "--base", "a", "a:a.json"]),
        Err(ErrorKind::MissingRequiredArgument)
    );
    assert_eq!(
        parse(&["regressions", "--compare", "a:b", "--base", "a", "a:a.json"]),
        Err(ErrorKind::ArgumentConflict)
    );
    assert_eq!(
        parse(&["regressions", "--compare", "ab", "a:a.json"]),
        Err(ErrorKind::ValueValidation)
    );
    assert_eq!(
        parse(&["regressions", "--compare", "a:b", "a:a.json", "b:b.json"]),
        Ok(())
    );
}
