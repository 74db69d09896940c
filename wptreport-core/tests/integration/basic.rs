// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use color_eyre::eyre::{Result, bail, ensure};
use indoc::indoc;
use pretty_assertions::assert_eq;
use wptreport_core::{
    aggregator::{ResultAggregator, aggregate},
    analyzer::{AnalysisOptions, Analyzer, Failure, ProductSummary, Regression},
    config::ReportConfig,
    errors::{
        AggregateError, FindRegressionsError, IngestErrorKind, ProductListError, ReadEventError,
    },
    product::{ProductList, ProductLog},
    reporter::{ReportFormat, ReportWriter, SerializableFormat},
    severity::UnrankedStatus,
    status::Status,
};
use wptreport_metadata::TestId;

fn ref_test() -> TestId {
    TestId::composite(["/css/ref.html", "==", "/css/ref-expected.html"])
}

#[test]
fn aggregate_two_products() -> Result<()> {
    test_init();

    let dir = LogDir::new()?;
    let logs = [
        dir.write_log("stable", STABLE_LOG)?,
        dir.write_log("nightly", NIGHTLY_LOG)?,
    ];
    let table = aggregate(&logs)?;

    assert_eq!(
        table.products().iter().collect::<Vec<_>>(),
        ["stable", "nightly"]
    );
    let ids: Vec<_> = table.records().map(|record| record.id().clone()).collect();
    assert_eq!(
        ids,
        [
            TestId::path("/dom/a.html"),
            ref_test(),
            TestId::path("/dom/b.html"),
            TestId::path("/dom/c.html"),
        ]
    );

    let record = table.get(&ref_test()).expect("composite test is merged");
    assert_eq!(
        record.test_status().iter().collect::<Vec<_>>(),
        [Some(&Status::PASS), Some(&Status::CRASH)]
    );

    let run_info = table.run_info(0).expect("stable reported run info");
    assert_eq!(run_info.get("product"), Some(&"stable".into()));

    Ok(())
}

#[test]
fn analyze_two_products() -> Result<()> {
    test_init();

    let dir = LogDir::new()?;
    let logs = [
        dir.write_log("stable", STABLE_LOG)?,
        dir.write_log("nightly", NIGHTLY_LOG)?,
    ];
    let table = aggregate(&logs)?;
    let analyzer = Analyzer::new(&table, AnalysisOptions::default());

    let summary = analyzer.summarize();
    assert_eq!(
        summary.get("stable"),
        Some(&ProductSummary { ran: 5, passed: 4 })
    );
    assert_eq!(
        summary.get("nightly"),
        Some(&ProductSummary { ran: 7, passed: 3 })
    );

    let failures = analyzer.find_failures("nightly")?;
    assert_eq!(failures.total, 7);
    assert_eq!(
        failures.failures,
        [
            Failure {
                test: TestId::path("/dom/a.html"),
                subtest: Some("appendChild works".into()),
                status: Status::FAIL,
                message: Some("expected 1, got 2".to_owned()),
            },
            Failure {
                test: ref_test(),
                subtest: None,
                status: Status::CRASH,
                message: None,
            },
            Failure {
                test: TestId::path("/dom/c.html"),
                subtest: None,
                status: Status::SKIP,
                message: None,
            },
            Failure {
                test: TestId::path("/dom/c.html"),
                subtest: Some("only in nightly".into()),
                status: Status::SKIP,
                message: None,
            },
        ]
    );

    let regressions = analyzer.find_regressions("stable", "nightly")?;
    assert_eq!(regressions.total, 5);
    assert_eq!(regressions.unranked, 0);
    assert_eq!(
        regressions.regressions,
        [
            Regression {
                test: TestId::path("/dom/a.html"),
                subtest: Some("appendChild works".into()),
                base_status: Status::PASS,
                target_status: Status::FAIL,
                message: Some("expected 1, got 2".to_owned()),
            },
            Regression {
                test: ref_test(),
                subtest: None,
                base_status: Status::PASS,
                target_status: Status::CRASH,
                message: None,
            },
        ]
    );

    let reverse = analyzer.find_regressions("nightly", "stable")?;
    assert_eq!(reverse.total, 5);
    assert_eq!(
        reverse.regressions,
        [Regression {
            test: TestId::path("/dom/b.html"),
            subtest: None,
            base_status: Status::PASS,
            target_status: Status::FAIL,
            message: Some("assertion failed".to_owned()),
        }]
    );

    Ok(())
}

#[test]
fn unranked_status_policy_from_config() -> Result<()> {
    test_init();

    let dir = LogDir::new()?;
    let beta_log = indoc! {r#"
        {"action": "test_end", "test": "/dom/c.html", "status": "PASS"}
    "#};
    let logs = [
        dir.write_log("nightly", NIGHTLY_LOG)?,
        dir.write_log("beta", beta_log)?,
    ];
    let table = aggregate(&logs)?;

    dir.write_file(
        ReportConfig::CONFIG_PATH,
        indoc! {r#"
            [profile.ci]
            unranked-status = "error"
        "#},
    )?;
    let config = ReportConfig::from_sources(dir.path(), None)?;

    let default = config.profile(ReportConfig::DEFAULT_PROFILE)?;
    let report = Analyzer::new(&table, default.analysis_options())
        .find_regressions("nightly", "beta")?;
    assert_eq!(report.total, 1);
    assert_eq!(report.unranked, 1);
    ensure!(report.regressions.is_empty(), "unranked pairs never regress");

    let ci = config.profile("ci")?;
    assert_eq!(ci.unranked_status(), UnrankedStatus::Error);
    match Analyzer::new(&table, ci.analysis_options()).find_regressions("nightly", "beta") {
        Err(FindRegressionsError::UnrankedStatus(err)) => {
            assert_eq!(err.test(), &TestId::path("/dom/c.html"));
            assert_eq!(err.subtest(), None);
        }
        other => bail!("expected unranked status error, got {other:?}"),
    }

    Ok(())
}

#[test]
fn ingest_errors() -> Result<()> {
    test_init();

    let dir = LogDir::new()?;
    let stable = dir.write_log("stable", STABLE_LOG)?;

    let missing = ProductLog::new("missing", dir.path().join("does-not-exist.json"));
    match aggregate(&[stable.clone(), missing]) {
        Err(AggregateError::Ingest(err)) => {
            assert_eq!(err.product(), "missing");
            ensure!(
                matches!(err.kind(), IngestErrorKind::Open { .. }),
                "unexpected error kind: {:?}",
                err.kind()
            );
        }
        other => bail!("expected ingest error, got {other:?}"),
    }

    let broken = dir.write_log(
        "broken",
        indoc! {r#"
            {"action": "test_start", "test": "/x.html"}
            {"action": "test_end", "test": "/x.html"}
        "#},
    )?;
    match aggregate(&[stable.clone(), broken]) {
        Err(AggregateError::Ingest(err)) => match err.kind() {
            IngestErrorKind::Read {
                err: ReadEventError::Malformed(err),
                ..
            } => assert_eq!(err.line(), 2),
            other => bail!("expected malformed event, got {other:?}"),
        },
        other => bail!("expected ingest error, got {other:?}"),
    }

    match aggregate(&[stable.clone(), stable]) {
        Err(AggregateError::ProductList(err)) => {
            assert_eq!(
                err,
                ProductListError::Duplicate {
                    name: "stable".into()
                }
            );
        }
        other => bail!("expected product list error, got {other:?}"),
    }

    Ok(())
}

#[test]
fn ingest_stats() -> Result<()> {
    test_init();

    let dir = LogDir::new()?;
    let stable = dir.write_log("stable", STABLE_LOG)?;
    let mut aggregator = ResultAggregator::new(ProductList::new(["stable"])?);
    let stats = aggregator.ingest_file(&stable)?;
    assert_eq!(stats.events, 11);
    assert_eq!(stats.ignored, 1);

    Ok(())
}

#[test]
fn render_reports() -> Result<()> {
    test_init();

    let dir = LogDir::new()?;
    let logs = [
        dir.write_log("stable", STABLE_LOG)?,
        dir.write_log("nightly", NIGHTLY_LOG)?,
    ];
    let table = aggregate(&logs)?;
    let analyzer = Analyzer::new(&table, AnalysisOptions::default());

    let mut out = Vec::new();
    ReportWriter::new(ReportFormat::Human { verbose: false })
        .write_regressions(&analyzer.find_regressions("stable", "nightly")?, &mut out)?;
    assert_eq!(
        String::from_utf8(out)?,
        indoc! {"
               PASS -> FAIL    /dom/a.html > appendChild works
               PASS -> CRASH   /css/ref.html == /css/ref-expected.html
            ------------
            stable -> nightly: 2 of 5 compared results regressed
        "}
    );

    let mut out = Vec::new();
    ReportWriter::new(ReportFormat::Serializable(SerializableFormat::Json))
        .write_results(&table, &mut out)?;
    let value: serde_json::Value = serde_json::from_slice(&out)?;
    assert_eq!(value["products"], serde_json::json!(["stable", "nightly"]));
    assert_eq!(value["run_info"]["nightly"]["product"], "nightly");
    assert_eq!(
        value["results"][1]["id"],
        serde_json::json!(["/css/ref.html", "==", "/css/ref-expected.html"])
    );
    assert_eq!(value["results"][3]["test"], serde_json::json!([null, "SKIP"]));

    Ok(())
}

#[test]
fn failure_messages_from_log() -> Result<()> {
    test_init();

    let dir = LogDir::new()?;
    let log = dir.write_log(
        "nightly",
        indoc! {r#"
            {"action": "test_start", "test": "/x.html"}
            {"action": "test_status", "test": "/x.html", "subtest": "first", "status": "FAIL", "expected": "PASS", "message": "boom"}
            {"action": "test_end", "test": "/x.html", "status": "OK"}
        "#},
    )?;
    let table = aggregate(&[log])?;
    let report = Analyzer::new(&table, AnalysisOptions::default()).find_failures("nightly")?;
    assert_eq!(
        report.failures,
        [Failure {
            test: TestId::path("/x.html"),
            subtest: Some("first".into()),
            status: Status::FAIL,
            message: Some("boom".to_owned()),
        }]
    );

    let mut out = Vec::new();
    ReportWriter::new(ReportFormat::Human { verbose: true }).write_failures(&report, &mut out)?;
    assert_eq!(
        String::from_utf8(out)?,
        indoc! {"
               FAIL /x.html > first
                    boom
            ------------
            nightly: 1 of 2 results did not pass
        "}
    );

    Ok(())
}
