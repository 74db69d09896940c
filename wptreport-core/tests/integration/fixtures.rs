// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use color_eyre::eyre::Result;
use indoc::indoc;
use std::sync::Once;
use wptreport_core::product::ProductLog;

/// A log from a product with a stable build.
pub(crate) const STABLE_LOG: &str = indoc! {r#"
    {"action": "suite_start", "tests": {"default": ["/dom/a.html", "/dom/b.html"]}, "run_info": {"product": "stable", "os": "linux"}, "time": 1000, "thread": "MainThread", "pid": 42, "source": "web-platform-tests"}
    {"action": "test_start", "test": "/dom/a.html", "time": 1001}
    {"action": "test_status", "test": "/dom/a.html", "subtest": "appendChild works", "status": "PASS", "time": 1002}
    {"action": "test_status", "test": "/dom/a.html", "subtest": "removeChild works", "status": "PASS", "time": 1003}
    {"action": "test_end", "test": "/dom/a.html", "status": "OK", "time": 1004}
    {"action": "log", "level": "INFO", "message": "halfway there"}
    {"action": "test_start", "test": ["/css/ref.html", "==", "/css/ref-expected.html"]}
    {"action": "test_end", "test": ["/css/ref.html", "==", "/css/ref-expected.html"], "status": "PASS"}
    {"action": "test_start", "test": "/dom/b.html"}
    {"action": "test_end", "test": "/dom/b.html", "status": "FAIL", "expected": "PASS", "message": "assertion failed"}
    {"action": "suite_end"}
"#};

/// The same tests from a product with a nightly build, which regressed in places. The log was
/// cut short, so it has no `suite_end`.
pub(crate) const NIGHTLY_LOG: &str = indoc! {r#"
    {"action": "suite_start", "run_info": {"product": "nightly", "os": "linux"}}
    {"action": "test_start", "test": "/dom/b.html"}
    {"action": "test_end", "test": "/dom/b.html", "status": "PASS"}
    {"action": "test_start", "test": "/dom/a.html"}
    {"action": "test_status", "test": "/dom/a.html", "subtest": "appendChild works", "status": "FAIL", "message": "expected 1, got 2"}
    {"action": "process_output", "process": "1234", "data": "some output", "command": "browser"}
    {"action": "test_status", "test": "/dom/a.html", "subtest": "removeChild works", "status": "PASS"}
    {"action": "test_end", "test": "/dom/a.html", "status": "OK"}
    {"action": "test_start", "test": ["/css/ref.html", "==", "/css/ref-expected.html"]}
    {"action": "test_end", "test": ["/css/ref.html", "==", "/css/ref-expected.html"], "status": "CRASH"}
    {"action": "test_status", "test": "/dom/c.html", "subtest": "only in nightly", "status": "SKIP"}
    {"action": "test_end", "test": "/dom/c.html", "status": "SKIP"}
"#};

static INIT: Once = Once::new();

pub(crate) fn test_init() {
    INIT.call_once(|| {
        // Installing twice isn't an error worth failing a test over.
        let _ = color_eyre::install();
    });
}

/// A temporary directory holding product logs.
pub(crate) struct LogDir {
    dir: Utf8TempDir,
}

impl LogDir {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            dir: camino_tempfile::tempdir()?,
        })
    }

    pub(crate) fn path(&self) -> &Utf8Path {
        self.dir.path()
    }

    /// Writes a log for `product` and returns the argument that refers to it.
    pub(crate) fn write_log(&self, product: &str, contents: &str) -> Result<ProductLog> {
        let log_path = self.dir.path().join(format!("{product}.json"));
        std::fs::write(&log_path, contents)?;
        Ok(ProductLog::new(product, log_path))
    }

    /// Writes a file relative to the directory.
    pub(crate) fn write_file(&self, rel_path: &str, contents: &str) -> Result<()> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(())
    }
}
