// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `wptreport` failures.
///
/// `wptreport` runs may fail for a variety of reasons. This structure documents the exit codes
/// that may occur in case of expected failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ReportExitCode {}

impl ReportExitCode {
    /// No errors occurred and wptreport exited normally.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up a wptreport invocation: a bad `product:path`
    /// argument, a duplicate product, or an invalid config file.
    pub const SETUP_ERROR: i32 = 96;

    /// A report was requested for a product that wasn't part of the product list.
    pub const UNKNOWN_PRODUCT: i32 = 95;

    /// A regression comparison hit a status with no severity rank, and the active profile
    /// treats that as an error.
    pub const UNRANKED_STATUS: i32 = 94;

    /// Reading or parsing a structured log failed.
    pub const INGEST_FAILED: i32 = 104;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
