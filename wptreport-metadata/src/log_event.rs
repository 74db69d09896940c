// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::TestId;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A single line of a structured log, as written by the test harness.
///
/// Every field other than `action` is optional at this level. Which fields must be present
/// depends on the action: a `test_status` event needs `test`, `subtest` and `status`, while a
/// `suite_end` event needs nothing. Consumers validate that when they interpret the event.
///
/// Fields that aren't listed here, such as `expected`, `time` or `pid`, are ignored during
/// deserialization.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct RawLogEvent {
    /// The kind of event, for example `test_start` or `test_status`.
    ///
    /// Older producers call this field `type`.
    #[serde(alias = "type")]
    pub action: SmolStr,

    /// The test this event is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<TestId>,

    /// The subtest name, for `test_status` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtest: Option<SmolStr>,

    /// The status reported, for example `PASS` or `TIMEOUT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SmolStr>,

    /// A free-form message attached to the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Information about the run, present on `suite_start` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_info: Option<serde_json::Map<String, serde_json::Value>>,
}

impl RawLogEvent {
    /// Action name for the event that starts a test suite.
    pub const SUITE_START: &'static str = "suite_start";

    /// Action name for the event that starts a test.
    pub const TEST_START: &'static str = "test_start";

    /// Action name for a subtest result.
    pub const TEST_STATUS: &'static str = "test_status";

    /// Action name for the overall result of a test.
    pub const TEST_END: &'static str = "test_end";

    /// Action name for the event that ends a test suite.
    pub const SUITE_END: &'static str = "suite_end";
}
