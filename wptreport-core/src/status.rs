// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test and subtest statuses.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{borrow::Borrow, fmt};

/// A status reported for a test or subtest, such as `PASS` or `TIMEOUT`.
///
/// Statuses are kept exactly as the log reported them. The well-known values are available as
/// associated constants, but any string is a valid status: harnesses can and do invent new ones,
/// and those must survive aggregation unchanged.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Status(SmolStr);

impl Status {
    /// A single assertion passed.
    pub const PASS: Self = Self::new_static("PASS");
    /// A single assertion failed.
    pub const FAIL: Self = Self::new_static("FAIL");
    /// The test harness ran to completion.
    pub const OK: Self = Self::new_static("OK");
    /// The test harness reported an error.
    pub const ERROR: Self = Self::new_static("ERROR");
    /// The test didn't complete in time.
    pub const TIMEOUT: Self = Self::new_static("TIMEOUT");
    /// The product crashed while running the test.
    pub const CRASH: Self = Self::new_static("CRASH");
    /// An assertion inside the product fired.
    pub const ASSERT: Self = Self::new_static("ASSERT");
    /// The test was skipped.
    pub const SKIP: Self = Self::new_static("SKIP");
    /// The subtest was never reached.
    pub const NOTRUN: Self = Self::new_static("NOTRUN");

    /// Every well-known status, in no particular order.
    pub const WELL_KNOWN: [Self; 9] = [
        Self::PASS,
        Self::FAIL,
        Self::OK,
        Self::ERROR,
        Self::TIMEOUT,
        Self::CRASH,
        Self::ASSERT,
        Self::SKIP,
        Self::NOTRUN,
    ];

    /// Creates a new status from a string.
    pub fn new(status: impl Into<SmolStr>) -> Self {
        Self(status.into())
    }

    const fn new_static(status: &'static str) -> Self {
        Self(SmolStr::new_static(status))
    }

    /// Returns the status as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is one of the statuses listed in [`Status::WELL_KNOWN`].
    pub fn is_well_known(&self) -> bool {
        Self::WELL_KNOWN.contains(self)
    }

    /// Returns true if this status counts as passing for a test's overall result.
    ///
    /// Both `PASS` and `OK` pass at the test level.
    pub fn is_test_pass(&self) -> bool {
        *self == Self::PASS || *self == Self::OK
    }

    /// Returns true if this status counts as passing for a subtest.
    ///
    /// Only `PASS` passes at the subtest level, unless `ok_passes` is set.
    pub fn is_subtest_pass(&self, ok_passes: bool) -> bool {
        *self == Self::PASS || (ok_passes && *self == Self::OK)
    }
}

impl From<&str> for Status {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}

impl From<SmolStr> for Status {
    fn from(status: SmolStr) -> Self {
        Self(status)
    }
}

impl Borrow<str> for Status {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Status {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Status {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Status {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}
