// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// The identity of a single test, stable across products.
///
/// Most tests are identified by a single URL or path. Tests that reference several resources
/// (for example reftests, which compare a test page against a reference page) are identified by
/// an ordered list of strings instead.
///
/// On the wire, a `TestId` is either a JSON string or a JSON array of strings. Both forms
/// deserialize into this type, and two identifiers are equal iff they have the same form and the
/// same contents. In particular, a single-element array is *not* equal to the plain string it
/// contains.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TestId {
    /// A test identified by a single path.
    Path(SmolStr),

    /// A test identified by an ordered sequence of paths.
    Composite(Vec<SmolStr>),
}

impl TestId {
    /// Creates a new path identifier.
    pub fn path(path: impl Into<SmolStr>) -> Self {
        Self::Path(path.into())
    }

    /// Creates a new composite identifier from its parts, in order.
    pub fn composite(parts: impl IntoIterator<Item = impl Into<SmolStr>>) -> Self {
        Self::Composite(parts.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for TestId {
    fn from(path: &str) -> Self {
        Self::Path(path.into())
    }
}

impl From<String> for TestId {
    fn from(path: String) -> Self {
        Self::Path(path.into())
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Composite(parts) => {
                let mut first = true;
                for part in parts {
                    if !first {
                        f.write_str(" ")?;
                    }
                    f.write_str(part)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}
