// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by wptreport.

use crate::status::Status;
use camino::Utf8PathBuf;
use config::ConfigError;
use itertools::Itertools;
use smol_str::SmolStr;
use std::fmt;
use thiserror::Error;
use wptreport_metadata::TestId;

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse wptreport config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
///
/// Returned by [`ConfigParseError::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),
    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// An error which indicates that a profile was requested but not known to wptreport.
#[derive(Clone, Debug, Error)]
#[error("profile `{profile}` not found (known profiles: {})", .all_profiles.join(", "))]
pub struct ProfileNotFound {
    profile: String,
    all_profiles: Vec<String>,
}

impl ProfileNotFound {
    pub(crate) fn new(
        profile: impl Into<String>,
        all_profiles: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let mut all_profiles: Vec<_> = all_profiles.into_iter().map(|s| s.into()).collect();
        all_profiles.sort_unstable();
        Self {
            profile: profile.into(),
            all_profiles,
        }
    }
}

/// An error returned when a severity order is invalid.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SeverityOrderError {
    /// The order didn't list any statuses.
    #[error("severity order must list at least one status")]
    Empty,

    /// A status was listed more than once.
    #[error("status `{status}` appears more than once in severity order")]
    Duplicate {
        /// The duplicated status.
        status: Status,
    },
}

/// An error returned while building a [`ProductList`](crate::product::ProductList).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProductListError {
    /// A product name was empty.
    #[error("product names must not be empty")]
    EmptyName,

    /// The same product was specified more than once.
    #[error("product `{name}` specified more than once")]
    Duplicate {
        /// The duplicated product name.
        name: SmolStr,
    },

    /// The product list was changed after results had already been recorded.
    #[error("cannot change products after results have been recorded")]
    AlreadyIngesting,
}

/// An error returned when a product is requested that isn't in the product list.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error(
    "unknown product `{product}` (known products: {})",
    .known.iter().join(", ")
)]
pub struct UnknownProductError {
    product: SmolStr,
    known: Vec<SmolStr>,
}

impl UnknownProductError {
    pub(crate) fn new(
        product: impl Into<SmolStr>,
        known: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> Self {
        Self {
            product: product.into(),
            known: known.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the name of the product that was requested.
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Returns the products that are known, in product order.
    pub fn known(&self) -> &[SmolStr] {
        &self.known
    }
}

/// An error returned when a result is recorded before any product is selected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("no product selected: results can't be attributed to a product")]
pub struct NoProductSelectedError;

/// An error that occurs while parsing a `product:path` argument.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProductLogParseError {
    /// The input was not of the form `product:path`.
    #[error("product log `{input}` is not in the format `product:path`")]
    InvalidFormat {
        /// The input that failed to parse.
        input: String,
    },

    /// The product name was empty.
    #[error("product log `{input}` has an empty product name")]
    EmptyProduct {
        /// The input that failed to parse.
        input: String,
    },

    /// The log path was empty.
    #[error("product log `{input}` has an empty path")]
    EmptyPath {
        /// The input that failed to parse.
        input: String,
    },
}

/// An event in a structured log was missing data or couldn't be parsed.
#[derive(Debug, Error)]
#[error("malformed event at line {line}")]
pub struct MalformedEventError {
    line: usize,
    #[source]
    kind: MalformedEventKind,
}

impl MalformedEventError {
    pub(crate) fn new(line: usize, kind: MalformedEventKind) -> Self {
        Self { line, kind }
    }

    /// Returns the 1-based line number the event was on.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the reason this event is malformed.
    pub fn kind(&self) -> &MalformedEventKind {
        &self.kind
    }
}

/// The reason an event is malformed.
///
/// Returned by [`MalformedEventError::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MalformedEventKind {
    /// The line wasn't a valid event object.
    #[error("line is not a valid log event")]
    InvalidJson(#[source] serde_json::Error),

    /// A field required for this kind of event was absent.
    #[error("`{action}` event is missing required field `{field}`")]
    MissingField {
        /// The event's action.
        action: SmolStr,

        /// The name of the missing field.
        field: &'static str,
    },
}

/// An error that occurred while reading events from a log source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadEventError {
    /// An I/O error occurred while reading a line.
    #[error("error reading line {line}")]
    Io {
        /// The 1-based line number that failed to read.
        line: usize,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },

    /// A line was read but didn't contain a well-formed event.
    #[error(transparent)]
    Malformed(#[from] MalformedEventError),
}

/// An error that occurred while ingesting a single product's log.
#[derive(Debug, Error)]
#[error("failed to ingest results for product `{product}`")]
pub struct IngestError {
    product: SmolStr,
    #[source]
    kind: IngestErrorKind,
}

impl IngestError {
    pub(crate) fn new(product: impl Into<SmolStr>, kind: impl Into<IngestErrorKind>) -> Self {
        Self {
            product: product.into(),
            kind: kind.into(),
        }
    }

    /// Returns the product whose log failed to ingest.
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &IngestErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred during ingestion.
///
/// Returned by [`IngestError::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestErrorKind {
    /// The log file couldn't be opened.
    #[error("failed to open log at `{path}`")]
    Open {
        /// The path to the log.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: std::io::Error,
    },

    /// Reading an event from the log failed.
    #[error("failed to read log at `{path}`")]
    Read {
        /// The path to the log, or `<stream>` for logs that aren't backed by a file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        err: ReadEventError,
    },

    /// The product isn't part of the product list.
    #[error(transparent)]
    UnknownProduct(#[from] UnknownProductError),

    /// An event was replayed while no product was selected.
    #[error(transparent)]
    NoProductSelected(#[from] NoProductSelectedError),
}

/// An error that occurred while aggregating results across products.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AggregateError {
    /// The product list was invalid.
    #[error("invalid product list")]
    ProductList(#[from] ProductListError),

    /// One of the logs failed to ingest.
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// A regression comparison involved a status with no severity rank.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub struct UnrankedStatusError {
    test: TestId,
    subtest: Option<SmolStr>,
    base_status: Status,
    target_status: Status,
}

impl UnrankedStatusError {
    pub(crate) fn new(
        test: TestId,
        subtest: Option<SmolStr>,
        base_status: Status,
        target_status: Status,
    ) -> Self {
        Self {
            test,
            subtest,
            base_status,
            target_status,
        }
    }

    /// Returns the test the comparison was for.
    pub fn test(&self) -> &TestId {
        &self.test
    }

    /// Returns the subtest the comparison was for, or `None` for the test-level status.
    pub fn subtest(&self) -> Option<&str> {
        self.subtest.as_deref()
    }
}

impl fmt::Display for UnrankedStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot rank `{}` against `{}` for test `{}`",
            self.base_status, self.target_status, self.test
        )?;
        if let Some(subtest) = &self.subtest {
            write!(f, ", subtest `{subtest}`")?;
        }
        write!(f, ": status has no severity")
    }
}

/// An error returned by [`Analyzer::find_regressions`](crate::analyzer::Analyzer::find_regressions).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FindRegressionsError {
    /// The base or target product isn't in the product list.
    #[error(transparent)]
    UnknownProduct(#[from] UnknownProductError),

    /// A status couldn't be ranked, and the active policy treats that as an error.
    #[error(transparent)]
    UnrankedStatus(#[from] UnrankedStatusError),
}

/// An error that occurred while writing a report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// An error occurred while writing to the output.
    #[error("error writing to output")]
    Io(#[from] std::io::Error),

    /// An error occurred while serializing the report.
    #[error("error serializing report to JSON")]
    Json(#[from] serde_json::Error),
}
