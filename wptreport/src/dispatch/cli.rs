// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Options shared across commands.

use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use smol_str::SmolStr;
use std::{fmt, str::FromStr};
use thiserror::Error;
use wptreport_core::{
    config::ReportConfig,
    product::ProductLog,
    reporter::{ReportFormat, SerializableFormat},
};

#[derive(Debug, Args)]
#[command(next_help_heading = "Config options")]
pub(super) struct ConfigOpts {
    /// Config file [default: .config/wptreport.toml in the current directory]
    #[arg(long, global = true, value_name = "PATH")]
    pub(super) config_file: Option<Utf8PathBuf>,

    /// Config profile to use
    #[arg(
        long,
        short = 'P',
        env = "WPTREPORT_PROFILE",
        global = true,
        default_value = ReportConfig::DEFAULT_PROFILE,
    )]
    pub(super) profile: String,
}

#[derive(Debug, Args)]
pub(super) struct ProductLogOpts {
    /// Structured logs to read, as `product:path` pairs
    ///
    /// Products are reported in the order they're listed. The path is everything after the first
    /// `:`.
    #[arg(required = true, value_name = "PRODUCT:PATH")]
    pub(super) logs: Vec<ProductLog>,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(super) enum MessageFormatOpts {
    /// A human-readable output format.
    #[default]
    Human,
    /// JSON with no whitespace.
    Json,
    /// JSON, prettified.
    JsonPretty,
}

impl MessageFormatOpts {
    pub(super) fn to_report_format(self, verbose: bool) -> ReportFormat {
        match self {
            Self::Human => ReportFormat::Human { verbose },
            Self::Json => ReportFormat::Serializable(SerializableFormat::Json),
            Self::JsonPretty => ReportFormat::Serializable(SerializableFormat::JsonPretty),
        }
    }
}

#[derive(Debug, Args)]
pub(super) struct RegressionsOpts {
    /// Product to compare against
    #[arg(
        long,
        value_name = "NAME",
        required_unless_present = "compare",
        requires = "target"
    )]
    base: Option<SmolStr>,

    /// Product to check for regressions
    #[arg(
        long,
        value_name = "NAME",
        required_unless_present = "compare",
        requires = "base"
    )]
    target: Option<SmolStr>,

    /// Base and target products in one argument
    #[arg(long, value_name = "BASE:TARGET", conflicts_with_all = ["base", "target"])]
    compare: Option<ComparePair>,

    #[clap(flatten)]
    pub(super) logs: ProductLogOpts,
}

impl RegressionsOpts {
    /// Returns the base and target products, however they were passed in.
    pub(super) fn products(&self) -> (&str, &str) {
        match (&self.compare, &self.base, &self.target) {
            (Some(pair), _, _) => (pair.base.as_str(), pair.target.as_str()),
            (None, Some(base), Some(target)) => (base.as_str(), target.as_str()),
            _ => unreachable!("clap requires either --compare or both --base and --target"),
        }
    }
}

/// A `base:target` pair of products.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct ComparePair {
    base: SmolStr,
    target: SmolStr,
}

impl FromStr for ComparePair {
    type Err = ComparePairParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.split_once(':') {
            Some((base, target)) if !base.is_empty() && !target.is_empty() => Ok(Self {
                base: base.into(),
                target: target.into(),
            }),
            _ => Err(ComparePairParseError {
                input: input.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ComparePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.base, self.target)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("`{input}` is not in the format `base:target`")]
pub(super) struct ComparePairParseError {
    input: String,
}
