// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use tracing::error;
use wptreport_core::errors::{
    AggregateError, ConfigParseError, FindRegressionsError, IngestErrorKind, ProfileNotFound,
    ReadEventError, UnknownProductError, WriteReportError,
};
use wptreport_metadata::ReportExitCode;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are placeholders: errors are printed out through display_to_stderr, which
// colorizes them and walks the source chain.

/// An expected error that causes wptreport to exit with a documented exit code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("current directory is invalid")]
    CurrentDirInvalid {
        #[source]
        err: std::io::Error,
    },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("profile not found")]
    ProfileNotFound {
        #[from]
        err: ProfileNotFound,
    },
    #[error("aggregation failed")]
    AggregateError {
        #[from]
        err: AggregateError,
    },
    #[error("unknown product")]
    UnknownProduct {
        #[from]
        err: UnknownProductError,
    },
    #[error("regression comparison failed")]
    FindRegressionsError {
        #[from]
        err: FindRegressionsError,
    },
    #[error("error writing report")]
    WriteReportError {
        #[from]
        err: WriteReportError,
    },
}

impl ExpectedError {
    pub(crate) fn current_dir_invalid(err: std::io::Error) -> Self {
        Self::CurrentDirInvalid { err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirInvalid { .. }
            | Self::ConfigParseError { .. }
            | Self::ProfileNotFound { .. } => ReportExitCode::SETUP_ERROR,
            Self::AggregateError { err } => match err {
                AggregateError::Ingest(_) => ReportExitCode::INGEST_FAILED,
                _ => ReportExitCode::SETUP_ERROR,
            },
            Self::UnknownProduct { .. } => ReportExitCode::UNKNOWN_PRODUCT,
            Self::FindRegressionsError { err } => match err {
                FindRegressionsError::UnrankedStatus(_) => ReportExitCode::UNRANKED_STATUS,
                _ => ReportExitCode::UNKNOWN_PRODUCT,
            },
            Self::WriteReportError { .. } => ReportExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::CurrentDirInvalid { err } => {
                error!("current directory is invalid");
                Some(err as &dyn Error)
            }
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse config file `{}`",
                    err.config_file().style(styles.bold)
                );
                err.source()
            }
            Self::ProfileNotFound { err } => {
                error!("{err}");
                err.source()
            }
            Self::AggregateError { err } => match err {
                AggregateError::Ingest(err) => {
                    error!(
                        "failed to ingest results for product `{}`",
                        err.product().style(styles.product)
                    );
                    match err.kind() {
                        IngestErrorKind::Read {
                            err: ReadEventError::Malformed(malformed),
                            path,
                        } => {
                            error!(
                                target: NO_HEADING_TARGET,
                                "\nCaused by:\n  {} in log `{}`",
                                malformed,
                                path.style(styles.bold),
                            );
                            malformed.source()
                        }
                        kind => Some(kind as &dyn Error),
                    }
                }
                err => {
                    error!("{err}");
                    err.source()
                }
            },
            Self::UnknownProduct { err } => {
                error!("{err}");
                err.source()
            }
            Self::FindRegressionsError { err } => {
                error!("{err}");
                err.source()
            }
            Self::WriteReportError { err } => {
                error!("{err}");
                err.source()
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
