// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading structured logs.
//!
//! A structured log is a recording of one test run, as a sequence of events. This module turns
//! raw wire events ([`RawLogEvent`]) into validated [`LogEvent`]s, and provides
//! [`JsonLinesReader`] to read them from line-delimited JSON.
//!
//! Anything that yields `Result<LogEvent, ReadEventError>` is a [`LogSource`], so tests and
//! other producers can feed events to the aggregator without going through JSON.

use crate::{
    errors::{MalformedEventError, MalformedEventKind, ReadEventError},
    results::RunInfo,
    status::Status,
};
use smol_str::SmolStr;
use std::io::BufRead;
use wptreport_metadata::{RawLogEvent, TestId};

/// A validated event from a structured log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    /// A test suite started.
    SuiteStart {
        /// Information about the run, if the producer reported any.
        run_info: Option<RunInfo>,
    },

    /// A test started.
    TestStart {
        /// The test that started.
        test: TestId,
    },

    /// A subtest produced a result.
    TestStatus {
        /// The test the subtest belongs to.
        test: TestId,
        /// The name of the subtest.
        subtest: SmolStr,
        /// The status of the subtest.
        status: Status,
        /// A message attached to the result.
        message: Option<String>,
    },

    /// A test finished, with its overall result.
    TestEnd {
        /// The test that finished.
        test: TestId,
        /// The overall status of the test.
        status: Status,
        /// A message attached to the result.
        message: Option<String>,
    },

    /// A test suite finished.
    SuiteEnd,

    /// Any other event, such as `log` or `process_output`. These carry no results.
    Other {
        /// The action of the event.
        action: SmolStr,
    },
}

impl LogEvent {
    /// Validates a raw event, checking that the fields its action requires are present.
    pub fn from_raw(raw: RawLogEvent) -> Result<Self, MalformedEventKind> {
        let RawLogEvent {
            action,
            test,
            subtest,
            status,
            message,
            run_info,
        } = raw;

        let missing = |field| MalformedEventKind::MissingField {
            action: action.clone(),
            field,
        };

        let event = match action.as_str() {
            RawLogEvent::SUITE_START => Self::SuiteStart { run_info },
            RawLogEvent::TEST_START => Self::TestStart {
                test: test.ok_or_else(|| missing("test"))?,
            },
            RawLogEvent::TEST_STATUS => Self::TestStatus {
                test: test.ok_or_else(|| missing("test"))?,
                subtest: subtest.ok_or_else(|| missing("subtest"))?,
                status: status.ok_or_else(|| missing("status"))?.into(),
                message,
            },
            RawLogEvent::TEST_END => Self::TestEnd {
                test: test.ok_or_else(|| missing("test"))?,
                status: status.ok_or_else(|| missing("status"))?.into(),
                message,
            },
            RawLogEvent::SUITE_END => Self::SuiteEnd,
            _ => Self::Other { action },
        };
        Ok(event)
    }
}

/// A source of log events, in the order they were logged.
///
/// This is implemented for every iterator over `Result<LogEvent, ReadEventError>`.
pub trait LogSource: Iterator<Item = Result<LogEvent, ReadEventError>> {}

impl<I> LogSource for I where I: Iterator<Item = Result<LogEvent, ReadEventError>> {}

/// Reads events from line-delimited JSON, one event per line.
///
/// Blank lines are skipped. Reading stops at the end of the input: a log that ends without a
/// `suite_end` event, for example because the harness was killed, is not an error.
#[derive(Debug)]
pub struct JsonLinesReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesReader<R> {
    /// Creates a new reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Returns the number of lines read so far, including blank lines.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    fn parse_line(&self) -> Result<LogEvent, MalformedEventError> {
        let raw: RawLogEvent = serde_json::from_str(&self.buf)
            .map_err(|err| MalformedEventError::new(self.line, MalformedEventKind::InvalidJson(err)))?;
        LogEvent::from_raw(raw).map_err(|kind| MalformedEventError::new(self.line, kind))
    }
}

impl<R: BufRead> Iterator for JsonLinesReader<R> {
    type Item = Result<LogEvent, ReadEventError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(err) => {
                    return Some(Err(ReadEventError::Io {
                        line: self.line + 1,
                        err,
                    }));
                }
            }
            if self.buf.trim().is_empty() {
                continue;
            }
            return Some(self.parse_line().map_err(ReadEventError::from));
        }
    }
}
