// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Serializable types shared between producers of structured test logs and `wptreport`.
//!
//! Structured logs are line-delimited JSON, one event per line, in the "raw" format written by
//! test harnesses such as wptrunner. The types in this crate describe that wire format without
//! interpreting it: deciding which fields are required for which event is left to consumers.

mod exit_codes;
mod log_event;
mod test_id;

pub use exit_codes::*;
pub use log_event::*;
pub use test_id::*;
