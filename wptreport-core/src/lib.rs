// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [wptreport](https://crates.io/crates/wptreport).
//!
//! The basic flow is:
//!
//! 1. Read each product's structured log with a [`JsonLinesReader`](log_source::JsonLinesReader)
//!    (or any other [`LogSource`](log_source::LogSource)).
//! 2. Feed the logs to a [`ResultAggregator`](aggregator::ResultAggregator), which merges them
//!    into a [`ResultTable`](results::ResultTable) with one status slot per product.
//! 3. Derive summaries, failures and regressions with an [`Analyzer`](analyzer::Analyzer).
//! 4. Render results and reports with a [`ReportWriter`](reporter::ReportWriter).

pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod errors;
pub mod log_source;
pub mod product;
pub mod reporter;
pub mod results;
pub mod severity;
pub mod status;
