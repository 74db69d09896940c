// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate web-platform-tests results across products.
//!
//! `wptreport` reads one structured log per product, merges them into a single result table, and
//! reports per-product summaries, the failures of one product, or the regressions between two.
//! The library behind it is [`wptreport-core`](https://crates.io/crates/wptreport-core).

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;
#[cfg(test)]
mod tests_integration;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
