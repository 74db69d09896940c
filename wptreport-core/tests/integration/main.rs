// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for wptreport-core: logs on disk through to rendered reports.

mod basic;
mod fixtures;
