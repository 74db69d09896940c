// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregating per-product logs into a single [`ResultTable`].
//!
//! The aggregator is fed one product's log at a time. Before each log, the product it belongs to
//! is selected; every result in that log is then written to that product's slot. Because each
//! product only ever writes its own slot, the final table doesn't depend on the order in which
//! products are ingested, other than the order in which tests are first seen.

use crate::{
    errors::{
        AggregateError, IngestError, IngestErrorKind, NoProductSelectedError, ProductListError,
        UnknownProductError,
    },
    log_source::{JsonLinesReader, LogEvent, LogSource},
    product::{ProductList, ProductLog},
    results::{ResultTable, RunInfo},
    status::Status,
};
use camino::Utf8Path;
use smol_str::SmolStr;
use std::{fs::File, io::BufReader};
use tracing::{debug, info};
use wptreport_metadata::TestId;

/// Builds a [`ResultTable`] from per-product event streams.
#[derive(Debug)]
pub struct ResultAggregator {
    table: ResultTable,
    current: Option<usize>,
}

impl ResultAggregator {
    /// Creates a new aggregator for the given products.
    pub fn new(products: ProductList) -> Self {
        Self {
            table: ResultTable::new(products),
            current: None,
        }
    }

    /// Replaces the product list.
    ///
    /// This fixes each product's index for the rest of the run, so it must happen before any
    /// result is recorded.
    pub fn set_products(&mut self, products: ProductList) -> Result<(), ProductListError> {
        if !self.table.is_empty() || self.table.has_run_info() {
            return Err(ProductListError::AlreadyIngesting);
        }
        self.table = ResultTable::new(products);
        self.current = None;
        Ok(())
    }

    /// Returns the product list.
    pub fn products(&self) -> &ProductList {
        self.table.products()
    }

    /// Selects the product that subsequent results are attributed to.
    pub fn select_product(&mut self, name: &str) -> Result<(), UnknownProductError> {
        self.current = Some(self.table.products().index_of(name)?);
        Ok(())
    }

    /// Records that a test exists, without recording a result for it.
    pub fn on_test_start(&mut self, test: TestId) {
        self.table.record_or_insert(test);
    }

    /// Records a subtest result for the current product.
    ///
    /// The test doesn't need to have been started first. Any earlier result for the same
    /// subtest and product is overwritten.
    pub fn on_test_status(
        &mut self,
        test: TestId,
        subtest: impl Into<SmolStr>,
        status: Status,
    ) -> Result<(), NoProductSelectedError> {
        self.on_test_status_with_message(test, subtest, status, None)
    }

    /// Like [`on_test_status`](Self::on_test_status), also keeping the message logged with the
    /// result.
    pub fn on_test_status_with_message(
        &mut self,
        test: TestId,
        subtest: impl Into<SmolStr>,
        status: Status,
        message: Option<String>,
    ) -> Result<(), NoProductSelectedError> {
        let index = self.current_index()?;
        self.table
            .record_or_insert(test)
            .subtest_or_insert(subtest.into())
            .set(index, status, message);
        Ok(())
    }

    /// Records the overall result of a test for the current product.
    ///
    /// The test doesn't need to have been started first. Any earlier result for the same test
    /// and product is overwritten.
    pub fn on_test_end(
        &mut self,
        test: TestId,
        status: Status,
    ) -> Result<(), NoProductSelectedError> {
        self.on_test_end_with_message(test, status, None)
    }

    /// Like [`on_test_end`](Self::on_test_end), also keeping the message logged with the result.
    pub fn on_test_end_with_message(
        &mut self,
        test: TestId,
        status: Status,
        message: Option<String>,
    ) -> Result<(), NoProductSelectedError> {
        let index = self.current_index()?;
        self.table
            .record_or_insert(test)
            .test_status_mut()
            .set(index, status, message);
        Ok(())
    }

    /// Records run information for the current product, unless some was already recorded.
    pub fn on_suite_start(&mut self, run_info: RunInfo) -> Result<(), NoProductSelectedError> {
        let index = self.current_index()?;
        self.table.set_run_info_if_absent(index, run_info);
        Ok(())
    }

    /// Routes a single event to the matching `on_*` method.
    ///
    /// Returns true if the event carried anything the table records.
    pub fn handle_event(&mut self, event: LogEvent) -> Result<bool, NoProductSelectedError> {
        match event {
            LogEvent::SuiteStart { run_info } => {
                if let Some(run_info) = run_info {
                    self.on_suite_start(run_info)?;
                }
                Ok(true)
            }
            LogEvent::TestStart { test } => {
                self.on_test_start(test);
                Ok(true)
            }
            LogEvent::TestStatus {
                test,
                subtest,
                status,
                message,
            } => {
                self.on_test_status_with_message(test, subtest, status, message)?;
                Ok(true)
            }
            LogEvent::TestEnd {
                test,
                status,
                message,
            } => {
                self.on_test_end_with_message(test, status, message)?;
                Ok(true)
            }
            LogEvent::SuiteEnd => Ok(true),
            LogEvent::Other { .. } => Ok(false),
        }
    }

    /// Selects `product` and replays every event from `events` into the table.
    ///
    /// `log_path` is only used for error reporting. Ingestion stops at the first error: the
    /// table may then contain part of this product's results, and shouldn't be used.
    pub fn ingest(
        &mut self,
        product: &str,
        log_path: &Utf8Path,
        events: impl LogSource,
    ) -> Result<IngestStats, IngestError> {
        self.select_product(product)
            .map_err(|err| IngestError::new(product, err))?;

        let mut stats = IngestStats::default();
        for event in events {
            let event = event.map_err(|err| {
                IngestError::new(
                    product,
                    IngestErrorKind::Read {
                        path: log_path.to_owned(),
                        err,
                    },
                )
            })?;
            stats.events += 1;
            let recorded = self
                .handle_event(event)
                .map_err(|err| IngestError::new(product, err))?;
            if !recorded {
                stats.ignored += 1;
            }
        }

        debug!(
            product,
            %log_path,
            events = stats.events,
            ignored = stats.ignored,
            "ingested log"
        );
        Ok(stats)
    }

    /// Opens a product's log file and ingests it as line-delimited JSON.
    pub fn ingest_file(&mut self, log: &ProductLog) -> Result<IngestStats, IngestError> {
        let file = File::open(&log.log_path).map_err(|err| {
            IngestError::new(
                log.product.clone(),
                IngestErrorKind::Open {
                    path: log.log_path.clone(),
                    err,
                },
            )
        })?;
        let reader = JsonLinesReader::new(BufReader::new(file));
        self.ingest(&log.product, &log.log_path, reader)
    }

    /// Consumes the aggregator, returning the finished table.
    pub fn finish(self) -> ResultTable {
        self.table
    }

    fn current_index(&self) -> Result<usize, NoProductSelectedError> {
        self.current.ok_or(NoProductSelectedError)
    }
}

/// Counts of events seen while ingesting one log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// The number of events read.
    pub events: usize,

    /// The number of events that carried nothing the table records.
    pub ignored: usize,
}

/// Builds a [`ResultTable`] from a list of product logs.
///
/// The product list is taken from `logs`, in order. Each log is then ingested in turn. This
/// fails on the first log that can't be read.
pub fn aggregate(logs: &[ProductLog]) -> Result<ResultTable, AggregateError> {
    let products = ProductList::new(logs.iter().map(|log| log.product.clone()))?;
    let mut aggregator = ResultAggregator::new(products);
    for log in logs {
        aggregator.ingest_file(log)?;
    }
    let table = aggregator.finish();
    info!(
        products = table.products().len(),
        tests = table.len(),
        "aggregated results"
    );
    Ok(table)
}
