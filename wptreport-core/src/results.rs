// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The cross-product result table.
//!
//! A [`ResultTable`] maps each test to a [`TestRecord`], which holds one status slot per product
//! for the test itself and for each of its subtests. Tests and subtests are kept in the order
//! they were first observed, across all products.

use crate::{product::ProductList, status::Status};
use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;
use wptreport_metadata::TestId;

/// Run information reported by a product's `suite_start` event.
pub type RunInfo = serde_json::Map<String, serde_json::Value>;

/// One status slot per product, in product order.
///
/// A slot is `None` if that product never reported a status. Each status may carry the message
/// the product logged alongside it. Messages aren't part of the serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusSlots {
    slots: Box<[Option<Status>]>,
    #[serde(skip)]
    messages: Box<[Option<String>]>,
}

impl StatusSlots {
    pub(crate) fn unset(product_count: usize) -> Self {
        Self {
            slots: vec![None; product_count].into_boxed_slice(),
            messages: vec![None; product_count].into_boxed_slice(),
        }
    }

    /// Returns the status reported by the product at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Status> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Returns the message logged with the status at `index`, if any.
    pub fn message(&self, index: usize) -> Option<&str> {
        self.messages.get(index).and_then(Option::as_deref)
    }

    /// Returns the number of slots, which is the number of products.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over the slots in product order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<&Status>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Overwrites the slot at `index`, along with its message.
    ///
    /// Panics if `index` is out of range: indexes come from the same product list that sized
    /// these slots.
    pub(crate) fn set(&mut self, index: usize, status: Status, message: Option<String>) {
        self.slots[index] = Some(status);
        self.messages[index] = message;
    }
}

/// The results for a single test across all products.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    id: TestId,
    #[serde(rename = "test")]
    test_status: StatusSlots,
    subtests: IndexMap<SmolStr, StatusSlots>,
}

impl TestRecord {
    fn new(id: TestId, product_count: usize) -> Self {
        Self {
            id,
            test_status: StatusSlots::unset(product_count),
            subtests: IndexMap::new(),
        }
    }

    /// Returns the identifier of this test.
    pub fn id(&self) -> &TestId {
        &self.id
    }

    /// Returns the per-product statuses for the test itself.
    pub fn test_status(&self) -> &StatusSlots {
        &self.test_status
    }

    /// Returns the per-product statuses for a subtest, if any product reported it.
    pub fn subtest(&self, name: &str) -> Option<&StatusSlots> {
        self.subtests.get(name)
    }

    /// Iterates over subtests in the order they were first observed.
    pub fn subtests(&self) -> impl ExactSizeIterator<Item = (&str, &StatusSlots)> {
        self.subtests
            .iter()
            .map(|(name, slots)| (name.as_str(), slots))
    }

    pub(crate) fn test_status_mut(&mut self) -> &mut StatusSlots {
        &mut self.test_status
    }

    /// Returns the slots for a subtest, creating them with every slot unset if this is the first
    /// time the subtest has been seen.
    pub(crate) fn subtest_or_insert(&mut self, name: SmolStr) -> &mut StatusSlots {
        let product_count = self.test_status.len();
        self.subtests
            .entry(name)
            .or_insert_with(|| StatusSlots::unset(product_count))
    }
}

/// Results for every test across every product.
///
/// Built by a [`ResultAggregator`](crate::aggregator::ResultAggregator). Once
/// [`finish`](crate::aggregator::ResultAggregator::finish) returns it, the table is read-only.
#[derive(Clone, Debug)]
pub struct ResultTable {
    products: ProductList,
    records: IndexMap<TestId, TestRecord>,
    run_info: Vec<Option<RunInfo>>,
}

impl ResultTable {
    pub(crate) fn new(products: ProductList) -> Self {
        let run_info = vec![None; products.len()];
        Self {
            products,
            records: IndexMap::new(),
            run_info,
        }
    }

    /// Returns the products this table holds results for.
    pub fn products(&self) -> &ProductList {
        &self.products
    }

    /// Returns the record for a test, if any product reported it.
    pub fn get(&self, id: &TestId) -> Option<&TestRecord> {
        self.records.get(id)
    }

    /// Iterates over test records in the order tests were first observed.
    pub fn records(&self) -> impl ExactSizeIterator<Item = &TestRecord> {
        self.records.values()
    }

    /// Returns the number of tests.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no tests were recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the run information reported by the product at `index`, if any.
    pub fn run_info(&self, index: usize) -> Option<&RunInfo> {
        self.run_info.get(index).and_then(Option::as_ref)
    }

    /// Returns true if any product reported run information.
    pub fn has_run_info(&self) -> bool {
        self.run_info.iter().any(Option::is_some)
    }

    pub(crate) fn record_or_insert(&mut self, id: TestId) -> &mut TestRecord {
        let product_count = self.products.len();
        self.records
            .entry(id)
            .or_insert_with_key(|id| TestRecord::new(id.clone(), product_count))
    }

    /// Records run information for a product. The first report wins.
    pub(crate) fn set_run_info_if_absent(&mut self, index: usize, run_info: RunInfo) {
        self.run_info[index].get_or_insert(run_info);
    }
}
