// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summaries, failures and regressions derived from a [`ResultTable`].
//!
//! Everything here is read-only. Tests are visited in the order they were first observed, and
//! within a test the test-level status comes before its subtests.

use crate::{
    errors::{FindRegressionsError, UnknownProductError, UnrankedStatusError},
    results::{ResultTable, StatusSlots},
    severity::{SeverityModel, UnrankedStatus},
    status::Status,
};
use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;
use std::cmp::Ordering;
use tracing::debug;
use wptreport_metadata::TestId;

/// Options that control how statuses are judged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// The order used to decide whether a status got worse.
    pub severity: SeverityModel,

    /// What to do when a regression comparison involves an unranked status.
    pub unranked_status: UnrankedStatus,

    /// Whether `OK` counts as passing for subtests in summaries.
    pub subtest_ok_passes: bool,
}

/// Computes reports over a finished [`ResultTable`].
#[derive(Clone, Debug)]
pub struct Analyzer<'a> {
    table: &'a ResultTable,
    options: AnalysisOptions,
}

impl<'a> Analyzer<'a> {
    /// Creates a new analyzer.
    pub fn new(table: &'a ResultTable, options: AnalysisOptions) -> Self {
        Self { table, options }
    }

    /// Counts, per product, how many results were reported and how many passed.
    ///
    /// A subtest only counts for a product if that product also reported the test's overall
    /// status.
    pub fn summarize(&self) -> Summary {
        let products = self.table.products();
        let mut counts = vec![ProductSummary::default(); products.len()];

        for record in self.table.records() {
            for (index, counts) in counts.iter_mut().enumerate() {
                let Some(status) = record.test_status().get(index) else {
                    continue;
                };
                counts.add(status.is_test_pass());
                for (_, slots) in record.subtests() {
                    if let Some(status) = slots.get(index) {
                        counts.add(status.is_subtest_pass(self.options.subtest_ok_passes));
                    }
                }
            }
        }

        Summary {
            products: products.iter().map(SmolStr::new).zip(counts).collect(),
        }
    }

    /// Lists every non-passing result for `target`.
    ///
    /// `PASS` and `OK` are passing for both tests and subtests. Subtests are only considered if
    /// the target reported the test's overall status.
    pub fn find_failures(&self, target: &str) -> Result<FailureReport, UnknownProductError> {
        let index = self.table.products().index_of(target)?;
        let mut report = FailureReport {
            target: target.into(),
            total: 0,
            failures: Vec::new(),
        };

        for record in self.table.records() {
            if record.test_status().get(index).is_none() {
                continue;
            }
            report.check(record.id(), None, record.test_status(), index);
            for (name, slots) in record.subtests() {
                report.check(record.id(), Some(name), slots, index);
            }
        }

        debug!(
            product = target,
            total = report.total,
            failures = report.failures.len(),
            "found failures"
        );
        Ok(report)
    }

    /// Lists every result that got worse between `base` and `target`.
    ///
    /// Only results that both products reported are compared, and subtests are only compared if
    /// both products reported the test's overall status.
    pub fn find_regressions(
        &self,
        base: &str,
        target: &str,
    ) -> Result<RegressionReport, FindRegressionsError> {
        let products = self.table.products();
        let base_index = products.index_of(base)?;
        let target_index = products.index_of(target)?;
        let mut report = RegressionReport {
            base: base.into(),
            target: target.into(),
            total: 0,
            unranked: 0,
            regressions: Vec::new(),
        };

        for record in self.table.records() {
            let Some(pair) = SlotPair::new(record.test_status(), base_index, target_index) else {
                continue;
            };
            self.compare(&mut report, record.id(), None, pair)?;
            for (name, slots) in record.subtests() {
                if let Some(pair) = SlotPair::new(slots, base_index, target_index) {
                    self.compare(&mut report, record.id(), Some(name), pair)?;
                }
            }
        }

        debug!(
            base,
            target_product = target,
            total = report.total,
            unranked = report.unranked,
            regressions = report.regressions.len(),
            "found regressions"
        );
        Ok(report)
    }

    fn compare(
        &self,
        report: &mut RegressionReport,
        test: &TestId,
        subtest: Option<&str>,
        pair: SlotPair<'_>,
    ) -> Result<(), UnrankedStatusError> {
        report.total += 1;
        match self.options.severity.compare(pair.target, pair.base) {
            Some(Ordering::Greater) => {
                report.regressions.push(Regression {
                    test: test.clone(),
                    subtest: subtest.map(SmolStr::new),
                    base_status: pair.base.clone(),
                    target_status: pair.target.clone(),
                    message: pair.target_message.map(str::to_owned),
                });
            }
            Some(Ordering::Equal | Ordering::Less) => {}
            None => match self.options.unranked_status {
                UnrankedStatus::Exclude => report.unranked += 1,
                UnrankedStatus::Error => {
                    return Err(UnrankedStatusError::new(
                        test.clone(),
                        subtest.map(SmolStr::new),
                        pair.base.clone(),
                        pair.target.clone(),
                    ));
                }
            },
        }
        Ok(())
    }
}

/// Statuses reported by both the base and the target.
#[derive(Clone, Copy, Debug)]
struct SlotPair<'a> {
    base: &'a Status,
    target: &'a Status,
    target_message: Option<&'a str>,
}

impl<'a> SlotPair<'a> {
    fn new(slots: &'a StatusSlots, base: usize, target: usize) -> Option<Self> {
        Some(Self {
            base: slots.get(base)?,
            target: slots.get(target)?,
            target_message: slots.message(target),
        })
    }
}

/// Pass counts for a single product.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    /// The number of test and subtest results the product reported.
    pub ran: usize,

    /// The number of those results that passed.
    pub passed: usize,
}

impl ProductSummary {
    fn add(&mut self, passed: bool) {
        self.ran += 1;
        if passed {
            self.passed += 1;
        }
    }

    /// Returns the number of results that didn't pass.
    pub fn failed(&self) -> usize {
        self.ran - self.passed
    }
}

/// Pass counts for every product, in product order.
///
/// Returned by [`Analyzer::summarize`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Summary {
    products: IndexMap<SmolStr, ProductSummary>,
}

impl Summary {
    /// Returns the counts for a product.
    pub fn get(&self, product: &str) -> Option<&ProductSummary> {
        self.products.get(product)
    }

    /// Iterates over products and their counts, in product order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &ProductSummary)> {
        self.products
            .iter()
            .map(|(name, summary)| (name.as_str(), summary))
    }
}

/// A non-passing result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// The test.
    pub test: TestId,

    /// The subtest, or `None` for the test's overall status.
    pub subtest: Option<SmolStr>,

    /// The status that was reported.
    pub status: Status,

    /// The message logged with the status, if any.
    pub message: Option<String>,
}

/// The failures of a single product.
///
/// Returned by [`Analyzer::find_failures`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    /// The product that was checked.
    pub target: SmolStr,

    /// The number of results that were checked.
    pub total: usize,

    /// The results that didn't pass, in table order.
    pub failures: Vec<Failure>,
}

impl FailureReport {
    fn check(&mut self, test: &TestId, subtest: Option<&str>, slots: &StatusSlots, index: usize) {
        let Some(status) = slots.get(index) else {
            return;
        };
        self.total += 1;
        if !status.is_test_pass() {
            self.failures.push(Failure {
                test: test.clone(),
                subtest: subtest.map(SmolStr::new),
                status: status.clone(),
                message: slots.message(index).map(str::to_owned),
            });
        }
    }
}

/// A result that got worse between two products.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Regression {
    /// The test.
    pub test: TestId,

    /// The subtest, or `None` for the test's overall status.
    pub subtest: Option<SmolStr>,

    /// The status reported by the base product.
    pub base_status: Status,

    /// The status reported by the target product.
    pub target_status: Status,

    /// The message the target product logged with its status, if any.
    pub message: Option<String>,
}

/// Regressions between a base product and a target product.
///
/// Returned by [`Analyzer::find_regressions`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegressionReport {
    /// The product compared against.
    pub base: SmolStr,

    /// The product checked for regressions.
    pub target: SmolStr,

    /// The number of results both products reported.
    pub total: usize,

    /// The number of compared results where either status has no severity.
    ///
    /// These are counted in `total` but never reported as regressions.
    pub unranked: usize,

    /// The results that got worse, in table order.
    pub regressions: Vec<Regression>,
}
