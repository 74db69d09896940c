// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ranking statuses by severity.
//!
//! A regression is a status that got *worse* between two products. "Worse" is defined by a
//! [`SeverityModel`]: a total order over a fixed set of statuses. Statuses outside that set are
//! unranked, and what happens when one of them shows up in a comparison is controlled by
//! [`UnrankedStatus`].

use crate::{errors::SeverityOrderError, status::Status};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A total order over a set of statuses, from least to most severe.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Status>")]
pub struct SeverityModel {
    order: IndexSet<Status>,
}

impl SeverityModel {
    /// Creates a new model from statuses listed in order of increasing severity.
    pub fn new(order: impl IntoIterator<Item = Status>) -> Result<Self, SeverityOrderError> {
        let mut set = IndexSet::new();
        for status in order {
            if let Some(status) = set.replace(status) {
                return Err(SeverityOrderError::Duplicate { status });
            }
        }
        if set.is_empty() {
            return Err(SeverityOrderError::Empty);
        }
        Ok(Self { order: set })
    }

    /// Returns the rank of a status, or `None` if the status is unranked.
    ///
    /// Higher ranks are more severe.
    pub fn severity(&self, status: &Status) -> Option<usize> {
        self.order.get_index_of(status)
    }

    /// Compares two statuses by severity, or returns `None` if either is unranked.
    pub fn compare(&self, a: &Status, b: &Status) -> Option<Ordering> {
        Some(self.severity(a)?.cmp(&self.severity(b)?))
    }

    /// Returns the ranked statuses in order of increasing severity.
    pub fn ranked(&self) -> impl ExactSizeIterator<Item = &Status> {
        self.order.iter()
    }
}

impl Default for SeverityModel {
    /// `OK` < `PASS` < `FAIL` < `ERROR` < `TIMEOUT` < `NOTRUN` < `CRASH`.
    fn default() -> Self {
        Self {
            order: [
                Status::OK,
                Status::PASS,
                Status::FAIL,
                Status::ERROR,
                Status::TIMEOUT,
                Status::NOTRUN,
                Status::CRASH,
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl TryFrom<Vec<Status>> for SeverityModel {
    type Error = SeverityOrderError;

    fn try_from(order: Vec<Status>) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl Serialize for SeverityModel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.order)
    }
}

/// What to do when a regression comparison involves an unranked status.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnrankedStatus {
    /// Count the pair towards the total, but never report it as a regression.
    #[default]
    Exclude,

    /// Fail the comparison.
    Error,
}
