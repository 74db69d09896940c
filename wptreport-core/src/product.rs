// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Products under comparison.
//!
//! A product is one configuration of the thing being tested: a browser engine, a build, a set of
//! preferences. Every product's results are stored at a fixed index, its position in the
//! [`ProductList`].

use crate::errors::{ProductListError, ProductLogParseError, UnknownProductError};
use camino::Utf8PathBuf;
use indexmap::IndexSet;
use serde::Serialize;
use smol_str::SmolStr;
use std::{fmt, str::FromStr};

/// An ordered list of distinct product names.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProductList {
    names: IndexSet<SmolStr>,
}

impl ProductList {
    /// Creates a new product list, in the given order.
    ///
    /// Returns an error if a name is empty or appears more than once.
    pub fn new(
        names: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> Result<Self, ProductListError> {
        let mut set = IndexSet::new();
        for name in names {
            let name = name.into();
            if name.is_empty() {
                return Err(ProductListError::EmptyName);
            }
            if let Some(name) = set.replace(name) {
                return Err(ProductListError::Duplicate { name });
            }
        }
        Ok(Self { names: set })
    }

    /// Returns the number of products.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if there are no products.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the index of a product, or an error if the product isn't in this list.
    pub fn index_of(&self, name: &str) -> Result<usize, UnknownProductError> {
        self.names
            .get_index_of(name)
            .ok_or_else(|| UnknownProductError::new(name, self.names.iter().cloned()))
    }

    /// Returns the name of the product at the given index.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get_index(index).map(SmolStr::as_str)
    }

    /// Iterates over product names in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> {
        self.names.iter().map(SmolStr::as_str)
    }
}

/// A product paired with the structured log holding its results.
///
/// Parsed from arguments of the form `product:path`. The input is split on the first `:`, so
/// paths may themselves contain colons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductLog {
    /// The name of the product.
    pub product: SmolStr,

    /// The path to the log.
    pub log_path: Utf8PathBuf,
}

impl ProductLog {
    /// Creates a new `ProductLog`.
    pub fn new(product: impl Into<SmolStr>, log_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            product: product.into(),
            log_path: log_path.into(),
        }
    }
}

impl FromStr for ProductLog {
    type Err = ProductLogParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.split_once(':') {
            Some((product, log_path)) => {
                if product.is_empty() {
                    Err(ProductLogParseError::EmptyProduct {
                        input: input.to_owned(),
                    })
                } else if log_path.is_empty() {
                    Err(ProductLogParseError::EmptyPath {
                        input: input.to_owned(),
                    })
                } else {
                    Ok(Self::new(product, log_path))
                }
            }
            None => Err(ProductLogParseError::InvalidFormat {
                input: input.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ProductLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.product, self.log_path)
    }
}
