// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Renders result tables and analysis reports.
//!
//! The main structure in this module is [`ReportWriter`], which writes either human-readable
//! text or JSON.

use crate::{
    analyzer::{FailureReport, RegressionReport, Summary},
    errors::WriteReportError,
    product::ProductList,
    results::{ResultTable, RunInfo, StatusSlots},
    status::Status,
};
use indexmap::IndexMap;
use owo_colors::{OwoColorize, Style};
use serde::{Serialize, Serializer};
use std::{fmt, io};
use wptreport_metadata::TestId;

/// The format reports are written in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReportFormat {
    /// A human-readable format.
    Human {
        /// Whether to produce verbose output.
        verbose: bool,
    },

    /// A machine-readable format.
    Serializable(SerializableFormat),
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self::Human { verbose: false }
    }
}

/// A serialized, machine-readable output format.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SerializableFormat {
    /// JSON with no whitespace.
    Json,
    /// JSON, prettified.
    JsonPretty,
}

impl SerializableFormat {
    /// Writes this data in the given format to the writer, followed by a newline.
    pub fn to_writer(
        self,
        value: &impl Serialize,
        mut writer: impl io::Write,
    ) -> Result<(), WriteReportError> {
        match self {
            SerializableFormat::Json => serde_json::to_writer(&mut writer, value)?,
            SerializableFormat::JsonPretty => serde_json::to_writer_pretty(&mut writer, value)?,
        }
        writeln!(writer)?;
        Ok(())
    }
}

/// Writes results and reports in a [`ReportFormat`].
#[derive(Clone, Debug, Default)]
pub struct ReportWriter {
    format: ReportFormat,
    styles: Styles,
}

impl ReportWriter {
    /// Creates a new writer. Output is uncolored until [`colorize`](Self::colorize) is called.
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            styles: Styles::default(),
        }
    }

    /// Colorizes human-readable output.
    pub fn colorize(&mut self) {
        self.styles.colorize();
    }

    /// Writes the aggregated results of every product.
    pub fn write_results(
        &self,
        table: &ResultTable,
        mut writer: impl io::Write,
    ) -> Result<(), WriteReportError> {
        match self.format {
            ReportFormat::Human { verbose } => {
                self.write_results_human(table, verbose, &mut writer)?;
                Ok(())
            }
            ReportFormat::Serializable(format) => {
                format.to_writer(&ResultsDocument::new(table), writer)
            }
        }
    }

    /// Writes pass counts for every product.
    pub fn write_summary(
        &self,
        summary: &Summary,
        mut writer: impl io::Write,
    ) -> Result<(), WriteReportError> {
        match self.format {
            ReportFormat::Human { .. } => {
                for (product, counts) in summary.iter() {
                    writeln!(
                        writer,
                        "{}: {} ran, {} passed, {} failed",
                        product.style(self.styles.product),
                        counts.ran.style(self.styles.count),
                        counts.passed.style(self.styles.count),
                        counts.failed().style(self.styles.count),
                    )?;
                }
                Ok(())
            }
            ReportFormat::Serializable(format) => format.to_writer(summary, writer),
        }
    }

    /// Writes the failures of a single product.
    pub fn write_failures(
        &self,
        report: &FailureReport,
        mut writer: impl io::Write,
    ) -> Result<(), WriteReportError> {
        match self.format {
            ReportFormat::Human { verbose } => {
                for failure in &report.failures {
                    writeln!(
                        writer,
                        "{} {}",
                        self.status_cell(&failure.status, Alignment::Right),
                        self.display_test(&failure.test, failure.subtest.as_deref()),
                    )?;
                    if verbose {
                        self.write_message(
                            failure.message.as_deref(),
                            FAILURE_INDENT,
                            &mut writer,
                        )?;
                    }
                }
                writeln!(writer, "------------")?;
                writeln!(
                    writer,
                    "{}: {} of {} results did not pass",
                    report.target.style(self.styles.product),
                    report.failures.len().style(self.styles.count),
                    report.total.style(self.styles.count),
                )?;
                Ok(())
            }
            ReportFormat::Serializable(format) => format.to_writer(report, writer),
        }
    }

    /// Writes the regressions between two products.
    pub fn write_regressions(
        &self,
        report: &RegressionReport,
        mut writer: impl io::Write,
    ) -> Result<(), WriteReportError> {
        match self.format {
            ReportFormat::Human { verbose } => {
                for regression in &report.regressions {
                    writeln!(
                        writer,
                        "{} -> {} {}",
                        self.status_cell(&regression.base_status, Alignment::Right),
                        self.status_cell(&regression.target_status, Alignment::Left),
                        self.display_test(&regression.test, regression.subtest.as_deref()),
                    )?;
                    if verbose {
                        self.write_message(
                            regression.message.as_deref(),
                            REGRESSION_INDENT,
                            &mut writer,
                        )?;
                    }
                }
                writeln!(writer, "------------")?;
                write!(
                    writer,
                    "{} -> {}: {} of {} compared results regressed",
                    report.base.style(self.styles.product),
                    report.target.style(self.styles.product),
                    report.regressions.len().style(self.styles.count),
                    report.total.style(self.styles.count),
                )?;
                if report.unranked > 0 {
                    write!(
                        writer,
                        " ({} could not be ranked)",
                        report.unranked.style(self.styles.count)
                    )?;
                }
                writeln!(writer)?;
                Ok(())
            }
            ReportFormat::Serializable(format) => format.to_writer(report, writer),
        }
    }

    // ---
    // Helper methods
    // ---

    fn write_results_human(
        &self,
        table: &ResultTable,
        verbose: bool,
        writer: &mut dyn io::Write,
    ) -> io::Result<()> {
        let products = table.products();
        let width = products
            .iter()
            .map(str::len)
            .chain(std::iter::once(STATUS_WIDTH))
            .max()
            .unwrap_or(STATUS_WIDTH);

        if verbose {
            for (index, product) in products.iter().enumerate() {
                if let Some(run_info) = table.run_info(index) {
                    let run_info = serde_json::to_string(run_info).map_err(io::Error::other)?;
                    writeln!(
                        writer,
                        "run info for {}: {run_info}",
                        product.style(self.styles.product)
                    )?;
                }
            }
        }

        for product in products.iter() {
            write!(
                writer,
                "{} ",
                format!("{product:<width$}").style(self.styles.product)
            )?;
        }
        writeln!(writer, "test")?;

        for record in table.records() {
            self.write_slots(record.test_status(), width, writer)?;
            writeln!(writer, "{}", record.id().style(self.styles.test_id))?;
            if verbose {
                for (name, slots) in record.subtests() {
                    self.write_slots(slots, width, writer)?;
                    writeln!(writer, "  {}", name.style(self.styles.subtest))?;
                }
            }
        }

        Ok(())
    }

    fn write_slots(
        &self,
        slots: &StatusSlots,
        width: usize,
        writer: &mut dyn io::Write,
    ) -> io::Result<()> {
        for slot in slots.iter() {
            match slot {
                Some(status) => write!(
                    writer,
                    "{} ",
                    format!("{status:<width$}").style(self.styles.status(status))
                )?,
                None => write!(writer, "{:<width$} ", "-")?,
            }
        }
        Ok(())
    }

    /// Writes a logged message under its result, lined up with the test name.
    fn write_message(
        &self,
        message: Option<&str>,
        indent: usize,
        writer: &mut impl io::Write,
    ) -> io::Result<()> {
        let Some(message) = message else {
            return Ok(());
        };
        for line in message.lines() {
            writeln!(writer, "{:indent$}{}", "", line.style(self.styles.message))?;
        }
        Ok(())
    }

    fn status_cell(&self, status: &Status, alignment: Alignment) -> impl fmt::Display {
        let padded = match alignment {
            Alignment::Left => format!("{status:<STATUS_WIDTH$}"),
            Alignment::Right => format!("{status:>STATUS_WIDTH$}"),
        };
        self.styles.status(status).style(padded)
    }

    fn display_test<'a>(&'a self, test: &'a TestId, subtest: Option<&'a str>) -> DisplayTest<'a> {
        DisplayTest {
            test,
            subtest,
            styles: &self.styles,
        }
    }
}

/// The width of the longest ranked status, `TIMEOUT`.
const STATUS_WIDTH: usize = 7;

/// Where the test name starts on a failure line: `{status} {test}`.
const FAILURE_INDENT: usize = STATUS_WIDTH + 1;

/// Where the test name starts on a regression line: `{base} -> {target} {test}`.
const REGRESSION_INDENT: usize = 2 * STATUS_WIDTH + 5;

#[derive(Clone, Copy, Debug)]
enum Alignment {
    Left,
    Right,
}

struct DisplayTest<'a> {
    test: &'a TestId,
    subtest: Option<&'a str>,
    styles: &'a Styles,
}

impl fmt::Display for DisplayTest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.test.style(self.styles.test_id))?;
        if let Some(subtest) = self.subtest {
            write!(f, " > {}", subtest.style(self.styles.subtest))?;
        }
        Ok(())
    }
}

/// The serialized form of a [`ResultTable`].
#[derive(Serialize)]
struct ResultsDocument<'a> {
    products: &'a ProductList,
    run_info: IndexMap<&'a str, &'a RunInfo>,
    #[serde(serialize_with = "serialize_records")]
    results: &'a ResultTable,
}

impl<'a> ResultsDocument<'a> {
    fn new(table: &'a ResultTable) -> Self {
        let run_info = table
            .products()
            .iter()
            .enumerate()
            .filter_map(|(index, product)| Some((product, table.run_info(index)?)))
            .collect();
        Self {
            products: table.products(),
            run_info,
            results: table,
        }
    }
}

fn serialize_records<S: Serializer>(
    table: &&ResultTable,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(table.records())
}

#[derive(Clone, Debug, Default)]
struct Styles {
    product: Style,
    count: Style,
    test_id: Style,
    subtest: Style,
    message: Style,
    pass: Style,
    fail: Style,
    error: Style,
    timeout: Style,
    crash: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.product = Style::new().bold();
        self.count = Style::new().bold();
        self.test_id = Style::new().cyan().bold();
        self.subtest = Style::new().cyan();
        self.message = Style::new().dimmed();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.error = Style::new().yellow().bold();
        self.timeout = Style::new().blue().bold();
        self.crash = Style::new().bold();
    }

    fn status(&self, status: &Status) -> Style {
        match status.as_str() {
            "PASS" | "OK" => self.pass,
            "FAIL" => self.fail,
            "ERROR" => self.error,
            "TIMEOUT" | "NOTRUN" => self.timeout,
            "CRASH" => self.crash,
            _ => Style::new(),
        }
    }
}
