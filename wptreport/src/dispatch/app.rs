// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level application and command routing.

use super::cli::{ConfigOpts, MessageFormatOpts, ProductLogOpts, RegressionsOpts};
use crate::{
    ExpectedError, Result,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::Utf8PathBuf;
use clap::Subcommand;
use std::io::Write;
use tracing::debug;
use wptreport_core::{
    aggregator::aggregate, analyzer::Analyzer, config::ReportConfig, errors::WriteReportError,
    product::ProductLog, reporter::ReportWriter,
};

/// Aggregate web-platform-tests results across products, and report failures and regressions.
///
/// Each product's results are read from a structured log in the line-delimited JSON format
/// produced by wptrunner.
#[derive(Debug, clap::Parser)]
#[command(version, max_term_width = 100)]
pub struct WptReportApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(flatten)]
    config: ConfigOpts,

    /// Output format
    #[arg(
        long,
        short = 'T',
        value_enum,
        default_value_t,
        global = true,
        value_name = "FORMAT",
        help_heading = "Output options"
    )]
    message_format: MessageFormatOpts,

    #[clap(subcommand)]
    command: Command,
}

impl WptReportApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<()> {
        let root = current_dir()?;
        let config = ReportConfig::from_sources(&root, self.config.config_file.as_deref())?;
        let profile = config.profile(&self.config.profile)?;
        debug!(profile = profile.name(), "using config profile");

        let mut writer = ReportWriter::new(self.message_format.to_report_format(output.verbose));
        if output.colorize_stdout() {
            writer.colorize();
        }

        let table = aggregate(self.command.logs())?;
        let analyzer = Analyzer::new(&table, profile.analysis_options());
        let mut stdout = output_writer.stdout_writer();

        match &self.command {
            Command::Results(_) => writer.write_results(&table, &mut stdout)?,
            Command::Summary(_) => writer.write_summary(&analyzer.summarize(), &mut stdout)?,
            Command::Failures { target, .. } => {
                writer.write_failures(&analyzer.find_failures(target)?, &mut stdout)?
            }
            Command::Regressions(opts) => {
                let (base, target) = opts.products();
                writer.write_regressions(&analyzer.find_regressions(base, target)?, &mut stdout)?
            }
        }

        stdout.flush().map_err(WriteReportError::Io)?;
        Ok(())
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every product's status for each test and subtest
    ///
    /// With `--message-format json`, this is a document with the list of products and the
    /// aggregated results in first-seen order.
    Results(ProductLogOpts),

    /// Print how many results ran and passed for each product
    Summary(ProductLogOpts),

    /// Print the results that didn't pass for one product
    Failures {
        /// Product to report failures for
        #[arg(long, value_name = "NAME")]
        target: String,

        #[clap(flatten)]
        logs: ProductLogOpts,
    },

    /// Print the results that got worse between two products
    Regressions(RegressionsOpts),
}

impl Command {
    fn logs(&self) -> &[ProductLog] {
        match self {
            Self::Results(opts) | Self::Summary(opts) => &opts.logs,
            Self::Failures { logs, .. } => &logs.logs,
            Self::Regressions(opts) => &opts.logs.logs,
        }
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir().map_err(ExpectedError::current_dir_invalid)?;
    Utf8PathBuf::try_from(dir).map_err(|err| ExpectedError::current_dir_invalid(err.into_io_error()))
}
