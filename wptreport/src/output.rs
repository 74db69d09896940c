// Copyright (c) The wptreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output: color detection, the stderr logger and stdout capture.

use clap::{Args, ValueEnum};
use owo_colors::{OwoColorize, Style};
use std::{
    fmt,
    io::{self, BufWriter, Write},
    sync::Once,
};
use supports_color::Stream;
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
    warn,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// The environment variable that controls which log events are printed.
pub(crate) const LOG_ENV: &str = "WPTREPORT_LOG";

/// Log events with this target are printed without an `error: ` or `warning: ` heading.
pub(crate) const NO_HEADING_TARGET: &str = "wptreport::no_heading";

#[derive(Copy, Clone, Debug, Args)]
#[command(next_help_heading = "Output options")]
pub(crate) struct OutputOpts {
    /// Show subtests, run info and logged messages
    #[arg(long, short, global = true, env = "WPTREPORT_VERBOSE")]
    verbose: bool,

    /// When to color output
    #[arg(
        long,
        value_enum,
        default_value_t,
        global = true,
        value_name = "WHEN",
        env = "WPTREPORT_COLOR"
    )]
    color: Color,
}

impl OutputOpts {
    /// Sets up logging to stderr and returns the settings the rest of the run uses.
    pub(crate) fn init(self) -> OutputContext {
        init_logger(self.color.enabled_for(Stream::Stderr));
        OutputContext {
            verbose: self.verbose,
            color: self.color,
        }
    }
}

/// Output settings shared by every command.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) verbose: bool,
    color: Color,
}

impl OutputContext {
    /// Returns the styles used when printing errors.
    pub fn stderr_styles(&self) -> StderrStyles {
        if self.color.enabled_for(Stream::Stderr) {
            StderrStyles::colorized()
        } else {
            StderrStyles::default()
        }
    }

    /// Returns true if reports written to stdout should be colorized.
    pub(crate) fn colorize_stdout(&self) -> bool {
        self.color.enabled_for(Stream::Stdout)
    }
}

/// When to produce colored output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Color {
    /// Color if the stream is a terminal that supports it
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl Color {
    fn enabled_for(self, stream: Stream) -> bool {
        match self {
            Self::Auto => supports_color::on_cached(stream).is_some_and(|level| level.has_basic),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Styles for errors printed to stderr.
#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
    pub(crate) product: Style,
}

impl StderrStyles {
    fn colorized() -> Self {
        Self {
            bold: Style::new().bold(),
            product: Style::new().magenta().bold(),
        }
    }
}

// ---
// Logging
// ---

static LOGGER: Once = Once::new();

fn init_logger(colorize: bool) {
    LOGGER.call_once(|| {
        let value = std::env::var(LOG_ENV).ok();
        let (targets, invalid) = log_targets(value.as_deref());

        let layer = tracing_subscriber::fmt::layer()
            .event_format(HeadingFormat { colorize })
            .with_writer(io::stderr)
            .with_filter(targets);
        tracing_subscriber::registry().with(layer).init();

        if let Some(message) = invalid {
            warn!("{message}");
        }
    });
}

/// Parses the log filter from the value of `WPTREPORT_LOG`.
///
/// An unset or empty value selects `info` and above. An invalid value also selects the default,
/// and is returned alongside it so the caller can report it once logging is up.
fn log_targets(value: Option<&str>) -> (Targets, Option<String>) {
    let default = Targets::new().with_default(LevelFilter::INFO);
    match value {
        None | Some("") => (default, None),
        Some(value) => match value.parse::<Targets>() {
            Ok(targets) => (targets, None),
            Err(err) => (default, Some(format!("ignoring invalid {LOG_ENV} `{value}`: {err}"))),
        },
    }
}

/// Prints each event as `level: message`, dropping every field other than the message.
struct HeadingFormat {
    colorize: bool,
}

impl HeadingFormat {
    fn heading(&self, level: Level) -> (&'static str, Style) {
        let (heading, style) = match level {
            Level::ERROR => ("error", Style::new().red().bold()),
            Level::WARN => ("warning", Style::new().yellow().bold()),
            Level::INFO => ("info", Style::new().bold()),
            Level::DEBUG => ("debug", Style::new().bold()),
            Level::TRACE => ("trace", Style::new().dimmed()),
        };
        (heading, if self.colorize { style } else { Style::new() })
    }
}

impl<S, N> FormatEvent<S, N> for HeadingFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        if metadata.target() != NO_HEADING_TARGET {
            let (heading, style) = self.heading(*metadata.level());
            write!(writer, "{}: ", heading.style(style))?;
        }

        let mut message = MessageField::default();
        event.record(&mut message);
        writeln!(writer, "{}", message.0)
    }
}

/// Collects the `message` field of an event.
#[derive(Default)]
struct MessageField(String);

impl Visit for MessageField {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

// ---
// Stdout
// ---

/// Where reports are written.
///
/// Tests use the captured variant to read back what a command printed.
#[derive(Default)]
pub enum OutputWriter {
    /// Write to the process's stdout.
    #[default]
    Terminal,
    /// Collect output in memory.
    #[cfg(test)]
    Captured {
        /// Everything written to stdout so far.
        stdout: Vec<u8>,
    },
}

impl OutputWriter {
    #[cfg(test)]
    pub(crate) fn new_test() -> Self {
        Self::Captured { stdout: Vec::new() }
    }

    #[cfg(test)]
    pub(crate) fn stdout(&self) -> Option<&[u8]> {
        match self {
            Self::Terminal => None,
            Self::Captured { stdout } => Some(stdout),
        }
    }

    /// Returns a buffered writer for stdout. Callers must flush it.
    pub(crate) fn stdout_writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Self::Terminal => Box::new(BufWriter::new(io::stdout().lock())),
            #[cfg(test)]
            Self::Captured { stdout } => Box::new(stdout),
        }
    }
}
