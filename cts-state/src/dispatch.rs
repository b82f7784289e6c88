// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    output::{OutputContext, OutputOpts, OutputWriter},
    Result,
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use cts_state_metadata::{CtsStateExitCode, StateTable};
use cts_state_runner::{
    chart,
    command::DuctCommandRunner,
    discovery::{SuiteList, DEFAULT_EXCLUDES},
    errors::{WriteEventError, WriteSummaryError},
    reporter::ConfirmReporterBuilder,
    runner::ConfirmRunner,
};
use std::io::Write;
use supports_color::Stream;
use tracing::debug;

/// The default location of the state table, relative to the working directory.
pub(crate) const DEFAULT_STATE_FILE: &str = "ci/cts_state.csv";

/// The default location the rendered chart is written to.
pub(crate) const DEFAULT_CHART_OUTPUT: &str = "resources/cts_state.svg";

/// Track a SYCL implementation's CTS conformance state.
#[derive(Debug, Parser)]
#[command(
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct CtsStateApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(subcommand)]
    command: Command,
}

impl CtsStateApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::Confirm(opts) => opts.exec(output, output_writer),
            Command::Render(opts) => opts.exec(output, output_writer),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Confirm the recorded state against a CTS checkout
    ///
    /// This command builds and runs every conformance suite found under
    /// `<CTS_ROOT>/tests`, classifies each outcome, and compares the outcomes
    /// against the recorded state table.
    ///
    /// Exits with code 1 if any suite deviates from its recorded state.
    Confirm(ConfirmOpts),
    /// Render the recorded state as an SVG chart
    ///
    /// This command aggregates the state table into per-status counts and
    /// draws them as a single horizontal stacked bar.
    Render(RenderOpts),
}

#[derive(Debug, Args)]
struct ConfirmOpts {
    /// Path to the SYCL CTS checkout
    #[arg(value_name = "CTS_ROOT")]
    cts_root: Utf8PathBuf,

    /// Path to the CMake build directory for the CTS
    #[arg(value_name = "BUILD_DIR")]
    build_dir: Utf8PathBuf,

    /// Path to the state table
    #[arg(long, value_name = "PATH", default_value = DEFAULT_STATE_FILE)]
    state_file: Utf8PathBuf,

    /// Exclude an additional directory under tests/
    ///
    /// The common/ and extension/ directories are always excluded. This
    /// argument may be specified multiple times.
    #[arg(long, value_name = "DIR")]
    exclude: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t, value_name = "FMT")]
    message_format: MessageFormatOpts,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
#[derive(Default)]
enum MessageFormatOpts {
    #[default]
    Human,
    Json,
}

impl ConfirmOpts {
    /// Execute the confirm command.
    fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let table = StateTable::from_file(&self.state_file)?;
        let excludes = DEFAULT_EXCLUDES
            .iter()
            .copied()
            .chain(self.exclude.iter().map(String::as_str));
        let suite_list = SuiteList::discover_with_excludes(&self.cts_root, excludes)?;

        let mut reporter = ConfirmReporterBuilder::default()
            .set_verbose(output.verbose)
            .build(&self.state_file);

        let mut runner = ConfirmRunner::new(
            &suite_list,
            &table,
            &self.cts_root,
            &self.build_dir,
            DuctCommandRunner::new(),
        );

        let summary = match self.message_format {
            MessageFormatOpts::Human => {
                if output.color.should_colorize(Stream::Stdout) {
                    reporter.colorize();
                }
                let mut writer = output_writer.stdout_writer();
                runner.try_execute(|event| {
                    // Write and flush the event.
                    reporter.report_event(event, &mut writer)?;
                    writer.flush().map_err(WriteEventError::Io)
                })?
            }
            MessageFormatOpts::Json => {
                // Progress goes to stderr so that stdout stays machine-readable.
                if output.color.should_colorize(Stream::Stderr) {
                    reporter.colorize();
                }
                let summary = {
                    let mut writer = output_writer.stderr_writer();
                    runner.try_execute(|event| {
                        reporter.report_event(event, &mut writer)?;
                        writer.flush().map_err(WriteEventError::Io)
                    })?
                };

                let json = summary.to_json_string().map_err(WriteSummaryError::Json)?;
                let mut writer = output_writer.stdout_writer();
                writeln!(writer, "{json}").map_err(WriteSummaryError::Io)?;
                writer.flush().map_err(WriteSummaryError::Io)?;
                summary
            }
        };

        if summary.has_changes() {
            Ok(CtsStateExitCode::STATE_MISMATCH)
        } else {
            Ok(CtsStateExitCode::OK)
        }
    }
}

#[derive(Debug, Args)]
struct RenderOpts {
    /// Path to the state table
    #[arg(long, value_name = "PATH", default_value = DEFAULT_STATE_FILE)]
    state_file: Utf8PathBuf,

    /// Path to write the SVG chart to
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CHART_OUTPUT)]
    output: Utf8PathBuf,

    /// Chart title
    #[arg(long, value_name = "TITLE", default_value = chart::DEFAULT_TITLE)]
    title: String,
}

impl RenderOpts {
    /// Execute the render command.
    fn exec(self, _output: OutputContext, _output_writer: &mut OutputWriter) -> Result<i32> {
        let table = StateTable::from_file(&self.state_file)?;
        chart::write_chart(&table, &self.title, &self.output)?;
        debug!("wrote chart to {}", self.output);
        Ok(CtsStateExitCode::OK)
    }
}
