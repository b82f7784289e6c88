// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming report of confirm runs.

use crate::errors::WriteEventError;
use camino::Utf8Path;
use cts_state_metadata::{ConfirmSummary, ObservedStatus, SuiteStatus};
use owo_colors::{OwoColorize, Style};
use std::io::{self, Write};

/// An event that occurs during a confirm run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfirmEvent<'a> {
    /// The run started.
    RunStarted {
        /// The number of discovered suites the run covers.
        suite_count: usize,
    },

    /// A suite was skipped because it is recorded as not applicable.
    SuiteSkipped {
        /// The suite name.
        suite: &'a str,
    },

    /// A suite is about to be built and run.
    SuiteStarted {
        /// The suite name.
        suite: &'a str,
    },

    /// A suite finished building and running.
    SuiteFinished {
        /// The suite name.
        suite: &'a str,

        /// The status recorded in the state table, if the suite is listed.
        recorded: Option<SuiteStatus>,

        /// The status that was observed.
        observed: ObservedStatus,
    },

    /// The run finished, including the comparison against the state table.
    RunFinished {
        /// The complete summary of the run.
        summary: &'a ConfirmSummary,
    },
}

/// Confirm reporter builder.
#[derive(Debug, Default)]
pub struct ConfirmReporterBuilder {
    verbose: bool,
}

impl ConfirmReporterBuilder {
    /// Sets verbose mode. A verbose reporter also announces the run and the
    /// skipped suites.
    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    /// Creates a new reporter for a run compared against `state_file`.
    pub fn build<'a>(&self, state_file: &'a Utf8Path) -> ConfirmReporter<'a> {
        ConfirmReporter {
            state_file,
            verbose: self.verbose,
            styles: Box::new(Styles::default()),
        }
    }
}

/// Renders [`ConfirmEvent`]s to a writer as they arrive: a progress line per
/// suite, the aggregate summary, and the discrepancy list.
#[derive(Debug)]
pub struct ConfirmReporter<'a> {
    state_file: &'a Utf8Path,
    verbose: bool,
    styles: Box<Styles>,
}

impl<'a> ConfirmReporter<'a> {
    /// Colorizes output.
    pub fn colorize(&mut self) {
        self.styles.colorize();
    }

    /// Report a confirm event.
    pub fn report_event(
        &mut self,
        event: ConfirmEvent<'_>,
        writer: impl Write,
    ) -> Result<(), WriteEventError> {
        self.write_event_impl(&event, writer)
            .map_err(WriteEventError::Io)
    }

    fn write_event_impl(
        &mut self,
        event: &ConfirmEvent<'_>,
        mut writer: impl Write,
    ) -> io::Result<()> {
        match event {
            ConfirmEvent::RunStarted { suite_count } => {
                if self.verbose {
                    writeln!(
                        writer,
                        "confirming {} suites against {}",
                        suite_count.style(self.styles.count),
                        self.state_file,
                    )?;
                }
            }
            ConfirmEvent::SuiteSkipped { suite } => {
                if self.verbose {
                    writeln!(
                        writer,
                        "skipping {suite} ({})",
                        "not applicable".style(self.styles.skip),
                    )?;
                }
            }
            ConfirmEvent::SuiteStarted { suite } => {
                write!(writer, "testing {suite}... ")?;
                // The status only arrives once the suite finishes; flush so
                // the line is visible while the build runs.
                writer.flush()?;
            }
            ConfirmEvent::SuiteFinished {
                recorded, observed, ..
            } => {
                let style = self.observed_style(*observed);
                match recorded {
                    Some(recorded) if observed.matches(*recorded) => {
                        writeln!(writer, "{}", observed.style(style))?;
                    }
                    Some(recorded) => {
                        writeln!(writer, "{}, but was {recorded}", observed.style(style))?;
                    }
                    None => {
                        writeln!(writer, "{}, but was not in list", observed.style(style))?;
                    }
                }
            }
            ConfirmEvent::RunFinished { summary } => {
                self.write_summary(summary, &mut writer)?;
            }
        }
        Ok(())
    }

    fn write_summary(&self, summary: &ConfirmSummary, mut writer: impl Write) -> io::Result<()> {
        let stats = &summary.stats;
        writeln!(writer)?;
        writeln!(
            writer,
            "{} passed, {} failed to run, {} failed to build",
            stats.passed.style(self.styles.pass),
            stats.run_failed.style(self.styles.fail),
            stats.build_failed.style(self.styles.fail),
        )?;

        if summary.has_changes() {
            writeln!(writer)?;
            writeln!(
                writer,
                "{} change(s) compared to {}:",
                summary.changes.len().style(self.styles.count),
                self.state_file,
            )?;
            for change in &summary.changes {
                match change.recorded {
                    Some(recorded) => writeln!(
                        writer,
                        "  - {}: {recorded} -> {}",
                        change.suite, change.observed,
                    )?,
                    None => writeln!(
                        writer,
                        "  - {}: not in list -> {}",
                        change.suite, change.observed,
                    )?,
                }
            }
        }
        Ok(())
    }

    fn observed_style(&self, observed: ObservedStatus) -> Style {
        match observed {
            ObservedStatus::Passed => self.styles.pass,
            ObservedStatus::RunFailed | ObservedStatus::BuildFailed => self.styles.fail,
            ObservedStatus::NotInCts => self.styles.skip,
        }
    }
}

#[derive(Debug, Default)]
struct Styles {
    count: Style,
    pass: Style,
    fail: Style,
    skip: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.count = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.skip = Style::new().yellow().bold();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cts_state_metadata::{ConfirmStats, StateChange};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn render(events: Vec<ConfirmEvent<'_>>, verbose: bool) -> String {
        let mut builder = ConfirmReporterBuilder::default();
        builder.set_verbose(verbose);
        let mut reporter = builder.build(Utf8Path::new("ci/cts_state.csv"));
        let mut out = Vec::new();
        for event in events {
            reporter.report_event(event, &mut out).expect("write succeeds");
        }
        String::from_utf8(out).expect("output is UTF-8")
    }

    #[test]
    fn clean_run_output() {
        let summary = ConfirmSummary {
            stats: ConfirmStats {
                passed: 1,
                run_failed: 1,
                build_failed: 0,
                skipped: 0,
            },
            changes: vec![],
        };
        let out = render(
            vec![
                ConfirmEvent::RunStarted { suite_count: 2 },
                ConfirmEvent::SuiteStarted {
                    suite: "atomic_ref",
                },
                ConfirmEvent::SuiteFinished {
                    suite: "atomic_ref",
                    recorded: Some(SuiteStatus::Passed),
                    observed: ObservedStatus::Passed,
                },
                ConfirmEvent::SuiteStarted { suite: "buffer" },
                ConfirmEvent::SuiteFinished {
                    suite: "buffer",
                    recorded: Some(SuiteStatus::RunFailed),
                    observed: ObservedStatus::RunFailed,
                },
                ConfirmEvent::RunFinished { summary: &summary },
            ],
            false,
        );

        assert_eq!(
            out,
            indoc! {"
                testing atomic_ref... passed
                testing buffer... run failed

                1 passed, 1 failed to run, 0 failed to build
            "}
        );
    }

    #[test]
    fn mismatch_and_change_list_output() {
        let summary = ConfirmSummary {
            stats: ConfirmStats {
                passed: 0,
                run_failed: 0,
                build_failed: 2,
                skipped: 0,
            },
            changes: vec![
                StateChange {
                    suite: "atomic_ref".to_owned(),
                    recorded: Some(SuiteStatus::Passed),
                    observed: ObservedStatus::BuildFailed,
                },
                StateChange {
                    suite: "usm".to_owned(),
                    recorded: Some(SuiteStatus::Passed),
                    observed: ObservedStatus::NotInCts,
                },
                StateChange {
                    suite: "vector_api".to_owned(),
                    recorded: None,
                    observed: ObservedStatus::BuildFailed,
                },
            ],
        };
        let out = render(
            vec![
                ConfirmEvent::SuiteStarted {
                    suite: "atomic_ref",
                },
                ConfirmEvent::SuiteFinished {
                    suite: "atomic_ref",
                    recorded: Some(SuiteStatus::Passed),
                    observed: ObservedStatus::BuildFailed,
                },
                ConfirmEvent::SuiteStarted {
                    suite: "vector_api",
                },
                ConfirmEvent::SuiteFinished {
                    suite: "vector_api",
                    recorded: None,
                    observed: ObservedStatus::BuildFailed,
                },
                ConfirmEvent::RunFinished { summary: &summary },
            ],
            false,
        );

        assert_eq!(
            out,
            indoc! {"
                testing atomic_ref... build failed, but was passed
                testing vector_api... build failed, but was not in list

                0 passed, 0 failed to run, 2 failed to build

                3 change(s) compared to ci/cts_state.csv:
                  - atomic_ref: passed -> build failed
                  - usm: passed -> not in CTS
                  - vector_api: not in list -> build failed
            "}
        );
    }

    #[test]
    fn verbose_run_reports_skips() {
        let out = render(
            vec![
                ConfirmEvent::RunStarted { suite_count: 1 },
                ConfirmEvent::SuiteSkipped {
                    suite: "hierarchical",
                },
            ],
            true,
        );

        assert_eq!(
            out,
            indoc! {"
                confirming 1 suites against ci/cts_state.csv
                skipping hierarchical (not applicable)
            "}
        );
    }

    #[test]
    fn quiet_run_omits_skips() {
        let out = render(
            vec![
                ConfirmEvent::RunStarted { suite_count: 1 },
                ConfirmEvent::SuiteSkipped {
                    suite: "hierarchical",
                },
            ],
            false,
        );
        assert_eq!(out, "");
    }
}
