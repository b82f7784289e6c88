// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The confirm driver: build, run and classify every CTS suite.

use crate::{
    command::{CommandRunner, CommandSpec, CommandStatus},
    discovery::SuiteList,
    errors::ConfirmRunError,
    reporter::ConfirmEvent,
};
use camino::Utf8Path;
use cts_state_metadata::{
    ConfirmStats, ConfirmSummary, ObservedStatus, StateChange, StateTable, SuiteStatus,
};
use tracing::debug;

/// Drives a confirm run: builds and runs every discovered suite, classifies
/// the outcomes and compares them against the recorded state table.
///
/// Suites are processed strictly sequentially, in name order. Each suite is
/// first built via `cmake --build <build_dir> --target test_<suite>`; only if
/// the build succeeds is `<build_dir>/bin/test_<suite>` run. Suites recorded
/// as `not applicable` are skipped entirely.
pub struct ConfirmRunner<'a, R> {
    suite_list: &'a SuiteList,
    table: &'a StateTable,
    cts_root: &'a Utf8Path,
    build_dir: &'a Utf8Path,
    command_runner: R,
}

impl<'a, R: CommandRunner> ConfirmRunner<'a, R> {
    /// Creates a new confirm runner.
    pub fn new(
        suite_list: &'a SuiteList,
        table: &'a StateTable,
        cts_root: &'a Utf8Path,
        build_dir: &'a Utf8Path,
        command_runner: R,
    ) -> Self {
        Self {
            suite_list,
            table,
            cts_root,
            build_dir,
            command_runner,
        }
    }

    /// Executes the confirm run.
    ///
    /// The callback is called with an event for each step. If the callback
    /// returns an error, the run is abandoned.
    pub fn try_execute<E, F>(
        &mut self,
        mut callback: F,
    ) -> Result<ConfirmSummary, ConfirmRunError<E>>
    where
        F: FnMut(ConfirmEvent<'_>) -> Result<(), E>,
    {
        let mut stats = ConfirmStats::default();
        let mut changes = Vec::new();

        callback(ConfirmEvent::RunStarted {
            suite_count: self.suite_list.len(),
        })
        .map_err(|error| ConfirmRunError::Callback { error })?;

        for suite in self.suite_list.suites() {
            let recorded = self.table.status_for(suite);
            if recorded == Some(SuiteStatus::NotApplicable) {
                stats.skipped += 1;
                callback(ConfirmEvent::SuiteSkipped { suite })
                    .map_err(|error| ConfirmRunError::Callback { error })?;
                continue;
            }

            callback(ConfirmEvent::SuiteStarted { suite })
                .map_err(|error| ConfirmRunError::Callback { error })?;

            let build = CommandSpec::build_suite(self.build_dir, self.cts_root, suite);
            let observed = if self.run_command(&build)?.is_success() {
                let run = CommandSpec::run_suite(self.build_dir, self.cts_root, suite);
                if self.run_command(&run)?.is_success() {
                    stats.passed += 1;
                    ObservedStatus::Passed
                } else {
                    stats.run_failed += 1;
                    ObservedStatus::RunFailed
                }
            } else {
                stats.build_failed += 1;
                ObservedStatus::BuildFailed
            };

            match recorded {
                Some(recorded) if observed.matches(recorded) => {}
                _ => changes.push(StateChange {
                    suite: suite.clone(),
                    recorded,
                    observed,
                }),
            }

            callback(ConfirmEvent::SuiteFinished {
                suite,
                recorded,
                observed,
            })
            .map_err(|error| ConfirmRunError::Callback { error })?;
        }

        // Table suites absent from the tree, except records marked not
        // applicable.
        for record in self.table.records() {
            if record.status == SuiteStatus::NotApplicable {
                continue;
            }
            if !self.suite_list.contains(&record.suite) {
                changes.push(StateChange {
                    suite: record.suite.clone(),
                    recorded: Some(record.status),
                    observed: ObservedStatus::NotInCts,
                });
            }
        }

        changes.sort_by(|a, b| a.suite.cmp(&b.suite));

        let summary = ConfirmSummary { stats, changes };
        callback(ConfirmEvent::RunFinished { summary: &summary })
            .map_err(|error| ConfirmRunError::Callback { error })?;
        Ok(summary)
    }

    fn run_command<E>(&mut self, spec: &CommandSpec) -> Result<CommandStatus, ConfirmRunError<E>> {
        debug!("running `{}`", spec.display_command());
        self.command_runner
            .run(spec)
            .map_err(|error| ConfirmRunError::Exec {
                command: spec.display_command(),
                error,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{convert::Infallible, io};

    const CTS_ROOT: &str = "/work/cts";
    const BUILD_DIR: &str = "/work/build";

    fn table(contents: &str) -> StateTable {
        StateTable::parse(Utf8Path::new("ci/cts_state.csv"), contents).expect("valid table")
    }

    fn suite_list(names: &[&str]) -> SuiteList {
        SuiteList::new("/work/cts/tests", names.iter().map(|name| name.to_string()))
    }

    fn label(event: &ConfirmEvent<'_>) -> String {
        match event {
            ConfirmEvent::RunStarted { suite_count } => format!("start({suite_count})"),
            ConfirmEvent::SuiteSkipped { suite } => format!("skip({suite})"),
            ConfirmEvent::SuiteStarted { suite } => format!("testing({suite})"),
            ConfirmEvent::SuiteFinished {
                suite, observed, ..
            } => format!("finish({suite}, {observed})"),
            ConfirmEvent::RunFinished { .. } => "done".to_owned(),
        }
    }

    /// Runs a confirm over `names` and `table_contents`, answering build and
    /// run commands from `script`, and returns the summary, the command log
    /// and the event log.
    fn run_confirm(
        names: &[&str],
        table_contents: &str,
        mut script: impl FnMut(&CommandSpec) -> io::Result<CommandStatus>,
    ) -> (ConfirmSummary, Vec<CommandSpec>, Vec<String>) {
        let list = suite_list(names);
        let table = table(table_contents);
        let mut calls = Vec::new();
        let mut events = Vec::new();

        let summary = ConfirmRunner::new(
            &list,
            &table,
            Utf8Path::new(CTS_ROOT),
            Utf8Path::new(BUILD_DIR),
            |spec: &CommandSpec| {
                calls.push(spec.clone());
                script(spec)
            },
        )
        .try_execute(|event| {
            events.push(label(&event));
            Ok::<_, Infallible>(())
        })
        .expect("run succeeds");

        (summary, calls, events)
    }

    #[test]
    fn all_match_is_clean() {
        let (summary, calls, events) = run_confirm(
            &["atomic_ref", "buffer"],
            "suite;status\natomic_ref;passed\nbuffer;passed\n",
            |_| Ok(CommandStatus::Success),
        );

        assert_eq!(
            summary.stats,
            ConfirmStats {
                passed: 2,
                run_failed: 0,
                build_failed: 0,
                skipped: 0,
            }
        );
        assert!(!summary.has_changes());
        // Build then run, for each suite in name order.
        assert_eq!(
            calls,
            [
                CommandSpec::build_suite(
                    Utf8Path::new(BUILD_DIR),
                    Utf8Path::new(CTS_ROOT),
                    "atomic_ref"
                ),
                CommandSpec::run_suite(
                    Utf8Path::new(BUILD_DIR),
                    Utf8Path::new(CTS_ROOT),
                    "atomic_ref"
                ),
                CommandSpec::build_suite(
                    Utf8Path::new(BUILD_DIR),
                    Utf8Path::new(CTS_ROOT),
                    "buffer"
                ),
                CommandSpec::run_suite(
                    Utf8Path::new(BUILD_DIR),
                    Utf8Path::new(CTS_ROOT),
                    "buffer"
                ),
            ]
        );
        assert_eq!(
            events,
            [
                "start(2)",
                "testing(atomic_ref)",
                "finish(atomic_ref, passed)",
                "testing(buffer)",
                "finish(buffer, passed)",
                "done",
            ]
        );
    }

    #[test]
    fn not_applicable_suite_is_never_invoked() {
        let (summary, calls, events) = run_confirm(
            &["atomic_ref", "hierarchical"],
            "suite;status\natomic_ref;passed\nhierarchical;not applicable\n",
            |_| Ok(CommandStatus::Success),
        );

        assert_eq!(summary.stats.skipped, 1);
        assert_eq!(summary.stats.passed, 1);
        assert!(!summary.has_changes());
        assert!(
            calls.iter().all(|spec| !spec.display_command().contains("hierarchical")),
            "no command mentions the skipped suite: {calls:?}"
        );
        assert_eq!(calls.len(), 2);
        assert_eq!(
            events,
            [
                "start(2)",
                "testing(atomic_ref)",
                "finish(atomic_ref, passed)",
                "skip(hierarchical)",
                "done",
            ]
        );
    }

    #[test]
    fn build_failure_skips_the_run_step() {
        let (summary, calls, _) = run_confirm(
            &["atomic_ref"],
            "suite;status\natomic_ref;build failed\n",
            |spec| {
                assert_eq!(spec.program(), "cmake", "only the build step runs");
                Ok(CommandStatus::Failure)
            },
        );

        assert_eq!(summary.stats.build_failed, 1);
        assert_eq!(calls.len(), 1, "the test executable is never run");
        // The observation matches the recorded status, so this is clean.
        assert!(!summary.has_changes());
    }

    #[test]
    fn executed_counts_add_up() {
        let (summary, _, _) = run_confirm(
            &["atomic_ref", "buffer", "hierarchical", "usm"],
            indoc::indoc! {"
                suite;status
                atomic_ref;passed
                buffer;build failed
                hierarchical;not applicable
                usm;run failed
            "},
            |spec| {
                if spec.display_command().contains("buffer") {
                    Ok(CommandStatus::Failure)
                } else if spec.program().ends_with("test_usm") {
                    Ok(CommandStatus::Failure)
                } else {
                    Ok(CommandStatus::Success)
                }
            },
        );

        assert_eq!(
            summary.stats,
            ConfirmStats {
                passed: 1,
                run_failed: 1,
                build_failed: 1,
                skipped: 1,
            }
        );
        assert_eq!(summary.stats.executed() + summary.stats.skipped, 4);
        assert!(!summary.has_changes());
    }

    #[test]
    fn table_suite_missing_from_tree_is_a_change() {
        let (summary, _, _) = run_confirm(
            &["atomic_ref", "hierarchical"],
            indoc::indoc! {"
                suite;status
                atomic_ref;passed
                hierarchical;not applicable
                usm;passed
            "},
            |_| Ok(CommandStatus::Success),
        );

        assert_eq!(summary.stats.passed, 1);
        assert_eq!(summary.stats.skipped, 1);
        assert_eq!(
            summary.changes,
            [StateChange {
                suite: "usm".to_owned(),
                recorded: Some(SuiteStatus::Passed),
                observed: ObservedStatus::NotInCts,
            }]
        );
    }

    #[test]
    fn not_applicable_absent_from_tree_is_not_a_change() {
        let (summary, calls, _) = run_confirm(
            &[],
            "suite;status\nusm;not applicable\n",
            |_| Ok(CommandStatus::Success),
        );

        assert!(!summary.has_changes());
        assert!(calls.is_empty());
    }

    #[test]
    fn unlisted_suite_is_a_change() {
        let (summary, _, _) = run_confirm(&["atomic_ref"], "suite;status\n", |_| {
            Ok(CommandStatus::Failure)
        });

        assert_eq!(summary.stats.build_failed, 1);
        assert_eq!(
            summary.changes,
            [StateChange {
                suite: "atomic_ref".to_owned(),
                recorded: None,
                observed: ObservedStatus::BuildFailed,
            }]
        );
    }

    #[test]
    fn changes_are_sorted_by_suite() {
        let (summary, _, _) = run_confirm(
            &["buffer", "usm"],
            "suite;status\nbuffer;passed\nusm;passed\natomic_ref;passed\n",
            |spec| {
                if spec.program() == "cmake" {
                    Ok(CommandStatus::Success)
                } else {
                    Ok(CommandStatus::Failure)
                }
            },
        );

        let suites: Vec<_> = summary
            .changes
            .iter()
            .map(|change| change.suite.as_str())
            .collect();
        assert_eq!(suites, ["atomic_ref", "buffer", "usm"]);
    }

    #[test]
    fn launch_failure_aborts_the_run() {
        let list = suite_list(&["atomic_ref"]);
        let table = table("suite;status\natomic_ref;passed\n");

        let err = ConfirmRunner::new(
            &list,
            &table,
            Utf8Path::new(CTS_ROOT),
            Utf8Path::new(BUILD_DIR),
            |_spec: &CommandSpec| {
                Err(io::Error::new(io::ErrorKind::NotFound, "cmake not found"))
            },
        )
        .try_execute(|_event| Ok::<_, Infallible>(()))
        .unwrap_err();

        let ConfirmRunError::Exec { command, .. } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(command, "cmake --build /work/build --target test_atomic_ref");
    }

    #[test]
    fn callback_error_aborts_the_run() {
        let list = suite_list(&["atomic_ref"]);
        let table = table("suite;status\natomic_ref;passed\n");
        let mut calls = 0;

        let err = ConfirmRunner::new(
            &list,
            &table,
            Utf8Path::new(CTS_ROOT),
            Utf8Path::new(BUILD_DIR),
            |_spec: &CommandSpec| {
                calls += 1;
                Ok(CommandStatus::Success)
            },
        )
        .try_execute(|_event| Err("writer gone"))
        .unwrap_err();

        assert!(
            matches!(err, ConfirmRunError::Callback { error: "writer gone" }),
            "unexpected error: {err:?}"
        );
        assert_eq!(calls, 0, "no command run after the callback fails");
    }
}
