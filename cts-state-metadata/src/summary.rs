// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The machine-readable summary of a confirm run.

use crate::state::{ObservedStatus, SuiteStatus};
use serde::{Deserialize, Serialize};

/// Aggregate counters for a confirm run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfirmStats {
    /// The number of suites that built and ran successfully.
    pub passed: usize,

    /// The number of suites that built but failed to run.
    pub run_failed: usize,

    /// The number of suites that failed to build.
    pub build_failed: usize,

    /// The number of suites skipped because they are recorded as not
    /// applicable.
    pub skipped: usize,
}

impl ConfirmStats {
    /// The number of suites that were built and run (everything except
    /// skipped suites).
    pub fn executed(self) -> usize {
        self.passed + self.run_failed + self.build_failed
    }
}

/// A discrepancy between the recorded state table and a confirm run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StateChange {
    /// The suite the discrepancy applies to.
    pub suite: String,

    /// The status recorded in the table, or `None` if the suite is not
    /// listed.
    pub recorded: Option<SuiteStatus>,

    /// The status observed during the run.
    pub observed: ObservedStatus,
}

/// The summary of a confirm run, as written by
/// `cts-state confirm --message-format json`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfirmSummary {
    /// Aggregate counters for the run.
    pub stats: ConfirmStats,

    /// The discrepancies found, sorted by suite name.
    pub changes: Vec<StateChange>,
}

impl ConfirmSummary {
    /// Returns true if the run observed at least one discrepancy.
    ///
    /// This is what decides between [`CtsStateExitCode::OK`] and
    /// [`CtsStateExitCode::STATE_MISMATCH`].
    ///
    /// [`CtsStateExitCode::OK`]: crate::CtsStateExitCode::OK
    /// [`CtsStateExitCode::STATE_MISMATCH`]: crate::CtsStateExitCode::STATE_MISMATCH
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Serializes this summary to a pretty-printed JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a summary from its JSON form.
    pub fn parse_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }
}
