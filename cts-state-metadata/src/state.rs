// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The recorded conformance state table and its status values.

use crate::errors::{StateTableError, StateTableParseError, SuiteStatusParseError};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, fs, str::FromStr};

/// The delimiter between the fields of a state table row.
pub const STATE_TABLE_DELIMITER: char = ';';

/// The header row every state table starts with.
pub const STATE_TABLE_HEADER: &str = "suite;status";

/// The status recorded for a CTS suite in the state table.
///
/// The `Display` forms are exactly the values that appear in the state table:
/// `passed`, `run failed`, `build failed` and `not applicable`. The serde
/// forms (used in the JSON summary) are kebab-case.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuiteStatus {
    /// The suite's test target built and its executable exited successfully.
    Passed,

    /// The suite's test target built, but its executable exited with a
    /// non-zero code.
    RunFailed,

    /// Building the suite's test target failed.
    BuildFailed,

    /// The suite does not apply to this implementation. It is never built or
    /// run, and its absence from the CTS tree is not a discrepancy.
    NotApplicable,
}

impl SuiteStatus {
    /// All statuses, in the canonical reporting order.
    ///
    /// This is the segment order of the state chart and the field order of
    /// [`StatusCounts`].
    pub const ALL: [SuiteStatus; 4] = [
        SuiteStatus::Passed,
        SuiteStatus::RunFailed,
        SuiteStatus::BuildFailed,
        SuiteStatus::NotApplicable,
    ];

    /// Returns string representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["passed", "run failed", "build failed", "not applicable"]
    }
}

impl FromStr for SuiteStatus {
    type Err = SuiteStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val = match s {
            "passed" => SuiteStatus::Passed,
            "run failed" => SuiteStatus::RunFailed,
            "build failed" => SuiteStatus::BuildFailed,
            "not applicable" => SuiteStatus::NotApplicable,
            other => return Err(SuiteStatusParseError::new(other)),
        };
        Ok(val)
    }
}

impl fmt::Display for SuiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiteStatus::Passed => write!(f, "passed"),
            SuiteStatus::RunFailed => write!(f, "run failed"),
            SuiteStatus::BuildFailed => write!(f, "build failed"),
            SuiteStatus::NotApplicable => write!(f, "not applicable"),
        }
    }
}

/// The status observed for a suite during a confirm run.
///
/// Unlike [`SuiteStatus`], an observation can never be `not applicable`
/// (suites recorded as not applicable are skipped), but it can be
/// [`NotInCts`](Self::NotInCts) for a recorded suite that is absent from the
/// CTS tree.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservedStatus {
    /// The suite built and its executable exited successfully.
    Passed,

    /// The suite built, but its executable exited with a non-zero code.
    RunFailed,

    /// Building the suite's test target failed.
    BuildFailed,

    /// The suite is listed in the state table but absent from the CTS tree.
    NotInCts,
}

impl ObservedStatus {
    /// Returns true if this observation agrees with the recorded status.
    pub fn matches(self, recorded: SuiteStatus) -> bool {
        matches!(
            (self, recorded),
            (ObservedStatus::Passed, SuiteStatus::Passed)
                | (ObservedStatus::RunFailed, SuiteStatus::RunFailed)
                | (ObservedStatus::BuildFailed, SuiteStatus::BuildFailed)
        )
    }
}

impl fmt::Display for ObservedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservedStatus::Passed => write!(f, "passed"),
            ObservedStatus::RunFailed => write!(f, "run failed"),
            ObservedStatus::BuildFailed => write!(f, "build failed"),
            ObservedStatus::NotInCts => write!(f, "not in CTS"),
        }
    }
}

/// A single row of the state table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateRecord {
    /// The suite name, e.g. `atomic_ref`.
    pub suite: String,

    /// The status recorded for the suite.
    pub status: SuiteStatus,
}

/// The parsed state table: at most one record per CTS suite, in file order.
///
/// The table is loaded once per invocation and never written back; updating
/// it is a manual act after reviewing a confirm run's discrepancies.
#[derive(Clone, Debug)]
pub struct StateTable {
    path: Utf8PathBuf,
    records: Vec<StateRecord>,
    // Values are (line number of the record, status).
    by_suite: HashMap<String, (usize, SuiteStatus)>,
}

impl StateTable {
    /// Reads and parses the state table at `path`.
    pub fn from_file(path: &Utf8Path) -> Result<Self, StateTableError> {
        let contents = fs::read_to_string(path).map_err(|error| StateTableError::Read {
            path: path.to_owned(),
            error,
        })?;
        Self::parse(path, &contents)
    }

    /// Parses state table contents already read from `path`.
    ///
    /// `path` is only used for error reporting and [`Self::path`].
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self, StateTableError> {
        let (records, by_suite) =
            Self::parse_records(contents).map_err(|error| StateTableError::Parse {
                path: path.to_owned(),
                error,
            })?;
        Ok(Self {
            path: path.to_owned(),
            records,
            by_suite,
        })
    }

    fn parse_records(
        contents: &str,
    ) -> Result<(Vec<StateRecord>, HashMap<String, (usize, SuiteStatus)>), StateTableParseError>
    {
        // str::lines strips trailing carriage returns, so CRLF tables work.
        let mut lines = contents.lines().enumerate();

        match lines.next() {
            Some((_, line)) if line == STATE_TABLE_HEADER => {}
            Some((_, line)) => {
                return Err(StateTableParseError::InvalidHeader {
                    actual: line.to_owned(),
                });
            }
            None => return Err(StateTableParseError::MissingHeader),
        }

        let mut records = Vec::new();
        let mut by_suite = HashMap::new();

        for (index, line) in lines {
            let row = index + 1;
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(STATE_TABLE_DELIMITER).collect();
            let [suite, status_str] = fields.as_slice() else {
                return Err(StateTableParseError::InvalidRow {
                    line: row,
                    actual: line.to_owned(),
                });
            };

            let status: SuiteStatus = status_str
                .parse()
                .map_err(|error| StateTableParseError::UnknownStatus { line: row, error })?;

            if let Some((first_line, _)) = by_suite.insert(suite.to_string(), (row, status)) {
                return Err(StateTableParseError::DuplicateSuite {
                    suite: suite.to_string(),
                    first_line,
                    second_line: row,
                });
            }
            records.push(StateRecord {
                suite: suite.to_string(),
                status,
            });
        }

        Ok((records, by_suite))
    }

    /// The path the table was read from.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The records, in file order.
    pub fn records(&self) -> &[StateRecord] {
        &self.records
    }

    /// The number of records in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the recorded status for `suite`, if the table lists it.
    pub fn status_for(&self, suite: &str) -> Option<SuiteStatus> {
        self.by_suite.get(suite).map(|(_, status)| *status)
    }

    /// Tallies the records by status.
    ///
    /// The result is zero-filled: a status with no records is present with a
    /// count of 0.
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in &self.records {
            match record.status {
                SuiteStatus::Passed => counts.passed += 1,
                SuiteStatus::RunFailed => counts.run_failed += 1,
                SuiteStatus::BuildFailed => counts.build_failed += 1,
                SuiteStatus::NotApplicable => counts.not_applicable += 1,
            }
        }
        counts
    }
}

/// Totals for a state table, grouped by recorded status.
///
/// Zero-filled: a status with no records is present with a count of 0. This
/// is what the state chart renders.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatusCounts {
    /// The number of suites recorded as passed.
    pub passed: usize,

    /// The number of suites recorded as run failed.
    pub run_failed: usize,

    /// The number of suites recorded as build failed.
    pub build_failed: usize,

    /// The number of suites recorded as not applicable.
    pub not_applicable: usize,
}

impl StatusCounts {
    /// The total number of records.
    pub fn total(self) -> usize {
        self.passed + self.run_failed + self.build_failed + self.not_applicable
    }

    /// The count for `status`.
    pub fn get(self, status: SuiteStatus) -> usize {
        match status {
            SuiteStatus::Passed => self.passed,
            SuiteStatus::RunFailed => self.run_failed,
            SuiteStatus::BuildFailed => self.build_failed,
            SuiteStatus::NotApplicable => self.not_applicable,
        }
    }
}
