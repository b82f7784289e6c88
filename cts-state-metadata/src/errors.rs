// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::state::{SuiteStatus, STATE_TABLE_HEADER};
use camino::Utf8PathBuf;
use std::{error, fmt};

/// An error that occurs while reading or parsing a state table.
#[derive(Debug)]
#[non_exhaustive]
pub enum StateTableError {
    /// Reading the state table file resulted in an error.
    Read {
        /// The path to the state table.
        path: Utf8PathBuf,

        /// The underlying error.
        error: std::io::Error,
    },

    /// The state table contents failed to parse.
    Parse {
        /// The path to the state table.
        path: Utf8PathBuf,

        /// The underlying error.
        error: StateTableParseError,
    },
}

impl fmt::Display for StateTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, .. } => {
                write!(f, "failed to read state table at `{path}`")
            }
            Self::Parse { path, .. } => {
                write!(f, "failed to parse state table at `{path}`")
            }
        }
    }
}

impl error::Error for StateTableError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Read { error, .. } => Some(error),
            Self::Parse { error, .. } => Some(error),
        }
    }
}

/// The ways in which state table contents can fail to parse.
///
/// All line numbers are 1-based; line 1 is the header row.
#[derive(Debug)]
#[non_exhaustive]
pub enum StateTableParseError {
    /// The table is empty: there is no header row at all.
    MissingHeader,

    /// The first line is not the expected header row.
    InvalidHeader {
        /// The actual first line.
        actual: String,
    },

    /// A row does not consist of exactly two `;`-separated fields.
    InvalidRow {
        /// The line number of the row.
        line: usize,

        /// The actual row contents.
        actual: String,
    },

    /// A row's status field is not a known status value.
    UnknownStatus {
        /// The line number of the row.
        line: usize,

        /// The underlying error.
        error: SuiteStatusParseError,
    },

    /// The same suite is listed more than once.
    DuplicateSuite {
        /// The suite name.
        suite: String,

        /// The line number of the first occurrence.
        first_line: usize,

        /// The line number of the duplicate.
        second_line: usize,
    },
}

impl fmt::Display for StateTableParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => {
                write!(f, "missing header row (expected `{STATE_TABLE_HEADER}`)")
            }
            Self::InvalidHeader { actual } => {
                write!(
                    f,
                    "line 1: invalid header `{actual}` (expected `{STATE_TABLE_HEADER}`)"
                )
            }
            Self::InvalidRow { line, actual } => {
                write!(
                    f,
                    "line {line}: expected 2 fields separated by `;`, found `{actual}`"
                )
            }
            Self::UnknownStatus { line, error } => {
                write!(f, "line {line}: {error}")
            }
            Self::DuplicateSuite {
                suite,
                first_line,
                second_line,
            } => {
                write!(
                    f,
                    "line {second_line}: duplicate suite `{suite}` (first listed on line {first_line})"
                )
            }
        }
    }
}

impl error::Error for StateTableParseError {}

/// An error that occurs while parsing a [`SuiteStatus`] from a string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SuiteStatusParseError {
    input: String,
}

impl SuiteStatusParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The input that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for SuiteStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized suite status: {} (known values: {})",
            self.input,
            SuiteStatus::variants().join(", ")
        )
    }
}

impl error::Error for SuiteStatusParseError {}
