// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by cts-state-runner.

use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

/// An error that occurred while enumerating CTS suites on disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SuiteDiscoveryError {
    /// Reading the tests directory failed.
    #[error("failed to read CTS tests directory `{path}`")]
    ReadDir {
        /// The tests directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// Reading an entry of the tests directory failed.
    #[error("failed to read a directory entry under `{path}`")]
    ReadEntry {
        /// The tests directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },
}

/// An error that occurred while driving a confirm run.
///
/// Callers match on this to recover the callback error.
#[derive(Debug, Error)]
pub enum ConfirmRunError<E> {
    /// An external command could not be launched.
    ///
    /// A command that launches and exits with a non-zero code is a classified
    /// outcome, never this error.
    #[error("failed to execute `{command}`")]
    Exec {
        /// The command that failed to launch, in shell form.
        command: String,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The event callback returned an error.
    #[error("error reporting confirm progress")]
    Callback {
        /// The underlying error.
        #[source]
        error: E,
    },
}

/// An error that occurred while writing a confirm event to output.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteEventError {
    /// An error occurred while writing the event to the provided output.
    #[error("error writing to output")]
    Io(#[source] io::Error),
}

/// An error that occurred while writing a confirm summary to output.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteSummaryError {
    /// An error occurred while writing the summary to the provided output.
    #[error("error writing to output")]
    Io(#[source] io::Error),

    /// An error occurred while serializing the summary to JSON.
    #[error("error serializing to JSON")]
    Json(#[source] serde_json::Error),
}

/// An error that occurred while rendering or writing a state chart.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChartError {
    /// The state table has no records, so there is nothing to chart.
    #[error("state table at `{path}` has no records to chart")]
    EmptyTable {
        /// The state table path.
        path: Utf8PathBuf,
    },

    /// Writing the chart to the output file failed.
    #[error("error writing chart to `{path}`")]
    Write {
        /// The output file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },
}
