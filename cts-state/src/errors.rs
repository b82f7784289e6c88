// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::StderrStyles;
use cts_state_metadata::{CtsStateExitCode, StateTableError};
use cts_state_runner::errors::{
    ChartError, ConfirmRunError, SuiteDiscoveryError, WriteEventError, WriteSummaryError,
};
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the
// expected way to print out errors is with the display_to_stderr method, which
// colorizes errors.

/// An error expected during normal operation, reported with an exit code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("state table load error")]
    StateTableError {
        #[from]
        err: StateTableError,
    },
    #[error("suite discovery error")]
    SuiteDiscoveryError {
        #[from]
        err: SuiteDiscoveryError,
    },
    #[error("failed to execute command")]
    CommandExecFailed {
        command: String,
        #[source]
        err: std::io::Error,
    },
    #[error("writing confirm event failed")]
    WriteEventError {
        #[from]
        err: WriteEventError,
    },
    #[error("writing confirm summary failed")]
    WriteSummaryError {
        #[from]
        err: WriteSummaryError,
    },
    #[error("chart error")]
    ChartError {
        #[from]
        err: ChartError,
    },
}

impl From<ConfirmRunError<WriteEventError>> for ExpectedError {
    fn from(err: ConfirmRunError<WriteEventError>) -> Self {
        match err {
            ConfirmRunError::Exec { command, error } => Self::CommandExecFailed {
                command,
                err: error,
            },
            ConfirmRunError::Callback { error } => Self::WriteEventError { err: error },
        }
    }
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::StateTableError { .. }
            | Self::SuiteDiscoveryError { .. }
            | Self::CommandExecFailed { .. } => CtsStateExitCode::SETUP_ERROR,
            Self::WriteEventError { .. } | Self::WriteSummaryError { .. } => {
                CtsStateExitCode::WRITE_OUTPUT_ERROR
            }
            Self::ChartError { err } => match err {
                ChartError::EmptyTable { .. } => CtsStateExitCode::SETUP_ERROR,
                _ => CtsStateExitCode::WRITE_OUTPUT_ERROR,
            },
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::StateTableError { err } => {
                error!("{err}");
                err.source()
            }
            Self::SuiteDiscoveryError { err } => {
                error!("{err}");
                err.source()
            }
            Self::CommandExecFailed { command, err } => {
                error!("failed to execute `{}`", command.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::WriteEventError { err } => {
                error!("failed to write confirm output");
                Some(err as &dyn Error)
            }
            Self::WriteSummaryError { err } => {
                error!("failed to write confirm summary");
                Some(err as &dyn Error)
            }
            Self::ChartError { err } => {
                error!("{err}");
                err.source()
            }
        };

        while let Some(err) = next_error {
            error!(target: "cts_state::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
