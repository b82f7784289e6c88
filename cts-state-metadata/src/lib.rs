// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured access to cts-state machine-readable input and output.
//!
//! This crate defines the data formats shared between the `cts-state`
//! command-line tool and anything that consumes its output:
//!
//! * the semicolon-delimited conformance state table ([`StateTable`]) and its
//!   status values ([`SuiteStatus`], [`ObservedStatus`]),
//! * the JSON summary written by `cts-state confirm --message-format json`
//!   ([`ConfirmSummary`]),
//! * the documented process exit codes ([`CtsStateExitCode`]).

mod errors;
mod exit_codes;
mod state;
mod summary;

pub use errors::*;
pub use exit_codes::*;
pub use state::*;
pub use summary::*;
