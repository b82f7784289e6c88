// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line interface for tracking a SYCL implementation's CTS
//! conformance state.
//!
//! The `confirm` command replays the recorded per-suite state against a CTS
//! checkout, and the `render` command turns the recorded state into an SVG
//! chart. See the crate-level documentation of `cts-state-runner` for the
//! underlying building blocks.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
