// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core functionality for [cts-state](https://crates.io/crates/cts-state).
//!
//! This crate contains the engine behind the `cts-state` command-line tool:
//! enumerating CTS suites on disk, driving `cmake` builds and test
//! executables through a swappable process boundary, comparing the observed
//! outcomes against the recorded state table, streaming progress to a
//! reporter, and rendering the state table as an SVG chart.

#![warn(missing_docs)]

pub mod chart;
pub mod command;
pub mod discovery;
pub mod errors;
pub mod reporter;
pub mod runner;
