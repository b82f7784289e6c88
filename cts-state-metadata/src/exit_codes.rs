// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `cts-state` commands.
///
/// `cts-state` invocations may fail for a variety of reasons. This structure
/// documents the exit codes that may occur in case of expected failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum CtsStateExitCode {}

impl CtsStateExitCode {
    /// No errors occurred, and for `cts-state confirm`, the observed state
    /// matched the recorded state table.
    pub const OK: i32 = 0;

    /// The observed state differed from the recorded state table.
    ///
    /// The discrepancies are listed on standard output before exit.
    pub const STATE_MISMATCH: i32 = 1;

    /// A user issue happened while setting up a cts-state invocation: the
    /// state table failed to read or parse, the CTS tree could not be
    /// enumerated, or an external command could not be launched.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing data to stdout, stderr, or an output file produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
