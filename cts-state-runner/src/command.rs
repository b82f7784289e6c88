// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process boundary between the confirm driver and the commands it runs.
//!
//! Everything the driver launches is described by a [`CommandSpec`] and
//! executed through the [`CommandRunner`] trait. The production
//! implementation is [`DuctCommandRunner`]; tests substitute scripted
//! implementations to drive runs without spawning any processes.

use camino::{Utf8Path, Utf8PathBuf};
use duct::cmd;
use std::{io, iter};
use tracing::debug;

/// A fully specified external command: program, arguments and working
/// directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    current_dir: Utf8PathBuf,
}

impl CommandSpec {
    /// Creates a new command spec.
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        current_dir: &Utf8Path,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(|arg| arg.into()).collect(),
            current_dir: current_dir.to_owned(),
        }
    }

    /// The `cmake` invocation that builds a suite's test target, run from the
    /// CTS root.
    pub fn build_suite(build_dir: &Utf8Path, cts_root: &Utf8Path, suite: &str) -> Self {
        Self::new(
            "cmake",
            [
                "--build".to_owned(),
                build_dir.to_string(),
                "--target".to_owned(),
                format!("test_{suite}"),
            ],
            cts_root,
        )
    }

    /// The invocation of a suite's built test executable, run from the CTS
    /// root.
    pub fn run_suite(build_dir: &Utf8Path, cts_root: &Utf8Path, suite: &str) -> Self {
        let executable = build_dir.join("bin").join(format!("test_{suite}"));
        Self::new(executable.into_string(), iter::empty::<String>(), cts_root)
    }

    /// The program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments to pass to the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The working directory to run the program in.
    pub fn current_dir(&self) -> &Utf8Path {
        &self.current_dir
    }

    /// The command as a shell-style string, for logs and error messages.
    pub fn display_command(&self) -> String {
        shell_words::join(
            iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str)),
        )
    }
}

/// How an executed command exited.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CommandStatus {
    /// The command exited with code 0.
    Success,

    /// The command exited with a non-zero code, or was terminated by a
    /// signal.
    Failure,
}

impl CommandStatus {
    /// Returns true for [`Success`](Self::Success).
    pub fn is_success(self) -> bool {
        matches!(self, CommandStatus::Success)
    }
}

/// The boundary through which the confirm driver launches processes.
///
/// The returned error is reserved for failures to launch or wait on a
/// process. A command that runs to completion and exits non-zero is a
/// [`CommandStatus::Failure`], not an error.
pub trait CommandRunner {
    /// Runs the command to completion and reports how it exited.
    fn run(&mut self, spec: &CommandSpec) -> io::Result<CommandStatus>;
}

impl<F> CommandRunner for F
where
    F: FnMut(&CommandSpec) -> io::Result<CommandStatus>,
{
    fn run(&mut self, spec: &CommandSpec) -> io::Result<CommandStatus> {
        self(spec)
    }
}

/// Runs commands as real subprocesses, with their stdout and stderr
/// suppressed.
#[derive(Clone, Debug, Default)]
pub struct DuctCommandRunner {}

impl DuctCommandRunner {
    /// Creates a new duct-backed command runner.
    pub fn new() -> Self {
        Self {}
    }
}

impl CommandRunner for DuctCommandRunner {
    fn run(&mut self, spec: &CommandSpec) -> io::Result<CommandStatus> {
        let output = cmd(spec.program(), spec.args())
            .stdout_null()
            .stderr_null()
            .unchecked()
            .dir(spec.current_dir().as_std_path())
            .run()?;
        debug!(
            "`{}` exited with {}",
            spec.display_command(),
            output.status
        );
        Ok(if output.status.success() {
            CommandStatus::Success
        } else {
            CommandStatus::Failure
        })
    }
}
