// Copyright (c) The cts-state Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Enumeration of CTS suites on disk.

use crate::errors::SuiteDiscoveryError;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;
use tracing::debug;

/// Directories under `tests/` that never hold a suite.
///
/// `common` holds shared test infrastructure and `extension` holds vendor
/// extension tests; neither has a `test_<suite>` target.
pub const DEFAULT_EXCLUDES: &[&str] = &["common", "extension"];

/// The set of CTS suites present in a checkout, sorted by name.
#[derive(Clone, Debug)]
pub struct SuiteList {
    tests_dir: Utf8PathBuf,
    suites: Vec<String>,
}

impl SuiteList {
    /// Enumerates the suites under `cts_root`: every direct subdirectory of
    /// `<cts_root>/tests` other than the [`DEFAULT_EXCLUDES`].
    pub fn discover(cts_root: &Utf8Path) -> Result<Self, SuiteDiscoveryError> {
        Self::discover_with_excludes(cts_root, DEFAULT_EXCLUDES.iter().copied())
    }

    /// Enumerates the suites under `cts_root`, excluding the given directory
    /// names instead of the defaults.
    pub fn discover_with_excludes<'e>(
        cts_root: &Utf8Path,
        excludes: impl IntoIterator<Item = &'e str>,
    ) -> Result<Self, SuiteDiscoveryError> {
        let tests_dir = cts_root.join("tests");
        let excludes: HashSet<&str> = excludes.into_iter().collect();

        let mut suites = Vec::new();
        let entries =
            tests_dir
                .read_dir_utf8()
                .map_err(|error| SuiteDiscoveryError::ReadDir {
                    path: tests_dir.clone(),
                    error,
                })?;
        for entry in entries {
            let entry = entry.map_err(|error| SuiteDiscoveryError::ReadEntry {
                path: tests_dir.clone(),
                error,
            })?;
            // Follows symlinks, so a suite linked into tests/ still counts.
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name();
            if excludes.contains(name) {
                continue;
            }
            suites.push(name.to_owned());
        }
        suites.sort_unstable();

        debug!("discovered {} suites under {}", suites.len(), tests_dir);
        Ok(Self { tests_dir, suites })
    }

    /// Creates a suite list from known names, without touching the file
    /// system. The names are sorted.
    pub fn new(tests_dir: impl Into<Utf8PathBuf>, suites: impl IntoIterator<Item = String>) -> Self {
        let mut suites: Vec<_> = suites.into_iter().collect();
        suites.sort_unstable();
        Self {
            tests_dir: tests_dir.into(),
            suites,
        }
    }

    /// The directory the suites live under.
    pub fn tests_dir(&self) -> &Utf8Path {
        &self.tests_dir
    }

    /// The suite names, sorted.
    pub fn suites(&self) -> &[String] {
        &self.suites
    }

    /// The number of suites.
    pub fn len(&self) -> usize {
        self.suites.len()
    }

    /// Returns true if no suites were found.
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Returns true if `suite` is in the list.
    pub fn contains(&self, suite: &str) -> bool {
        self.suites
            .binary_search_by(|name| name.as_str().cmp(suite))
            .is_ok()
    }
}
