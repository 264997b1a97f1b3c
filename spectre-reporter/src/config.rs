// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Configuration for the VSTest (TRX) reporter.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VstestConfig {
    /// The runner's own log file; attached to the report if it exists at
    /// report time.
    #[serde(default)]
    log_file: Option<Utf8PathBuf>,

    /// The directory reports are written into. Created if absent.
    out_path: Utf8PathBuf,
}

impl VstestConfig {
    /// Creates a new config writing into the given output directory.
    pub fn new(out_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            log_file: None,
            out_path: out_path.into(),
        }
    }

    /// Sets the log file to attach.
    pub fn set_log_file(&mut self, log_file: impl Into<Utf8PathBuf>) -> &mut Self {
        self.log_file = Some(log_file.into());
        self
    }

    /// Returns the log file path, if one is configured.
    pub fn log_file(&self) -> Option<&Utf8Path> {
        self.log_file.as_deref()
    }

    /// Returns the output directory.
    pub fn out_path(&self) -> &Utf8Path {
        &self.out_path
    }
}

/// Ambient values read once per report invocation.
///
/// Injected rather than read ad hoc so that tests can supply fixed values
/// instead of relying on process-wide state.
#[derive(Clone, Debug)]
pub struct ReportEnv {
    /// The machine name written into every result.
    pub computer_name: String,

    /// "Now", used for the run-span fallback and the output filename.
    pub now: DateTime<Utc>,
}

impl ReportEnv {
    /// Creates a `ReportEnv` with explicit values.
    pub fn new(computer_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            computer_name: computer_name.into(),
            now,
        }
    }

    /// Captures the current hostname and time from the process environment.
    pub fn capture() -> Self {
        let computer_name = whoami::fallible::hostname().unwrap_or_else(|error| {
            tracing::warn!(%error, "could not determine hostname for report");
            "localhost".to_owned()
        });
        Self::new(computer_name, Utc::now())
    }
}
