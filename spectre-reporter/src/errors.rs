// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurred while writing a TRX report to disk.
///
/// Filesystem failures are fatal for the invocation; nothing in report
/// generation retries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// An error occurred while operating on the file system.
    #[error("error operating on path {path}")]
    Fs {
        /// The path being operated on.
        path: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// An error occurred while producing TRX XML.
    #[error("error writing TRX output to {path}")]
    Serialize {
        /// The output file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: quick_trx::SerializeError,
    },
}
