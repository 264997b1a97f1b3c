// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::WriteReportError;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use quick_trx::TestRun;
use std::fs;

/// Writes `run` into `out_dir` as `spectre-vstest_<unix-seconds>.trx`,
/// returning the path of the written file.
///
/// The output directory is created if absent, intermediate directories
/// included. The document is serialized fully into memory first, so a
/// serialization failure never leaves a partial file behind. Two reports
/// generated within the same second collide on the filename; callers invoke
/// this once per run.
pub fn write_report(
    run: &TestRun,
    out_dir: &Utf8Path,
    now: DateTime<Utc>,
) -> Result<Utf8PathBuf, WriteReportError> {
    fs::create_dir_all(out_dir).map_err(|error| WriteReportError::Fs {
        path: out_dir.to_owned(),
        error,
    })?;

    let path = out_dir.join(format!("spectre-vstest_{}.trx", now.timestamp()));

    let mut buf: Vec<u8> = vec![];
    run.serialize(&mut buf)
        .map_err(|error| WriteReportError::Serialize {
            path: path.clone(),
            error,
        })?;
    fs::write(&path, &buf).map_err(|error| WriteReportError::Fs {
        path: path.clone(),
        error,
    })?;

    Ok(path)
}
