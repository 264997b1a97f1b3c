// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// An error that occurs while serializing a [`TestRun`](crate::TestRun).
///
/// Returned by [`TestRun::serialize`](crate::TestRun::serialize) and
/// [`TestRun::to_string`](crate::TestRun::to_string).
#[derive(Debug, Error)]
#[error("error serializing TRX report")]
pub struct SerializeError {
    #[from]
    inner: quick_xml::Error,
}
