// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable accounts of why a test did not pass.

use crate::RunRecord;
use swrite::{swrite, SWrite};

/// The narrated failure of one record: a message, and a stack trace when the
/// failure was an unexpected error rather than a failed assertion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FailureNarrative {
    /// The composed failure or error message.
    pub message: String,

    /// The stack trace, newline-joined in captured order. `None` for pure
    /// assertion failures.
    pub stack_trace: Option<String>,
}

/// Composes the narrative for a record that did not pass.
///
/// For assertion failures the message concatenates
/// `"<description>, but <message> "` per failure cause, in order. For errors
/// the message is the error's own, with the stack frames joined by newlines.
/// Failures and errors are mutually exclusive upstream; if a record carries
/// both anyway, the error payload wins. A malformed record with neither
/// yields an empty message rather than a panic.
pub fn describe(record: &RunRecord) -> FailureNarrative {
    if let Some(error) = &record.error {
        return FailureNarrative {
            message: error.message.clone(),
            stack_trace: Some(error.backtrace.join("\n")),
        };
    }

    let mut message = String::new();
    for failure in &record.failures {
        swrite!(message, "{}, but {} ", failure.description, failure.message);
    }
    FailureNarrative {
        message,
        stack_trace: None,
    }
}
