// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TRX (Visual Studio Test Results) report generation for spectre test runs.
//!
//! Given a finished batch of [`RunRecord`]s, [`VstestReporter`] assembles a
//! [`quick_trx::TestRun`] document and writes it into the configured output
//! directory under a timestamped filename. The mapping is a single linear
//! pass: outcomes are classified into the schema's three-state model,
//! failure causes are narrated into the error-info payload, and every piece
//! of free-form text is sanitized before it enters the tree.
//!
//! How tests are discovered or executed is out of scope here; callers hand
//! over already-finished records once per run.

mod assembler;
mod config;
mod errors;
mod identity;
pub mod narrate;
mod records;
mod writer;

pub use assembler::*;
pub use config::*;
pub use errors::*;
pub use identity::*;
pub use records::*;
pub use writer::*;
