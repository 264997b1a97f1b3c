// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generate TRX (Visual Studio Test Results) reports in Rust.
//!
//! This crate owns the typed document tree for a `TestRun` and its
//! serialization to well-formed XML. Consumers build the tree with the types
//! in [`report`](crate::TestRun) and serialize it once at the end; all text
//! is sanitized on the way in via [`XmlString`] and escaped on the way out by
//! the XML writer.

mod errors;
mod report;
mod serialize;
mod xml_string;

pub use errors::*;
pub use report::*;
pub use xml_string::XmlString;
