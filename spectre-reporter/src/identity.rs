// Copyright (c) The spectre-rs Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identity pairs correlating test definitions with their results.

use crate::RunRecord;
use uuid::Uuid;

/// A source of opaque unique identifiers.
///
/// Reports need identifiers that are non-colliding within a document (and,
/// in practice, across documents); they are regenerated on every invocation
/// and never persisted. Injecting the source lets tests assert on
/// deterministic sequences.
pub trait IdSource {
    /// Returns the next identifier.
    fn next_id(&mut self) -> Uuid;
}

/// The default [`IdSource`]: random 128-bit v4 UUIDs.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIdSource;

impl IdSource for RandomIdSource {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// A record paired with its freshly assigned identity, valid for one report
/// invocation.
#[derive(Clone, Copy, Debug)]
pub struct TestIdentity<'a> {
    /// The identifier shared by the definition and result entries.
    pub test_id: Uuid,

    /// The identifier of this execution.
    pub execution_id: Uuid,

    /// The underlying record.
    pub record: &'a RunRecord,
}

/// Assigns one `(test_id, execution_id)` pair per record.
///
/// Records are sorted by their parent's name so grouped tests appear
/// contiguously in both report sections; the sort is stable, so ties keep
/// their original relative order.
pub fn assign_identities<'a>(
    records: &'a [RunRecord],
    ids: &mut dyn IdSource,
) -> Vec<TestIdentity<'a>> {
    let mut sorted: Vec<&RunRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.parent.name.cmp(&b.parent.name));
    sorted
        .into_iter()
        .map(|record| TestIdentity {
            test_id: ids.next_id(),
            execution_id: ids.next_id(),
            record,
        })
        .collect()
}
