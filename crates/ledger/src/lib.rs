//! Production ledger domain: case capacity accounting and productivity entries.
//!
//! This crate contains business rules only, implemented as deterministic
//! domain logic (no IO, no HTTP, no storage). The transactional execution of
//! allocations lives behind the store seam in infra.

pub mod case;
pub mod entry;

pub use case::{AllocationError, CaseState, ProductionCase};
pub use entry::{
    AllocationEntry, DailySummary, EntryKind, PackingEntry, SortingEntry, validate_entries,
};
