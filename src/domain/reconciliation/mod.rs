// src/domain/reconciliation/mod.rs
//
// Reconciliation Domain
//
// Value objects and policy for turning a title's noisy multi-player video
// list into one playable episode sequence.
//
// CRITICAL RULES:
// - All types are pure values (no I/O, no shared state)
// - Deterministic: same input → same output

pub mod policy;
pub mod value_objects;

pub use policy::{PriorityTable, ReconciliationPolicy, TitleId, TitleOverride};
pub use value_objects::{DubbingGroup, DubbingGroups, PlayerGroup};
