//! Domain model for the assistant core.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep persisted JSON shapes identical to the original deployment so
//!   existing storage exports remain readable.
//!
//! # Invariants
//! - Partial updates go through explicit per-entity patch types, never
//!   untyped merges.

pub mod knowledge;
pub mod persona;
pub mod record;
pub mod user;
