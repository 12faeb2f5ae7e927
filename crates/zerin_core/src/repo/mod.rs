//! Repository layer: typed stores over the persistent key-value boundary.
//!
//! # Responsibility
//! - Define the injectable key-value storage contract and its SQLite and
//!   in-memory implementations.
//! - Provide typed per-collection stores (users, records, knowledge,
//!   persona) that own their storage key and JSON codec.
//!
//! # Invariants
//! - Every mutation flushes the whole collection back to storage before
//!   returning; in-memory copies held by callers are stale afterwards.
//! - Storage key names and value shapes stay compatible with the original
//!   browser deployment (see `kv::keys`).

pub mod knowledge_repo;
pub mod kv;
pub mod persona_repo;
pub mod record_repo;
pub mod user_repo;
