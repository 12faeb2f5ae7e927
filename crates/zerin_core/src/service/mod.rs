//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs: the
//!   authentication flow and the knowledge indexing lifecycle.
//! - Keep presentation hosts decoupled from storage details.

pub mod knowledge;
pub mod session;
