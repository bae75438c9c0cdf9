//! Shared utilities for droidplan.
//!
//! This crate provides cross-cutting concerns used by all other droidplan
//! crates: the error taxonomy surfaced by the resolution pipeline and
//! Cargo-style terminal status lines.

pub mod errors;
pub mod progress;
