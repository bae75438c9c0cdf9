//! Core data types for droidplan.
//!
//! This crate defines the module descriptor model: coordinates, dependency
//! scopes, plugins, SDK and compatibility levels, descriptor parsing,
//! bill-of-materials catalogs and property files.
//!
//! This crate is intentionally free of async code and network I/O.

/// Descriptor file name looked up in the project directory.
pub const DESCRIPTOR_FILE: &str = "Droidplan.toml";

pub mod compat;
pub mod coordinate;
pub mod dependency;
pub mod descriptor;
pub mod platform;
pub mod plugin;
pub mod properties;
pub mod sdk;
