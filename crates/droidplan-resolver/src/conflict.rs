//! Reporting of versions that were requested but not selected.
//!
//! Hard conflicts (two explicit versions) are errors; what ends up here are
//! the cases resolution settled on its own, such as an explicit version
//! overriding a platform-managed one.

use std::fmt;

use serde::Serialize;

/// All non-fatal version decisions made during resolution.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct OverrideReport {
    pub overrides: Vec<VersionOverride>,
}

/// A version that was requested for a slot but lost to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionOverride {
    pub key: String,
    pub requested: String,
    pub resolved: String,
    pub reason: String,
}

impl OverrideReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: VersionOverride) {
        self.overrides.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }
}

impl fmt::Display for OverrideReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.overrides.is_empty() {
            return write!(f, "No version overrides.");
        }
        writeln!(f, "Version overrides ({}):", self.overrides.len())?;
        for o in &self.overrides {
            writeln!(f, "  {o}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requested {} but resolved {} ({})",
            self.key, self.requested, self.resolved, self.reason
        )
    }
}
