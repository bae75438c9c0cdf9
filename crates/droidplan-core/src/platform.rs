//! Bill-of-materials version catalogs.
//!
//! A [`PlatformCatalog`] maps a BOM coordinate (`group:artifact:version`) to
//! the versions it manages. The catalog is always passed explicitly to the
//! resolver; nothing here is global.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use droidplan_util::errors::DroidplanError;

use crate::coordinate::Coordinate;

/// Managed versions keyed by BOM coordinate, then by `group:artifact`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformCatalog {
    boms: BTreeMap<String, BTreeMap<String, String>>,
}

impl PlatformCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog file. See [`PlatformCatalog::parse_toml`] for the format.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DroidplanError::Manifest {
            message: format!("Failed to read platform catalog {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    /// Parse a catalog:
    ///
    /// ```toml
    /// ["com.google.firebase:firebase-bom:33.15.0"]
    /// "com.google.firebase:firebase-auth" = "23.2.1"
    /// ```
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        let catalog: Self = toml::from_str(content).map_err(|e| DroidplanError::Manifest {
            message: format!("Failed to parse platform catalog: {e}"),
        })?;
        for bom in catalog.boms.keys() {
            Coordinate::parse(bom)?;
        }
        Ok(catalog)
    }

    /// Register managed versions for a BOM.
    pub fn insert(&mut self, bom: &Coordinate, key: impl Into<String>, version: impl Into<String>) {
        self.boms
            .entry(bom.to_string())
            .or_default()
            .insert(key.into(), version.into());
    }

    /// Merge `other` into `self`; entries already present in `self` win.
    pub fn merge(&mut self, other: PlatformCatalog) {
        for (bom, versions) in other.boms {
            let entry = self.boms.entry(bom).or_default();
            for (key, version) in versions {
                entry.entry(key).or_insert(version);
            }
        }
    }

    pub fn contains(&self, bom: &Coordinate) -> bool {
        self.boms.contains_key(&bom.to_string())
    }

    /// The version `bom` manages for the `group:artifact` slot `key`.
    pub fn managed_version(&self, bom: &Coordinate, key: &str) -> Option<&str> {
        self.boms
            .get(&bom.to_string())
            .and_then(|versions| versions.get(key))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.boms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boms.is_empty()
    }
}
