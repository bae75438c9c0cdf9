//! Version resolution: one concrete version per `group:artifact` slot.
//!
//! An explicit version always overrides a platform-managed one. Two distinct
//! explicit versions for the same slot are a conflict. Ranges only constrain
//! the chosen version; they never select one by themselves.

use std::collections::{HashMap, HashSet};

use droidplan_core::coordinate::{Coordinate, VersionSpec};
use droidplan_core::dependency::{DependencyDeclaration, PlatformImport, Scope};
use droidplan_core::platform::PlatformCatalog;
use droidplan_util::errors::DroidplanError;

use crate::conflict::{OverrideReport, VersionOverride};
use crate::version::{MavenVersion, VersionRange};

/// Where a resolved version came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSource {
    Explicit,
    Platform(Coordinate),
}

/// A dependency slot with its resolved version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub coordinate: Coordinate,
    /// Distinct scopes the slot was declared in, in declaration order.
    pub scopes: Vec<Scope>,
    /// Declaration index of the first entry for this slot.
    pub index: usize,
    /// Slot keys that must be resolved first, merged across declarations.
    pub requires: Vec<String>,
    pub source: VersionSource,
}

impl ResolvedDependency {
    pub fn key(&self) -> String {
        self.coordinate.key()
    }

    /// The scope of the first declaration.
    pub fn primary_scope(&self) -> Scope {
        self.scopes.first().copied().unwrap_or_default()
    }
}

/// The output of version resolution.
#[derive(Debug, Clone, Default)]
pub struct VersionResolution {
    /// One entry per slot, ordered by first declaration.
    pub dependencies: Vec<ResolvedDependency>,
    pub overrides: OverrideReport,
}

impl VersionResolution {
    pub fn get(&self, key: &str) -> Option<&ResolvedDependency> {
        self.dependencies.iter().find(|d| d.key() == key)
    }

    pub fn version_of(&self, key: &str) -> Option<&str> {
        self.get(key).map(|d| d.coordinate.version.as_str())
    }
}

/// Resolve every declared slot to a single version.
///
/// `catalog` supplies the versions managed by each platform import. All
/// conflicts and unresolvable slots are collected before failing.
pub fn resolve_versions(
    dependencies: &[DependencyDeclaration],
    platforms: &[PlatformImport],
    catalog: &PlatformCatalog,
) -> Result<VersionResolution, Vec<DroidplanError>> {
    let mut errors = Vec::new();
    let mut overrides = OverrideReport::new();
    let mut resolved = Vec::new();

    let mut platforms: Vec<&PlatformImport> = platforms.iter().collect();
    platforms.sort_by_key(|p| p.index);
    let loaded: Vec<&PlatformImport> = platforms
        .iter()
        .copied()
        .filter(|p| {
            let present = catalog.contains(&p.coordinate);
            if !present {
                tracing::warn!(bom = %p.coordinate, "platform import has no loaded catalog");
            }
            present
        })
        .collect();

    for (key, decls) in group_by_slot(dependencies) {
        match resolve_slot(&key, &decls, &loaded, &platforms, catalog, &mut overrides) {
            Ok(dep) => {
                tracing::debug!(slot = %key, version = %dep.coordinate.version, "resolved");
                resolved.push(dep);
            }
            Err(mut slot_errors) => errors.append(&mut slot_errors),
        }
    }

    if errors.is_empty() {
        Ok(VersionResolution {
            dependencies: resolved,
            overrides,
        })
    } else {
        Err(errors)
    }
}

/// Group declarations by slot key, keeping first-declaration order.
fn group_by_slot(dependencies: &[DependencyDeclaration]) -> Vec<(String, Vec<&DependencyDeclaration>)> {
    let mut sorted: Vec<&DependencyDeclaration> = dependencies.iter().collect();
    sorted.sort_by_key(|d| d.index);

    let mut slots: Vec<(String, Vec<&DependencyDeclaration>)> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();
    for decl in sorted {
        let key = decl.key();
        match position.get(&key) {
            Some(&i) => slots[i].1.push(decl),
            None => {
                position.insert(key.clone(), slots.len());
                slots.push((key, vec![decl]));
            }
        }
    }
    slots
}

fn resolve_slot(
    key: &str,
    decls: &[&DependencyDeclaration],
    loaded: &[&PlatformImport],
    declared: &[&PlatformImport],
    catalog: &PlatformCatalog,
    overrides: &mut OverrideReport,
) -> Result<ResolvedDependency, Vec<DroidplanError>> {
    let mut errors = Vec::new();

    // Distinct explicit versions, ascending; equal spellings keep the smallest.
    let mut exact: Vec<MavenVersion> = Vec::new();
    let mut ranges: Vec<VersionRange> = Vec::new();
    for decl in decls {
        match &decl.request.version {
            VersionSpec::Exact(v) => {
                let parsed = MavenVersion::parse(v);
                match exact.iter_mut().find(|e| **e == parsed) {
                    Some(existing) if parsed.original < existing.original => *existing = parsed,
                    Some(_) => {}
                    None => exact.push(parsed),
                }
            }
            VersionSpec::Range(r) => match VersionRange::parse(r) {
                Some(range) => ranges.push(range),
                None => errors.push(DroidplanError::malformed(
                    decl.request.to_string(),
                    format!("invalid version range {r}"),
                )),
            },
            VersionSpec::Inherited => {}
        }
    }
    exact.sort();

    if let [lowest, rest @ ..] = exact.as_slice() {
        for other in rest {
            errors.push(DroidplanError::VersionConflict {
                key: key.to_string(),
                first: lowest.original.clone(),
                second: other.original.clone(),
            });
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    // First loaded platform that manages this slot wins over later ones.
    let mut managed: Option<(&str, &Coordinate)> = None;
    for platform in loaded {
        let Some(version) = catalog.managed_version(&platform.coordinate, key) else {
            continue;
        };
        match managed {
            None => managed = Some((version, &platform.coordinate)),
            Some((winner, bom)) if MavenVersion::parse(winner) != MavenVersion::parse(version) => {
                overrides.add(VersionOverride {
                    key: key.to_string(),
                    requested: version.to_string(),
                    resolved: winner.to_string(),
                    reason: format!("{bom} is imported before {}", platform.coordinate),
                });
            }
            Some(_) => {}
        }
    }

    let (version, source) = match (exact.first(), managed) {
        (Some(explicit), Some((platform_version, bom))) => {
            if MavenVersion::parse(platform_version) != *explicit {
                overrides.add(VersionOverride {
                    key: key.to_string(),
                    requested: platform_version.to_string(),
                    resolved: explicit.original.clone(),
                    reason: format!("explicit version overrides {bom}"),
                });
            }
            (explicit.original.clone(), VersionSource::Explicit)
        }
        (Some(explicit), None) => (explicit.original.clone(), VersionSource::Explicit),
        (None, Some((platform_version, bom))) => (
            platform_version.to_string(),
            VersionSource::Platform(bom.clone()),
        ),
        (None, None) => {
            let reason = if declared.len() > loaded.len() {
                "no version declared and no loaded platform catalog manages it"
            } else {
                "no version declared and no platform import manages it"
            };
            return Err(vec![DroidplanError::malformed(key, reason)]);
        }
    };

    let candidate = MavenVersion::parse(&version);
    for range in &ranges {
        if !range.contains(&candidate) {
            errors.push(DroidplanError::VersionConflict {
                key: key.to_string(),
                first: version.clone(),
                second: range.to_string(),
            });
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let first = decls[0];
    let mut scopes = Vec::new();
    let mut requires = Vec::new();
    let mut seen = HashSet::new();
    for decl in decls {
        if !scopes.contains(&decl.scope) {
            scopes.push(decl.scope);
        }
        for r in &decl.requires {
            if seen.insert(r.as_str()) {
                requires.push(r.clone());
            }
        }
    }

    Ok(ResolvedDependency {
        coordinate: Coordinate::new(&first.request.group, &first.request.artifact, version),
        scopes,
        index: first.index,
        requires,
        source,
    })
}
