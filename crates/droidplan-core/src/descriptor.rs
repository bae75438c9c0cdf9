use std::path::Path;

use serde::{Deserialize, Serialize};

use droidplan_util::errors::DroidplanError;

use crate::compat::CompatibilitySettings;
use crate::coordinate::{validate_plugin_id, Coordinate, CoordinateRequest};
use crate::dependency::{DependencyDeclaration, PlatformImport, Scope};
use crate::plugin::{PluginConstraint, PluginDeclaration};
use crate::sdk::{SdkConfig, SdkValue};

/// Configuration name used when a dependency entry omits `scope`.
pub const DEFAULT_CONFIGURATION: &str = "implementation";

/// The raw representation of a `Droidplan.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildDescriptor {
    #[serde(default)]
    pub module: ModuleMetadata,

    #[serde(default)]
    pub sdk: SdkConfig,

    #[serde(default)]
    pub compat: CompatibilitySettings,

    #[serde(default)]
    pub plugins: Vec<PluginEntry>,

    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
}

/// Module identity from the `[module]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    #[serde(default)]
    pub namespace: String,
    #[serde(default, rename = "application-id")]
    pub application_id: Option<String>,
    #[serde(default, rename = "ndk-version")]
    pub ndk_version: Option<String>,
    /// Integer build number, usually `${flutter.versionCode}`.
    #[serde(default, rename = "version-code")]
    pub version_code: Option<SdkValue>,
    /// User-visible version, usually `${flutter.versionName}`.
    #[serde(default, rename = "version-name")]
    pub version_name: Option<String>,
}

/// A `[[plugins]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginEntry {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Plugin ids that must be applied before this one.
    #[serde(default)]
    pub after: Vec<String>,
}

/// A `[[dependencies]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyEntry {
    pub coordinate: String,
    #[serde(default)]
    pub scope: Option<String>,
    /// Marks a bill-of-materials import rather than a regular dependency.
    #[serde(default)]
    pub platform: bool,
    #[serde(default)]
    pub requires: Vec<String>,
}

/// A descriptor whose coordinates, scopes and plugin ids have been parsed.
#[derive(Debug, Clone)]
pub struct ParsedDescriptor {
    pub module: ModuleMetadata,
    pub sdk: SdkConfig,
    pub compat: CompatibilitySettings,
    pub plugins: Vec<PluginDeclaration>,
    pub constraints: Vec<PluginConstraint>,
    pub dependencies: Vec<DependencyDeclaration>,
    pub platforms: Vec<PlatformImport>,
}

impl BuildDescriptor {
    /// Load and parse a `Droidplan.toml` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DroidplanError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    /// Parse a `Droidplan.toml` from a string.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        toml::from_str(content).map_err(|e| {
            DroidplanError::Manifest {
                message: format!("Failed to parse Droidplan.toml: {e}"),
            }
            .into()
        })
    }

    /// Turn raw entries into typed declarations.
    ///
    /// Every malformed coordinate, unknown scope and invalid plugin id is
    /// collected; nothing is returned unless all entries parse.
    pub fn parse(&self) -> Result<ParsedDescriptor, Vec<DroidplanError>> {
        let mut errors = Vec::new();
        let bom_fallback = self.dependencies.iter().any(|d| d.platform);

        let mut plugins = Vec::new();
        let mut constraints = Vec::new();
        for (index, entry) in self.plugins.iter().enumerate() {
            if let Err(e) = validate_plugin_id(&entry.id) {
                errors.push(e);
                continue;
            }
            for before in &entry.after {
                match validate_plugin_id(before) {
                    Ok(()) => constraints.push(PluginConstraint::new(before, &entry.id)),
                    Err(e) => errors.push(e),
                }
            }
            plugins.push(PluginDeclaration {
                index,
                id: entry.id.clone(),
                version: entry.version.clone(),
            });
        }

        let mut dependencies = Vec::new();
        let mut platforms = Vec::new();
        for (index, entry) in self.dependencies.iter().enumerate() {
            if entry.platform {
                match Coordinate::parse(&entry.coordinate) {
                    Ok(coordinate) => platforms.push(PlatformImport { index, coordinate }),
                    Err(e) => errors.push(e),
                }
                continue;
            }

            let configuration = entry
                .scope
                .clone()
                .unwrap_or_else(|| DEFAULT_CONFIGURATION.to_string());
            let scope = Scope::from_configuration(&configuration);
            if scope.is_none() {
                errors.push(DroidplanError::invalid(
                    format!("dependencies[{index}].scope"),
                    format!("unknown configuration `{configuration}`"),
                ));
            }

            let request = CoordinateRequest::parse(&entry.coordinate, bom_fallback);
            let mut requires = Vec::new();
            for raw in &entry.requires {
                match CoordinateRequest::parse(raw, true) {
                    Ok(r) => requires.push(r.key()),
                    Err(e) => errors.push(e),
                }
            }

            match (request, scope) {
                (Ok(request), Some(scope)) => dependencies.push(DependencyDeclaration {
                    index,
                    request,
                    scope,
                    configuration,
                    requires,
                }),
                (Err(e), _) => errors.push(e),
                (Ok(_), None) => {}
            }
        }

        if errors.is_empty() {
            tracing::debug!(
                plugins = plugins.len(),
                dependencies = dependencies.len(),
                platforms = platforms.len(),
                "parsed descriptor"
            );
            Ok(ParsedDescriptor {
                module: self.module.clone(),
                sdk: self.sdk.clone(),
                compat: self.compat.clone(),
                plugins,
                constraints,
                dependencies,
                platforms,
            })
        } else {
            Err(errors)
        }
    }
}
