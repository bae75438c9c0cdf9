//! Descriptor validation.
//!
//! Every check runs; all problems are returned together.

use std::collections::BTreeMap;

use droidplan_core::compat::{JavaLevel, LevelValue};
use droidplan_core::dependency::Scope;
use droidplan_core::descriptor::ParsedDescriptor;
use droidplan_core::properties;
use droidplan_core::sdk::{SdkValue, SdkVersions};
use droidplan_resolver::graph::DependencyGraph;
use droidplan_resolver::plugin_graph::PluginGraph;
use droidplan_util::errors::DroidplanError;

/// Module settings that passed validation, in their concrete form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedModule {
    pub namespace: String,
    pub application_id: Option<String>,
    pub ndk_version: Option<String>,
    pub version_code: Option<u32>,
    pub version_name: Option<String>,
    pub sdk: SdkVersions,
    /// Shared source, target and JVM target level.
    pub language: JavaLevel,
    pub desugaring: bool,
}

pub fn validate(
    parsed: &ParsedDescriptor,
    properties: &BTreeMap<String, String>,
    graph: &DependencyGraph,
    plugins: &PluginGraph,
) -> Result<ValidatedModule, Vec<DroidplanError>> {
    let mut errors = Vec::new();

    check_identifier("module.namespace", &parsed.module.namespace, &mut errors);
    if let Some(id) = &parsed.module.application_id {
        check_identifier("module.application-id", id, &mut errors);
    }
    if let Some(ndk) = &parsed.module.ndk_version {
        let numeric = ndk
            .split('.')
            .all(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()));
        if !numeric {
            errors.push(DroidplanError::invalid(
                "module.ndk-version",
                format!("`{ndk}` is not a numeric version"),
            ));
        }
    }

    let (version_code, version_name) = check_version(parsed, properties, &mut errors);
    let sdk = check_sdk(parsed, properties, &mut errors);
    let language = check_compat(parsed, &mut errors);
    let desugaring = parsed.compat.core_library_desugaring;
    check_desugaring(parsed, graph, &mut errors);
    check_plugins(parsed, plugins, &mut errors);
    check_edges(graph, &mut errors);

    match (sdk, language) {
        (Some(sdk), Some(language)) if errors.is_empty() => {
            tracing::debug!(namespace = %parsed.module.namespace, "descriptor validated");
            Ok(ValidatedModule {
                namespace: parsed.module.namespace.clone(),
                application_id: parsed.module.application_id.clone(),
                ndk_version: parsed.module.ndk_version.clone(),
                version_code,
                version_name,
                sdk,
                language,
                desugaring,
            })
        }
        _ => Err(errors),
    }
}

/// A dotted Java package name with at least two segments.
pub fn is_dotted_identifier(value: &str) -> bool {
    let segments: Vec<&str> = value.split('.').collect();
    segments.len() >= 2
        && segments.iter().all(|seg| {
            let mut chars = seg.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

fn check_identifier(field: &str, value: &str, errors: &mut Vec<DroidplanError>) {
    if value.is_empty() {
        errors.push(DroidplanError::invalid(field, "is required"));
    } else if !is_dotted_identifier(value) {
        errors.push(DroidplanError::invalid(
            field,
            format!("`{value}` must be a dotted identifier such as com.example.app"),
        ));
    }
}

fn check_version(
    parsed: &ParsedDescriptor,
    properties: &BTreeMap<String, String>,
    errors: &mut Vec<DroidplanError>,
) -> (Option<u32>, Option<String>) {
    let code = parsed.module.version_code.as_ref().and_then(|value| {
        match value.resolve_as(properties, "a version code") {
            Ok(0) => {
                errors.push(DroidplanError::invalid("module.version-code", "must be at least 1"));
                None
            }
            Ok(code) => Some(code),
            Err(message) => {
                errors.push(DroidplanError::invalid("module.version-code", message));
                None
            }
        }
    });

    let name = parsed.module.version_name.as_deref().and_then(|value| {
        match properties::resolve_value(value, properties) {
            Ok(name) if name.trim().is_empty() => {
                errors.push(DroidplanError::invalid("module.version-name", "must not be empty"));
                None
            }
            Ok(name) => Some(name.trim().to_string()),
            Err(message) => {
                errors.push(DroidplanError::invalid("module.version-name", message));
                None
            }
        }
    });

    (code, name)
}

fn check_sdk(
    parsed: &ParsedDescriptor,
    properties: &BTreeMap<String, String>,
    errors: &mut Vec<DroidplanError>,
) -> Option<SdkVersions> {
    let resolve = |field: &str, value: &Option<SdkValue>, errors: &mut Vec<DroidplanError>| {
        let Some(value) = value else {
            errors.push(DroidplanError::invalid(field, "is required"));
            return None;
        };
        match value.resolve(properties) {
            Ok(level) => Some(level),
            Err(message) => {
                errors.push(DroidplanError::invalid(field, message));
                None
            }
        }
    };

    let compile = resolve("sdk.compile", &parsed.sdk.compile, errors);
    let target = resolve("sdk.target", &parsed.sdk.target, errors);
    let min = resolve("sdk.min", &parsed.sdk.min, errors);
    let (compile, target, min) = (compile?, target?, min?);

    let mut ok = true;
    if min > target {
        errors.push(DroidplanError::invalid(
            "sdk.min",
            format!("min ({min}) must not exceed target ({target})"),
        ));
        ok = false;
    }
    if target > compile {
        errors.push(DroidplanError::invalid(
            "sdk.target",
            format!("target ({target}) must not exceed compile ({compile})"),
        ));
        ok = false;
    }
    ok.then_some(SdkVersions {
        compile,
        target,
        min,
    })
}

fn check_compat(parsed: &ParsedDescriptor, errors: &mut Vec<DroidplanError>) -> Option<JavaLevel> {
    let level = |field: &str, value: &Option<LevelValue>, errors: &mut Vec<DroidplanError>| {
        let Some(value) = value else {
            errors.push(DroidplanError::invalid(field, "is required"));
            return None;
        };
        let level = value.to_level();
        if level.is_none() {
            errors.push(DroidplanError::invalid(
                field,
                format!("`{value}` is not a Java language level"),
            ));
        }
        level
    };

    let source = level("compat.source", &parsed.compat.source, errors);
    let target = level("compat.target", &parsed.compat.target, errors);
    let jvm = level("compat.jvm-target", &parsed.compat.jvm_target, errors);
    let (source, target, jvm) = (source?, target?, jvm?);

    if source == target && target == jvm {
        Some(source)
    } else {
        errors.push(DroidplanError::invalid(
            "compat",
            format!("source ({source}), target ({target}) and jvm-target ({jvm}) must be equal"),
        ));
        None
    }
}

fn check_desugaring(
    parsed: &ParsedDescriptor,
    graph: &DependencyGraph,
    errors: &mut Vec<DroidplanError>,
) {
    let enabled = parsed.compat.core_library_desugaring;
    let has_libs = graph
        .nodes()
        .iter()
        .any(|n| n.scopes.contains(&Scope::Desugaring));
    if has_libs && !enabled {
        errors.push(DroidplanError::invalid(
            "compat.core-library-desugaring",
            "desugaring libraries are declared but core library desugaring is disabled",
        ));
    } else if enabled && !has_libs {
        errors.push(DroidplanError::invalid(
            "compat.core-library-desugaring",
            "enabled without a coreLibraryDesugaring dependency",
        ));
    }
}

fn check_plugins(parsed: &ParsedDescriptor, plugins: &PluginGraph, errors: &mut Vec<DroidplanError>) {
    for dup in &plugins.duplicates {
        errors.push(DroidplanError::invalid(
            format!("plugins[{}].id", dup.index),
            format!("`{}` is declared more than once", dup.id),
        ));
    }
    for unknown in &plugins.unknown {
        let declaring = parsed
            .plugins
            .iter()
            .find(|p| p.id == unknown.constraint.after)
            .map(|p| p.index);
        let field = match declaring {
            Some(index) => format!("plugins[{index}].after"),
            None => "plugins".to_string(),
        };
        errors.push(DroidplanError::invalid(
            field,
            format!("`{}` is not a declared plugin", unknown.missing),
        ));
    }
}

fn check_edges(graph: &DependencyGraph, errors: &mut Vec<DroidplanError>) {
    for edge in &graph.rejected {
        errors.push(DroidplanError::invalid(
            format!("dependencies[{}].requires", edge.declaration),
            format!(
                "{} dependency {} cannot require {} dependency {}",
                edge.to_scope, edge.to, edge.from_scope, edge.from
            ),
        ));
    }
    for unknown in &graph.unknown {
        errors.push(DroidplanError::invalid(
            format!("dependencies[{}].requires", unknown.declaration),
            format!("`{}` is not a declared dependency", unknown.missing),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_identifiers() {
        assert!(is_dotted_identifier("com.example.anga"));
        assert!(is_dotted_identifier("com.example_app.v2"));
        assert!(!is_dotted_identifier("anga"));
        assert!(!is_dotted_identifier("com..example"));
        assert!(!is_dotted_identifier("com.1example"));
        assert!(!is_dotted_identifier("com.example-app"));
    }
}
