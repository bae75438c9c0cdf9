//! Operation: create a starter `Droidplan.toml`.
//!
//! The descriptor is rendered from a template compiled into the binary.
//! `{{variable}}` placeholders are replaced at render time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use droidplan_core::DESCRIPTOR_FILE;
use droidplan_util::errors::DroidplanError;

const TEMPLATE: &str = include_str!("../templates/Droidplan.toml");

/// Lowest API level the starter descriptor targets.
pub const DEFAULT_MIN_SDK: u32 = 23;

/// Options for `droidplan init`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Android namespace; derived from the directory name when absent.
    pub namespace: Option<String>,
}

/// Write `Droidplan.toml` into `dir` and return its path.
pub fn init(dir: &Path, opts: &InitOptions) -> miette::Result<PathBuf> {
    let path = dir.join(DESCRIPTOR_FILE);
    if path.exists() {
        return Err(DroidplanError::Generic {
            message: format!("{} already exists", path.display()),
        }
        .into());
    }

    let namespace = match &opts.namespace {
        Some(ns) => ns.clone(),
        None => default_namespace(dir),
    };
    if !droidplan_planner::validate::is_dotted_identifier(&namespace) {
        return Err(DroidplanError::invalid(
            "namespace",
            format!("`{namespace}` must be a dotted identifier such as com.example.app"),
        )
        .into());
    }

    let mut vars = BTreeMap::new();
    vars.insert("namespace", namespace.clone());
    vars.insert("min_sdk", DEFAULT_MIN_SDK.to_string());
    std::fs::write(&path, interpolate(TEMPLATE, &vars)).map_err(DroidplanError::Io)?;

    droidplan_util::progress::status("Created", &format!("{DESCRIPTOR_FILE} for {namespace}"));
    Ok(path)
}

/// `com.example.<dir>` with the directory name reduced to identifier characters.
fn default_namespace(dir: &Path) -> String {
    let name = dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();
    let mut segment: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_ascii_lowercase();
    if !segment.starts_with(|c: char| c.is_ascii_alphabetic()) {
        segment.insert_str(0, "app");
    }
    format!("com.example.{segment}")
}

/// Replace all `{{key}}` placeholders in `input`.
fn interpolate(input: &str, vars: &BTreeMap<&str, String>) -> String {
    let mut result = input.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{key}}}}}"), value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use droidplan_core::descriptor::BuildDescriptor;

    #[test]
    fn writes_parseable_descriptor() {
        let tmp = tempfile::tempdir().unwrap();
        let path = init(
            tmp.path(),
            &InitOptions {
                namespace: Some("com.example.anga".to_string()),
            },
        )
        .unwrap();
        let raw = BuildDescriptor::from_path(&path).unwrap();
        assert_eq!(raw.module.namespace, "com.example.anga");
        assert_eq!(raw.module.application_id.as_deref(), Some("com.example.anga"));
        assert_eq!(raw.plugins.len(), 3);
        let parsed = raw.parse().unwrap();
        assert_eq!(parsed.constraints.len(), 2);
    }

    #[test]
    fn refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(DESCRIPTOR_FILE), "").unwrap();
        let err = init(tmp.path(), &InitOptions::default()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn rejects_bad_namespace() {
        let tmp = tempfile::tempdir().unwrap();
        let err = init(
            tmp.path(),
            &InitOptions {
                namespace: Some("anga".to_string()),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("dotted identifier"));
    }

    #[test]
    fn namespace_from_directory_name() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("My-App");
        std::fs::create_dir(&dir).unwrap();
        assert_eq!(default_namespace(&dir), "com.example.myapp");

        let numeric = tmp.path().join("2048");
        std::fs::create_dir(&numeric).unwrap();
        assert_eq!(default_namespace(&numeric), "com.example.app2048");
    }

    #[test]
    fn interpolate_replaces_known_keys() {
        let mut vars = BTreeMap::new();
        vars.insert("namespace", "com.example.anga".to_string());
        assert_eq!(
            interpolate("ns = \"{{namespace}}\" sdk = ${x}", &vars),
            "ns = \"com.example.anga\" sdk = ${x}"
        );
    }
}
