//! Android SDK levels and the `[sdk]` section.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::properties;

/// A numeric setting as written: a literal integer, a numeric string, or a
/// `${property}` reference supplied by the surrounding tooling. Used for SDK
/// levels and the module's version code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SdkValue {
    Level(u32),
    Text(String),
}

impl SdkValue {
    /// Resolve to a concrete API level using `props` for `${...}` references.
    pub fn resolve(&self, props: &BTreeMap<String, String>) -> Result<u32, String> {
        self.resolve_as(props, "an API level")
    }

    /// Resolve to a number; `expected` names the kind of number in errors.
    pub fn resolve_as(&self, props: &BTreeMap<String, String>, expected: &str) -> Result<u32, String> {
        match self {
            Self::Level(n) => Ok(*n),
            Self::Text(s) => {
                let raw = properties::resolve_value(s, props)?;
                raw.trim()
                    .parse::<u32>()
                    .map_err(|_| format!("`{raw}` is not {expected}"))
            }
        }
    }
}

impl fmt::Display for SdkValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The `[sdk]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    #[serde(default)]
    pub compile: Option<SdkValue>,
    #[serde(default)]
    pub target: Option<SdkValue>,
    #[serde(default)]
    pub min: Option<SdkValue>,
}

/// Concrete SDK levels after property resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkVersions {
    pub compile: u32,
    pub target: u32,
    pub min: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_literal_and_reference() {
        let mut props = BTreeMap::new();
        props.insert("flutter.compileSdkVersion".to_string(), "35".to_string());

        assert_eq!(SdkValue::Level(23).resolve(&props), Ok(23));
        assert_eq!(SdkValue::Text("34".into()).resolve(&props), Ok(34));
        assert_eq!(
            SdkValue::Text("${flutter.compileSdkVersion}".into()).resolve(&props),
            Ok(35)
        );
    }

    #[test]
    fn missing_reference_is_reported() {
        let err = SdkValue::Text("${flutter.targetSdkVersion}".into())
            .resolve(&BTreeMap::new())
            .unwrap_err();
        assert!(err.contains("flutter.targetSdkVersion"));
    }

    #[test]
    fn non_numeric_is_reported() {
        let err = SdkValue::Text("latest".into())
            .resolve(&BTreeMap::new())
            .unwrap_err();
        assert!(err.contains("not an API level"));
    }

    #[test]
    fn version_code_error_names_expected_kind() {
        let props = BTreeMap::from([("flutter.versionCode".to_string(), "one".to_string())]);
        let err = SdkValue::Text("${flutter.versionCode}".into())
            .resolve_as(&props, "a version code")
            .unwrap_err();
        assert_eq!(err, "`one` is not a version code");
    }
}
