//! Dependency and plugin coordinates.

use std::fmt;

use droidplan_util::errors::DroidplanError;

/// A concrete `group:artifact:version` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:artifact:version"`. The version must be concrete.
    pub fn parse(s: &str) -> Result<Self, DroidplanError> {
        let request = CoordinateRequest::parse(s, false)?;
        match request.version {
            VersionSpec::Exact(version) => Ok(Self {
                group: request.group,
                artifact: request.artifact,
                version,
            }),
            VersionSpec::Range(range) => Err(DroidplanError::malformed(
                s,
                format!("expected a concrete version, found range {range}"),
            )),
            VersionSpec::Inherited => Err(DroidplanError::malformed(s, "missing version")),
        }
    }

    /// `group:artifact` slot key (without version).
    pub fn key(&self) -> String {
        slot_key(&self.group, &self.artifact)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

/// The version part of a requested coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSpec {
    /// A single concrete version, e.g. `1.9.1` or `1.1.0-beta01`.
    Exact(String),
    /// A Maven range expression, e.g. `[1.0,2.0)`.
    Range(String),
    /// No version; a platform import must supply one.
    Inherited,
}

impl VersionSpec {
    fn classify(raw: &str) -> Self {
        if raw.starts_with('[') || raw.starts_with('(') {
            Self::Range(raw.to_string())
        } else {
            Self::Exact(raw.to_string())
        }
    }

    pub fn is_inherited(&self) -> bool {
        matches!(self, Self::Inherited)
    }
}

/// A coordinate as written in a descriptor, before version resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordinateRequest {
    pub group: String,
    pub artifact: String,
    pub version: VersionSpec,
}

impl CoordinateRequest {
    /// Parse a dependency token.
    ///
    /// `group:artifact:version` always parses. The two-segment shorthand
    /// `group:artifact` is accepted only when `bom_fallback` is set, i.e. when
    /// a platform import is available to supply the version.
    pub fn parse(token: &str, bom_fallback: bool) -> Result<Self, DroidplanError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(DroidplanError::malformed(token, "empty coordinate"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DroidplanError::malformed(token, "contains whitespace"));
        }

        let parts: Vec<&str> = trimmed.split(':').collect();
        if let Some(pos) = parts.iter().position(|p| p.is_empty()) {
            return Err(DroidplanError::malformed(
                token,
                format!("segment {} is empty", pos + 1),
            ));
        }

        match parts.as_slice() {
            [group, artifact, version] => {
                let version = VersionSpec::classify(version);
                if let VersionSpec::Range(ref r) = version {
                    validate_range(token, r)?;
                }
                Ok(Self {
                    group: group.to_string(),
                    artifact: artifact.to_string(),
                    version,
                })
            }
            [group, artifact] if bom_fallback => Ok(Self {
                group: group.to_string(),
                artifact: artifact.to_string(),
                version: VersionSpec::Inherited,
            }),
            [_, _] => Err(DroidplanError::malformed(
                token,
                "no version given and no platform import supplies one",
            )),
            _ => Err(DroidplanError::malformed(
                token,
                format!("expected 3 segments, found {}", parts.len()),
            )),
        }
    }

    /// `group:artifact` slot key (without version).
    pub fn key(&self) -> String {
        slot_key(&self.group, &self.artifact)
    }
}

impl fmt::Display for CoordinateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            VersionSpec::Exact(v) | VersionSpec::Range(v) => {
                write!(f, "{}:{}:{}", self.group, self.artifact, v)
            }
            VersionSpec::Inherited => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}

/// Format a `group:artifact` slot key.
pub fn slot_key(group: &str, artifact: &str) -> String {
    format!("{group}:{artifact}")
}

fn validate_range(token: &str, range: &str) -> Result<(), DroidplanError> {
    if range.len() < 2 || !(range.ends_with(']') || range.ends_with(')')) {
        return Err(DroidplanError::malformed(
            token,
            format!("unterminated version range {range}"),
        ));
    }
    let inner = &range[1..range.len() - 1];
    if inner.trim().is_empty() || inner.matches(',').count() > 1 {
        return Err(DroidplanError::malformed(
            token,
            format!("invalid version range {range}"),
        ));
    }
    Ok(())
}

/// Validate a plugin identifier such as `com.android.application` or `kotlin-kapt`.
pub fn validate_plugin_id(id: &str) -> Result<(), DroidplanError> {
    if id.is_empty() {
        return Err(DroidplanError::malformed(id, "empty plugin id"));
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')))
    {
        return Err(DroidplanError::malformed(
            id,
            format!("plugin ids may not contain `{c}`"),
        ));
    }
    if id.starts_with('.') || id.ends_with('.') || id.contains("..") {
        return Err(DroidplanError::malformed(id, "plugin id has an empty segment"));
    }
    Ok(())
}
