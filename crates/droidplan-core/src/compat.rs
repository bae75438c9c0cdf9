//! Java/Kotlin language-level compatibility settings.
//!
//! `sourceCompatibility`, `targetCompatibility` and the Kotlin `jvmTarget`
//! are written in several spellings (`17`, `"1.8"`, `"VERSION_17"`,
//! `"JavaVersion.VERSION_1_8"`). All of them normalize to a single
//! [`JavaLevel`] so the three settings can be compared.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A normalized Java language epoch (`8`, `11`, `17`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JavaLevel(pub u32);

impl JavaLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        let s = s.strip_prefix("JavaVersion.").unwrap_or(s);
        let s = s.strip_prefix("VERSION_").unwrap_or(s);
        let s = s.replace('_', ".");
        let s = s.strip_prefix("1.").unwrap_or(&s);
        match s.parse::<u32>() {
            Ok(n) if n > 0 => Some(Self(n)),
            _ => None,
        }
    }
}

impl fmt::Display for JavaLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A compatibility level as written in the descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelValue {
    Integer(u32),
    Float(f64),
    Text(String),
}

impl LevelValue {
    pub fn to_level(&self) -> Option<JavaLevel> {
        match self {
            Self::Integer(n) => JavaLevel::parse(&n.to_string()),
            Self::Float(x) => JavaLevel::parse(&x.to_string()),
            Self::Text(s) => JavaLevel::parse(s),
        }
    }
}

impl fmt::Display for LevelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The `[compat]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompatibilitySettings {
    #[serde(default)]
    pub source: Option<LevelValue>,
    #[serde(default)]
    pub target: Option<LevelValue>,
    #[serde(default, rename = "jvm-target")]
    pub jvm_target: Option<LevelValue>,
    #[serde(default, rename = "core-library-desugaring")]
    pub core_library_desugaring: bool,
}
