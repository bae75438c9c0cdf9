use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all droidplan operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DroidplanError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or syntactically invalid descriptor, catalog or config file.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your Droidplan.toml for syntax errors"))]
    Manifest { message: String },

    /// A dependency or plugin identifier could not be parsed into a coordinate.
    #[error("Malformed coordinate `{token}`: {reason}")]
    #[diagnostic(
        code(droidplan::malformed_coordinate),
        help("Use group:artifact:version, or group:artifact together with a platform import")
    )]
    MalformedCoordinate { token: String, reason: String },

    /// Two incompatible explicit versions were declared for the same slot.
    #[error("Version conflict for {key}: {first} vs {second}")]
    #[diagnostic(
        code(droidplan::version_conflict),
        help("Declare a single explicit version for this artifact")
    )]
    VersionConflict {
        key: String,
        first: String,
        second: String,
    },

    /// The dependency or plugin ordering graph contains a cycle.
    #[error("Cyclic dependency: {}", .path.join(" -> "))]
    #[diagnostic(code(droidplan::cyclic_dependency))]
    CyclicDependency { path: Vec<String> },

    /// A descriptor field is missing or inconsistent with another field.
    #[error("Invalid configuration: {field}: {message}")]
    #[diagnostic(code(droidplan::invalid_configuration))]
    InvalidConfiguration { field: String, message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl DroidplanError {
    pub fn malformed(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCoordinate {
            token: token.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Terminal failure states of the resolution pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    ParseFailed,
    ResolutionFailed,
    CycleDetected,
    ValidationFailed,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ParseFailed => "parsing failed",
            Self::ResolutionFailed => "version resolution failed",
            Self::CycleDetected => "dependency cycle detected",
            Self::ValidationFailed => "validation failed",
        };
        f.write_str(s)
    }
}

/// A failed pipeline run with every error collected at the failing stage.
#[derive(Debug, Error, Diagnostic)]
#[error("Build plan {stage} with {} error(s)", .errors.len())]
#[diagnostic(help("Fix the configuration and run droidplan again"))]
pub struct PlanFailure {
    pub stage: FailureStage,
    #[related]
    pub errors: Vec<DroidplanError>,
}

impl PlanFailure {
    pub fn new(stage: FailureStage, errors: Vec<DroidplanError>) -> Self {
        Self { stage, errors }
    }
}

/// Convenience alias for `miette::Result<T>`.
pub type DroidplanResult<T> = miette::Result<T>;
