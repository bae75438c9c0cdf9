use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, CoordinateRequest};

/// The build phase during which a dependency is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    TestOnly,
    AnnotationProcessor,
    Desugaring,
}

impl Scope {
    /// Map a Gradle configuration name (`implementation`, `kapt`, ...) to a scope.
    ///
    /// Scope names themselves (`compile`, `testOnly`, ...) are accepted too.
    pub fn from_configuration(name: &str) -> Option<Self> {
        let scope = match name {
            "implementation" | "api" | "compileOnly" | "compile" => Self::Compile,
            "runtimeOnly" | "runtime" => Self::Runtime,
            "testImplementation" | "androidTestImplementation" | "testOnly" | "test" => {
                Self::TestOnly
            }
            "kapt" | "ksp" | "annotationProcessor" => Self::AnnotationProcessor,
            "coreLibraryDesugaring" | "desugaring" => Self::Desugaring,
            _ => return None,
        };
        Some(scope)
    }

    /// Whether a dependency in this scope may be required before one in `downstream`.
    ///
    /// Annotation processors and desugaring libraries are sinks: nothing is
    /// resolved after them on their account.
    pub fn feeds(self, downstream: Scope) -> bool {
        match self {
            Self::Compile => true,
            Self::Runtime => matches!(downstream, Self::Runtime | Self::TestOnly),
            Self::TestOnly => downstream == Self::TestOnly,
            Self::AnnotationProcessor | Self::Desugaring => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Runtime => "runtime",
            Self::TestOnly => "testOnly",
            Self::AnnotationProcessor => "annotationProcessor",
            Self::Desugaring => "desugaring",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared dependency, immutable after parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    /// Position in the descriptor's `[[dependencies]]` array.
    pub index: usize,
    pub request: CoordinateRequest,
    pub scope: Scope,
    /// The configuration name as written (`implementation`, `kapt`, ...).
    pub configuration: String,
    /// Slot keys (`group:artifact`) that must be resolved before this one.
    pub requires: Vec<String>,
}

impl DependencyDeclaration {
    pub fn key(&self) -> String {
        self.request.key()
    }
}

/// A bill-of-materials import (`platform = true` in the descriptor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformImport {
    pub index: usize,
    pub coordinate: Coordinate,
}
