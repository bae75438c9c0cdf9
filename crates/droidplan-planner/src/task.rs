//! The build plan handed to the execution engine.

use std::fmt;

use serde::Serialize;

use droidplan_core::compat::JavaLevel;
use droidplan_core::dependency::Scope;
use droidplan_resolver::conflict::OverrideReport;
use droidplan_util::errors::DroidplanError;

use crate::validate::ValidatedModule;

/// What a task does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskKind {
    ApplyPlugin {
        plugin: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<String>,
    },
    ConfigureCompiler {
        source: JavaLevel,
        target: JavaLevel,
        jvm_target: JavaLevel,
        desugaring: bool,
    },
    ConfigureSdk {
        compile: u32,
        target: u32,
        min: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        ndk_version: Option<String>,
    },
    ResolveDependency {
        coordinate: String,
        scope: Scope,
        #[serde(skip_serializing_if = "Option::is_none")]
        platform: Option<String>,
    },
    ProcessAnnotations,
    CompileMain,
    CompileTests,
    Assemble,
}

/// One step of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// Position in the plan; every id in `depends_on` is lower.
    pub id: usize,
    pub name: String,
    #[serde(flatten)]
    pub kind: TaskKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<usize>,
    /// Resolved coordinates (`group:artifact:version`) this task consumes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

/// An ordered, validated task sequence. Built once by the emitter and never
/// modified afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedBuildPlan {
    namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_code: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_name: Option<String>,
    tasks: Vec<Task>,
    #[serde(skip_serializing_if = "OverrideReport::is_empty")]
    overrides: OverrideReport,
}

impl ResolvedBuildPlan {
    pub(crate) fn new(module: &ValidatedModule, tasks: Vec<Task>, overrides: OverrideReport) -> Self {
        Self {
            namespace: module.namespace.clone(),
            application_id: module.application_id.clone(),
            version_code: module.version_code,
            version_name: module.version_name.clone(),
            tasks,
            overrides,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    pub fn version_code(&self) -> Option<u32> {
        self.version_code
    }

    pub fn version_name(&self) -> Option<&str> {
        self.version_name.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn overrides(&self) -> &OverrideReport {
        &self.overrides
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Find the first task with the given name.
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    /// Position of the named task in the plan.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.name == name)
    }

    /// Pretty-printed JSON for the execution engine.
    pub fn to_json(&self) -> miette::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DroidplanError::Generic {
                message: format!("Failed to serialize build plan: {e}"),
            }
            .into()
        })
    }
}

impl fmt::Display for ResolvedBuildPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Build plan for {} ({} tasks)", self.namespace, self.tasks.len())?;
        if let Some(id) = &self.application_id {
            write!(f, "  application {id}")?;
            match (&self.version_name, self.version_code) {
                (Some(name), Some(code)) => write!(f, " {name} ({code})")?,
                (Some(name), None) => write!(f, " {name}")?,
                (None, Some(code)) => write!(f, " ({code})")?,
                (None, None) => {}
            }
            writeln!(f)?;
        }
        for task in &self.tasks {
            write!(f, "{:>4}  {}", task.id, task.name)?;
            if !task.depends_on.is_empty() {
                let deps: Vec<String> = task.depends_on.iter().map(|d| d.to_string()).collect();
                write!(f, "  (after {})", deps.join(", "))?;
            }
            writeln!(f)?;
            if let TaskKind::ConfigureSdk {
                ndk_version: Some(ndk),
                ..
            } = &task.kind
            {
                writeln!(f, "        ndk {ndk}")?;
            }
            if !matches!(task.kind, TaskKind::ResolveDependency { .. }) {
                for dep in &task.dependencies {
                    writeln!(f, "        uses {dep}")?;
                }
            }
        }
        if !self.overrides.is_empty() {
            write!(f, "{}", self.overrides)?;
        }
        Ok(())
    }
}
