//! The resolution pipeline.
//!
//! `Unparsed -> Parsed -> VersionResolved -> GraphBuilt -> Validated -> Emitted`.
//! Each stage collects every error it finds before failing. A failed pipeline
//! stays failed: advancing it again does nothing.

use std::collections::BTreeMap;
use std::fmt;

use droidplan_core::descriptor::{BuildDescriptor, ParsedDescriptor};
use droidplan_core::platform::PlatformCatalog;
use droidplan_resolver::graph::DependencyGraph;
use droidplan_resolver::plugin_graph::PluginGraph;
use droidplan_resolver::resolver::{resolve_versions, VersionResolution};
use droidplan_util::errors::{DroidplanError, FailureStage, PlanFailure};

use crate::emit::emit;
use crate::task::ResolvedBuildPlan;
use crate::validate::{validate, ValidatedModule};

/// Everything a pipeline run reads. No I/O happens past this point.
#[derive(Debug, Clone, Default)]
pub struct PlanInputs {
    pub descriptor: BuildDescriptor,
    pub catalog: PlatformCatalog,
    /// Values for `${name}` references in the descriptor.
    pub properties: BTreeMap<String, String>,
}

/// A pipeline stage, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unparsed,
    Parsed,
    VersionResolved,
    GraphBuilt,
    Validated,
    Emitted,
    Failed(FailureStage),
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Emitted | Self::Failed(_))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparsed => f.write_str("unparsed"),
            Self::Parsed => f.write_str("parsed"),
            Self::VersionResolved => f.write_str("versions resolved"),
            Self::GraphBuilt => f.write_str("graph built"),
            Self::Validated => f.write_str("validated"),
            Self::Emitted => f.write_str("emitted"),
            Self::Failed(stage) => write!(f, "{stage}"),
        }
    }
}

pub struct Graphs {
    pub dependencies: DependencyGraph,
    pub plugins: PluginGraph,
}

/// Pipeline state together with what each stage produced.
pub enum PipelineState {
    Unparsed,
    Parsed(ParsedDescriptor),
    VersionResolved(ParsedDescriptor, VersionResolution),
    GraphBuilt(ParsedDescriptor, VersionResolution, Graphs),
    Validated(ValidatedModule, VersionResolution, Graphs),
    Emitted(ResolvedBuildPlan),
    Failed(PlanFailure),
}

impl PipelineState {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Unparsed => Stage::Unparsed,
            Self::Parsed(..) => Stage::Parsed,
            Self::VersionResolved(..) => Stage::VersionResolved,
            Self::GraphBuilt(..) => Stage::GraphBuilt,
            Self::Validated(..) => Stage::Validated,
            Self::Emitted(_) => Stage::Emitted,
            Self::Failed(failure) => Stage::Failed(failure.stage),
        }
    }
}

pub struct Pipeline {
    inputs: PlanInputs,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(inputs: PlanInputs) -> Self {
        Self {
            inputs,
            state: PipelineState::Unparsed,
        }
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Move to the next stage. Terminal states are left unchanged.
    pub fn advance(&mut self) -> Stage {
        let current = std::mem::replace(&mut self.state, PipelineState::Unparsed);
        self.state = self.step(current);
        let stage = self.stage();
        tracing::debug!(%stage, "pipeline transition");
        stage
    }

    /// Advance until `target` is reached or the pipeline stops.
    pub fn advance_to(&mut self, target: Stage) -> Stage {
        let mut stage = self.stage();
        while stage != target && !stage.is_terminal() {
            stage = self.advance();
        }
        stage
    }

    /// Run every stage and return the plan or the failure.
    pub fn run(mut self) -> Result<ResolvedBuildPlan, PlanFailure> {
        loop {
            match self.state {
                PipelineState::Emitted(plan) => return Ok(plan),
                PipelineState::Failed(failure) => return Err(failure),
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn step(&self, state: PipelineState) -> PipelineState {
        let inputs = &self.inputs;
        match state {
            PipelineState::Unparsed => match inputs.descriptor.parse() {
                Ok(parsed) => PipelineState::Parsed(parsed),
                Err(errors) => fail(FailureStage::ParseFailed, errors),
            },
            PipelineState::Parsed(parsed) => {
                match resolve_versions(&parsed.dependencies, &parsed.platforms, &inputs.catalog) {
                    Ok(resolution) => {
                        for o in &resolution.overrides.overrides {
                            tracing::warn!(slot = %o.key, "{o}");
                        }
                        PipelineState::VersionResolved(parsed, resolution)
                    }
                    Err(errors) => fail(FailureStage::ResolutionFailed, errors),
                }
            }
            PipelineState::VersionResolved(parsed, resolution) => {
                let dependencies = DependencyGraph::build(&resolution);
                let plugins = PluginGraph::build(&parsed.plugins, &parsed.constraints);
                match (dependencies, plugins) {
                    (Ok(dependencies), Ok(plugins)) => PipelineState::GraphBuilt(
                        parsed,
                        resolution,
                        Graphs {
                            dependencies,
                            plugins,
                        },
                    ),
                    (dependencies, plugins) => {
                        let errors = [dependencies.err(), plugins.err()]
                            .into_iter()
                            .flatten()
                            .collect();
                        fail(FailureStage::CycleDetected, errors)
                    }
                }
            }
            PipelineState::GraphBuilt(parsed, resolution, graphs) => match validate(
                &parsed,
                &inputs.properties,
                &graphs.dependencies,
                &graphs.plugins,
            ) {
                Ok(module) => PipelineState::Validated(module, resolution, graphs),
                Err(errors) => fail(FailureStage::ValidationFailed, errors),
            },
            PipelineState::Validated(module, resolution, graphs) => match emit(
                &module,
                &graphs.plugins,
                &graphs.dependencies,
                &resolution.overrides,
            ) {
                Ok(plan) => PipelineState::Emitted(plan),
                Err(e) => fail(FailureStage::CycleDetected, vec![e]),
            },
            terminal @ (PipelineState::Emitted(_) | PipelineState::Failed(_)) => terminal,
        }
    }

    pub fn resolution(&self) -> Option<&VersionResolution> {
        match &self.state {
            PipelineState::VersionResolved(_, r)
            | PipelineState::GraphBuilt(_, r, _)
            | PipelineState::Validated(_, r, _) => Some(r),
            _ => None,
        }
    }

    pub fn graphs(&self) -> Option<&Graphs> {
        match &self.state {
            PipelineState::GraphBuilt(_, _, g) | PipelineState::Validated(_, _, g) => Some(g),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&PlanFailure> {
        match &self.state {
            PipelineState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn plan(&self) -> Option<&ResolvedBuildPlan> {
        match &self.state {
            PipelineState::Emitted(plan) => Some(plan),
            _ => None,
        }
    }

    /// Take the failure out of a failed pipeline.
    pub fn into_failure(self) -> Option<PlanFailure> {
        match self.state {
            PipelineState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

fn fail(stage: FailureStage, errors: Vec<DroidplanError>) -> PipelineState {
    tracing::debug!(%stage, count = errors.len(), "pipeline failed");
    PipelineState::Failed(PlanFailure::new(stage, errors))
}
