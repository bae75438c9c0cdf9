//! Operation: display the dependency tree.

use droidplan_planner::pipeline::{Pipeline, Stage};

use crate::config::GlobalConfig;
use crate::ops_plan::{load_inputs, InputOptions};

/// Options for `droidplan tree`.
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show everything that requires this dependency.
    pub why: Option<String>,
    /// Show version overrides instead of the tree.
    pub conflicts: bool,
}

/// Render the dependency tree. Validation is not required.
pub fn tree(inputs: &InputOptions, config: &GlobalConfig, opts: &TreeOptions) -> miette::Result<String> {
    let mut pipeline = Pipeline::new(load_inputs(inputs, config)?);
    pipeline.advance_to(Stage::GraphBuilt);

    if let Stage::Failed(_) = pipeline.stage() {
        return Err(match pipeline.into_failure() {
            Some(failure) => miette::Report::new(failure),
            None => miette::miette!("dependency graph could not be built"),
        });
    }
    let (Some(resolution), Some(graphs)) = (pipeline.resolution(), pipeline.graphs()) else {
        return Err(miette::miette!("pipeline stopped before the graph was built"));
    };

    if opts.conflicts {
        return Ok(format!("{}\n", resolution.overrides));
    }

    if let Some(ref target) = opts.why {
        return Ok(graphs
            .dependencies
            .print_inverted_tree(target)
            .unwrap_or_else(|| format!("Dependency '{target}' not found in the graph.\n")));
    }

    Ok(graphs.dependencies.print_tree(opts.depth))
}
