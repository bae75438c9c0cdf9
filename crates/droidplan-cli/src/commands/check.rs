//! Handler for `droidplan check`.

use std::path::Path;

use miette::Result;

use droidplan_ops::ops_check;

use crate::cli::InputArgs;

pub fn exec(manifest: &Path, inputs: InputArgs) -> Result<()> {
    let (inputs, config) = super::load_inputs(manifest, inputs)?;
    let summary = ops_check::check(&inputs, &config)?;
    println!(
        "{}: {} dependencies, {} plugins, configuration is valid",
        summary.namespace, summary.dependencies, summary.plugins
    );
    Ok(())
}
