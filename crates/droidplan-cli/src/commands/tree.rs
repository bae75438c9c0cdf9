//! Handler for `droidplan tree`.

use std::path::Path;

use miette::Result;

use droidplan_ops::ops_tree::{self, TreeOptions};

use crate::cli::InputArgs;

pub fn exec(
    manifest: &Path,
    inputs: InputArgs,
    depth: Option<u32>,
    why: Option<String>,
    conflicts: bool,
) -> Result<()> {
    let (inputs, config) = super::load_inputs(manifest, inputs)?;
    let opts = TreeOptions {
        depth: depth.map(|d| d as usize),
        why,
        conflicts,
    };
    print!("{}", ops_tree::tree(&inputs, &config, &opts)?);
    Ok(())
}
