//! Handler for `droidplan plan`.

use std::path::Path;

use miette::Result;

use droidplan_ops::config::OutputFormat;
use droidplan_ops::ops_plan::{self, PlanOptions};

use crate::cli::{Format, InputArgs};

pub fn exec(manifest: &Path, inputs: InputArgs, format: Option<Format>) -> Result<()> {
    let (inputs, config) = super::load_inputs(manifest, inputs)?;
    let opts = PlanOptions {
        inputs,
        format: format.map(|f| match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }),
    };
    let output = ops_plan::plan(&opts, &config)?;
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
