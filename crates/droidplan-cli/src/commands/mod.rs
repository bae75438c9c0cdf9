//! Command dispatch and handler modules.

mod add;
mod check;
mod init;
mod plan;
mod tree;

use miette::Result;

use droidplan_ops::config::GlobalConfig;
use droidplan_ops::ops_plan::InputOptions;

use crate::cli::{Cli, Command, InputArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    tracing::debug!(command = ?cli.command, manifest = %cli.manifest.display(), "dispatching");
    match cli.command {
        Command::Plan { inputs, format } => plan::exec(&cli.manifest, inputs, format),
        Command::Check { inputs } => check::exec(&cli.manifest, inputs),
        Command::Tree {
            inputs,
            depth,
            why,
            conflicts,
        } => tree::exec(&cli.manifest, inputs, depth, why, conflicts),
        Command::Add {
            coordinate,
            scope,
            platform,
            requires,
        } => add::exec(&cli.manifest, coordinate, scope, platform, requires),
        Command::Init { namespace } => init::exec(namespace),
    }
}

/// Load the global config and combine it with command-line inputs.
fn load_inputs(manifest: &std::path::Path, args: InputArgs) -> Result<(InputOptions, GlobalConfig)> {
    if !manifest.is_file() {
        return Err(droidplan_util::errors::DroidplanError::Manifest {
            message: format!("No {} found", manifest.display()),
        }
        .into());
    }
    let config = GlobalConfig::load()?;
    let opts = InputOptions {
        manifest_path: manifest.to_path_buf(),
        platforms: args.platforms,
        properties: args.properties,
    };
    Ok((opts, config))
}
