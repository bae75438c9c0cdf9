//! Handler for `droidplan add`.

use std::path::Path;

use miette::Result;

use droidplan_ops::ops_add::{self, AddOptions};
use droidplan_util::errors::DroidplanError;

pub fn exec(
    manifest: &Path,
    coordinate: String,
    scope: Option<String>,
    platform: bool,
    requires: Vec<String>,
) -> Result<()> {
    if !manifest.is_file() {
        return Err(DroidplanError::Manifest {
            message: format!("No {} found", manifest.display()),
        }
        .into());
    }

    let label = if platform {
        "platform".to_string()
    } else {
        scope
            .clone()
            .unwrap_or_else(|| droidplan_core::descriptor::DEFAULT_CONFIGURATION.to_string())
    };
    ops_add::add_dependency(
        manifest,
        &AddOptions {
            spec: coordinate.clone(),
            scope,
            platform,
            requires,
        },
    )?;

    droidplan_util::progress::status("Adding", &format!("{coordinate} ({label})"));
    Ok(())
}
