use miette::Result;

use droidplan_ops::ops_init::{self, InitOptions};
use droidplan_util::errors::DroidplanError;

pub fn exec(namespace: Option<String>) -> Result<()> {
    let cwd = std::env::current_dir().map_err(DroidplanError::Io)?;
    let path = ops_init::init(&cwd, &InitOptions { namespace })?;
    println!("Initialized {}", path.display());
    Ok(())
}
