//! Operation: resolve a descriptor into a build plan.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use droidplan_core::descriptor::BuildDescriptor;
use droidplan_core::platform::PlatformCatalog;
use droidplan_core::properties;
use droidplan_planner::pipeline::{Pipeline, PlanInputs};
use droidplan_planner::ResolvedBuildPlan;

use crate::config::{GlobalConfig, OutputFormat};

/// Property file Flutter writes next to the Android module.
pub const LOCAL_PROPERTIES: &str = "local.properties";

/// Where to read pipeline inputs from. Empty fields fall back to the global config.
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    pub manifest_path: PathBuf,
    pub platforms: Vec<PathBuf>,
    pub properties: Option<PathBuf>,
}

/// Options for `droidplan plan`.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub inputs: InputOptions,
    pub format: Option<OutputFormat>,
}

/// Read the descriptor, platform catalogs and properties.
///
/// Property precedence, lowest first: `[properties]` in the global config,
/// `local.properties` beside the descriptor, then the explicit or configured
/// property file.
pub fn load_inputs(opts: &InputOptions, config: &GlobalConfig) -> miette::Result<PlanInputs> {
    let descriptor = BuildDescriptor::from_path(&opts.manifest_path)?;

    let platform_files = if opts.platforms.is_empty() {
        &config.defaults.platforms
    } else {
        &opts.platforms
    };
    let mut catalog = PlatformCatalog::new();
    for path in platform_files {
        tracing::debug!(path = %path.display(), "loading platform catalog");
        catalog.merge(PlatformCatalog::from_path(path)?);
    }
    if !platform_files.is_empty() {
        droidplan_util::progress::status_info(
            "Loaded",
            &format!("{} platform catalog(s)", platform_files.len()),
        );
    }

    let mut props: BTreeMap<String, String> = config.properties.clone();
    let module_dir = opts.manifest_path.parent().unwrap_or(Path::new("."));
    props.extend(properties::load_properties(&module_dir.join(LOCAL_PROPERTIES))?);
    if let Some(path) = opts.properties.as_ref().or(config.defaults.properties.as_ref()) {
        props.extend(properties::load_properties(path)?);
    }

    Ok(PlanInputs {
        descriptor,
        catalog,
        properties: props,
    })
}

/// Run the full pipeline and return the plan.
pub fn build_plan(opts: &InputOptions, config: &GlobalConfig) -> miette::Result<ResolvedBuildPlan> {
    let inputs = load_inputs(opts, config)?;
    Pipeline::new(inputs).run().map_err(miette::Report::new)
}

/// Resolve the plan and render it in the requested format.
pub fn plan(opts: &PlanOptions, config: &GlobalConfig) -> miette::Result<String> {
    let plan = build_plan(&opts.inputs, config)?;
    droidplan_util::progress::status(
        "Planned",
        &format!("{} ({} tasks)", plan.namespace(), plan.len()),
    );
    for o in &plan.overrides().overrides {
        droidplan_util::progress::status_warn("Overriding", &o.to_string());
    }

    match opts.format.or(config.defaults.format).unwrap_or_default() {
        OutputFormat::Text => Ok(plan.to_string()),
        OutputFormat::Json => plan.to_json(),
    }
}
