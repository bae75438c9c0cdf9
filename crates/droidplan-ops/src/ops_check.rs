//! Operation: validate a descriptor without emitting a plan.

use droidplan_planner::pipeline::{Pipeline, PipelineState, Stage};

use crate::config::GlobalConfig;
use crate::ops_plan::{load_inputs, InputOptions};

/// What a successful check found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSummary {
    pub namespace: String,
    pub dependencies: usize,
    pub plugins: usize,
    pub overrides: usize,
}

/// Run the pipeline up to validation and report the outcome.
pub fn check(opts: &InputOptions, config: &GlobalConfig) -> miette::Result<CheckSummary> {
    let mut pipeline = Pipeline::new(load_inputs(opts, config)?);
    pipeline.advance_to(Stage::Validated);

    let summary = match pipeline.state() {
        PipelineState::Validated(module, resolution, graphs) => CheckSummary {
            namespace: module.namespace.clone(),
            dependencies: graphs.dependencies.len(),
            plugins: graphs.plugins.len(),
            overrides: resolution.overrides.len(),
        },
        _ => {
            return Err(match pipeline.into_failure() {
                Some(failure) => miette::Report::new(failure),
                None => miette::miette!("pipeline stopped before validation"),
            })
        }
    };

    droidplan_util::progress::status(
        "Checked",
        &format!(
            "{} ({} dependencies, {} plugins)",
            summary.namespace, summary.dependencies, summary.plugins
        ),
    );
    if summary.overrides > 0 {
        droidplan_util::progress::status_warn(
            "Warning",
            &format!("{} version override(s); run `droidplan tree --conflicts`", summary.overrides),
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &std::path::Path, content: &str) -> InputOptions {
        let path = dir.join("Droidplan.toml");
        std::fs::write(&path, content).unwrap();
        InputOptions {
            manifest_path: path,
            ..Default::default()
        }
    }

    #[test]
    fn valid_descriptor_is_summarised() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = write(
            tmp.path(),
            r#"
[module]
namespace = "com.example.anga"

[sdk]
compile = 35
target = 35
min = 23

[compat]
source = 17
target = 17
jvm-target = 17

[[plugins]]
id = "com.android.application"

[[dependencies]]
coordinate = "androidx.core:core-ktx:1.13.1"

[[dependencies]]
coordinate = "junit:junit:4.13.2"
scope = "testImplementation"
"#,
        );
        let summary = check(&opts, &GlobalConfig::default()).unwrap();
        assert_eq!(summary.namespace, "com.example.anga");
        assert_eq!(summary.dependencies, 2);
        assert_eq!(summary.plugins, 1);
        assert_eq!(summary.overrides, 0);
    }

    #[test]
    fn invalid_descriptor_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let opts = write(tmp.path(), "[module]\nnamespace = \"anga\"\n");
        let err = check(&opts, &GlobalConfig::default()).unwrap_err();
        assert!(err.to_string().contains("validation failed"), "got: {err}");
    }
}
