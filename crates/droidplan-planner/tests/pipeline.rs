use std::collections::BTreeMap;

use droidplan_core::descriptor::BuildDescriptor;
use droidplan_core::platform::PlatformCatalog;
use droidplan_planner::pipeline::{Pipeline, PlanInputs, Stage};
use droidplan_planner::task::TaskKind;
use droidplan_util::errors::{DroidplanError, FailureStage};

const MINIMAL: &str = r#"
[module]
namespace = "com.example.anga"

[sdk]
compile = 35
target = 34
min = 23

[compat]
source = 17
target = "17"
jvm-target = "JavaVersion.VERSION_17"

[[plugins]]
id = "com.android.application"

[[plugins]]
id = "dev.flutter.flutter-gradle-plugin"
after = ["com.android.application"]

[[dependencies]]
coordinate = "g:a:1.0"
scope = "implementation"
"#;

const FLUTTER_APP: &str = r#"
[module]
namespace = "com.example.anga"
application-id = "com.example.anga"
ndk-version = "27.0.12077973"
version-code = "${flutter.versionCode}"
version-name = "${flutter.versionName}"

[sdk]
compile = "${flutter.compileSdkVersion}"
target = "${flutter.targetSdkVersion}"
min = 23

[compat]
source = "VERSION_17"
target = "VERSION_17"
jvm-target = "17"
core-library-desugaring = true

[[plugins]]
id = "dev.flutter.flutter-gradle-plugin"
after = ["com.android.application", "kotlin-android"]

[[plugins]]
id = "com.android.application"

[[plugins]]
id = "kotlin-android"

[[plugins]]
id = "kotlin-kapt"
after = ["kotlin-android"]

[[dependencies]]
coordinate = "com.android.tools:desugar_jdk_libs:2.1.4"
scope = "coreLibraryDesugaring"

[[dependencies]]
coordinate = "com.google.firebase:firebase-bom:33.15.0"
platform = true

[[dependencies]]
coordinate = "com.google.firebase:firebase-auth"

[[dependencies]]
coordinate = "com.google.dagger:hilt-android-compiler:2.44"
scope = "kapt"
"#;

fn inputs(toml: &str) -> PlanInputs {
    PlanInputs {
        descriptor: BuildDescriptor::parse_toml(toml).unwrap(),
        ..Default::default()
    }
}

fn flutter_inputs() -> PlanInputs {
    let catalog = PlatformCatalog::parse_toml(
        r#"
["com.google.firebase:firebase-bom:33.15.0"]
"com.google.firebase:firebase-auth" = "23.2.1"
"#,
    )
    .unwrap();
    let properties = BTreeMap::from([
        ("flutter.compileSdkVersion".to_string(), "35".to_string()),
        ("flutter.targetSdkVersion".to_string(), "35".to_string()),
        ("flutter.versionCode".to_string(), "7".to_string()),
        ("flutter.versionName".to_string(), "1.2.0".to_string()),
    ]);
    PlanInputs {
        descriptor: BuildDescriptor::parse_toml(FLUTTER_APP).unwrap(),
        catalog,
        properties,
    }
}

fn names(plan: &droidplan_planner::ResolvedBuildPlan) -> Vec<&str> {
    plan.tasks().iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn plugin_after_constraint_orders_apply_tasks() {
    let plan = Pipeline::new(inputs(MINIMAL)).run().unwrap();
    assert_eq!(
        names(&plan),
        vec![
            "applyPlugin:com.android.application",
            "applyPlugin:dev.flutter.flutter-gradle-plugin",
            "configureCompiler",
            "configureSdk",
            "resolve:g:a",
            "compileMain",
            "assemble",
        ]
    );
    let sdk = plan.task("configureSdk").unwrap();
    assert_eq!(
        sdk.kind,
        TaskKind::ConfigureSdk {
            compile: 35,
            target: 34,
            min: 23,
            ndk_version: None,
        }
    );
}

#[test]
fn conflicting_versions_fail_resolution() {
    let toml = r#"
[module]
namespace = "com.example.anga"

[[dependencies]]
coordinate = "g:a:2.0"

[[dependencies]]
coordinate = "g:a:1.0"
"#;
    let failure = Pipeline::new(inputs(toml)).run().unwrap_err();
    assert_eq!(failure.stage, FailureStage::ResolutionFailed);
    assert_eq!(failure.errors.len(), 1);
    assert_eq!(
        failure.errors[0].to_string(),
        "Version conflict for g:a: 1.0 vs 2.0"
    );
}

#[test]
fn flutter_module_plans_every_phase() {
    let plan = Pipeline::new(flutter_inputs()).run().unwrap();
    assert_eq!(plan.namespace(), "com.example.anga");
    assert_eq!(plan.application_id(), Some("com.example.anga"));

    let apply: Vec<&str> = names(&plan)
        .into_iter()
        .filter(|n| n.starts_with("applyPlugin:"))
        .collect();
    assert_eq!(
        apply,
        vec![
            "applyPlugin:com.android.application",
            "applyPlugin:kotlin-android",
            "applyPlugin:dev.flutter.flutter-gradle-plugin",
            "applyPlugin:kotlin-kapt",
        ]
    );

    let auth = plan
        .task("resolve:com.google.firebase:firebase-auth")
        .unwrap();
    assert_eq!(
        auth.kind,
        TaskKind::ResolveDependency {
            coordinate: "com.google.firebase:firebase-auth:23.2.1".to_string(),
            scope: droidplan_core::dependency::Scope::Compile,
            platform: Some("com.google.firebase:firebase-bom:33.15.0".to_string()),
        }
    );

    let processors = plan.task("processAnnotations").unwrap();
    assert_eq!(
        processors.dependencies,
        vec!["com.google.dagger:hilt-android-compiler:2.44"]
    );
    let main = plan.task("compileMain").unwrap();
    assert!(main.depends_on.contains(&processors.id));
    assert_eq!(
        main.dependencies,
        vec![
            "com.android.tools:desugar_jdk_libs:2.1.4",
            "com.google.firebase:firebase-auth:23.2.1"
        ]
    );
    assert!(plan.task("compileTests").is_none());
    assert_eq!(plan.tasks().last().unwrap().name, "assemble");
}

#[test]
fn module_identity_reaches_the_plan() {
    let plan = Pipeline::new(flutter_inputs()).run().unwrap();
    assert_eq!(plan.version_code(), Some(7));
    assert_eq!(plan.version_name(), Some("1.2.0"));
    assert!(matches!(
        &plan.task("configureSdk").unwrap().kind,
        TaskKind::ConfigureSdk { ndk_version: Some(ndk), .. } if ndk == "27.0.12077973"
    ));

    let json: serde_json::Value = serde_json::from_str(&plan.to_json().unwrap()).unwrap();
    assert_eq!(json["version_code"], 7);
    assert_eq!(json["version_name"], "1.2.0");
    let sdk = plan.position("configureSdk").unwrap();
    assert_eq!(json["tasks"][sdk]["ndk_version"], "27.0.12077973");

    let text = plan.to_string();
    assert!(text.contains("  application com.example.anga 1.2.0 (7)\n"));
    assert!(text.contains("        ndk 27.0.12077973\n"));
}

#[test]
fn unresolved_version_code_is_a_field_error() {
    let mut inputs = flutter_inputs();
    inputs.properties.remove("flutter.versionCode");
    inputs.properties.insert("flutter.versionName".to_string(), " ".to_string());
    let failure = Pipeline::new(inputs).run().unwrap_err();
    assert_eq!(failure.stage, FailureStage::ValidationFailed);
    let fields: Vec<&str> = failure
        .errors
        .iter()
        .filter_map(|e| match e {
            DroidplanError::InvalidConfiguration { field, .. } => Some(field.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(fields, vec!["module.version-code", "module.version-name"]);
}

#[test]
fn desugaring_enabled_without_library_fails() {
    let toml = MINIMAL.replace(
        "jvm-target = \"JavaVersion.VERSION_17\"",
        "jvm-target = \"JavaVersion.VERSION_17\"\ncore-library-desugaring = true",
    );
    let failure = Pipeline::new(inputs(&toml)).run().unwrap_err();
    assert_eq!(failure.stage, FailureStage::ValidationFailed);
    assert_eq!(
        failure.errors[0].to_string(),
        "Invalid configuration: compat.core-library-desugaring: enabled without a coreLibraryDesugaring dependency"
    );
}

#[test]
fn desugaring_library_without_flag_fails() {
    let toml = format!(
        "{MINIMAL}\n[[dependencies]]\ncoordinate = \"com.android.tools:desugar_jdk_libs:2.1.4\"\nscope = \"coreLibraryDesugaring\"\n"
    );
    let failure = Pipeline::new(inputs(&toml)).run().unwrap_err();
    assert_eq!(failure.stage, FailureStage::ValidationFailed);
    assert!(failure.errors[0]
        .to_string()
        .contains("core library desugaring is disabled"));
}

#[test]
fn dependencies_always_point_backwards() {
    let plan = Pipeline::new(flutter_inputs()).run().unwrap();
    for task in plan.tasks() {
        assert!(
            task.depends_on.iter().all(|&d| d < task.id),
            "{} depends on a later task",
            task.name
        );
    }
}

#[test]
fn requires_orders_resolve_tasks() {
    let toml = r#"
[module]
namespace = "com.example.anga"

[sdk]
compile = 35
target = 35
min = 23

[compat]
source = "1.8"
target = "1.8"
jvm-target = "1.8"

[[dependencies]]
coordinate = "com.google.dagger:hilt-android:2.44"
requires = ["androidx.core:core-ktx"]

[[dependencies]]
coordinate = "androidx.core:core-ktx:1.13.1"

[[dependencies]]
coordinate = "junit:junit:4.13.2"
scope = "testImplementation"
"#;
    let plan = Pipeline::new(inputs(toml)).run().unwrap();
    let core = plan.position("resolve:androidx.core:core-ktx").unwrap();
    let hilt = plan.position("resolve:com.google.dagger:hilt-android").unwrap();
    assert!(core < hilt);
    assert!(plan.tasks()[hilt].depends_on.contains(&core));
    assert!(plan.task("compileTests").is_some());
}

#[test]
fn validation_collects_every_problem() {
    let toml = r#"
[module]
namespace = "anga"

[sdk]
compile = 33
target = 34
min = 23

[compat]
source = "17"
target = "11"
jvm-target = "17"

[[plugins]]
id = "kotlin-android"
after = ["com.android.application"]
"#;
    let failure = Pipeline::new(inputs(toml)).run().unwrap_err();
    assert_eq!(failure.stage, FailureStage::ValidationFailed);
    let fields: Vec<&str> = failure
        .errors
        .iter()
        .filter_map(|e| match e {
            DroidplanError::InvalidConfiguration { field, .. } => Some(field.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(
        fields,
        vec!["module.namespace", "sdk.target", "compat", "plugins[0].after"]
    );
}

#[test]
fn unresolved_property_is_a_field_error() {
    let toml = r#"
[module]
namespace = "com.example.anga"

[sdk]
compile = "${flutter.compileSdkVersion}"
target = 34
min = 23

[compat]
source = 17
target = 17
jvm-target = 17
"#;
    let failure = Pipeline::new(inputs(toml)).run().unwrap_err();
    assert!(matches!(
        &failure.errors[0],
        DroidplanError::InvalidConfiguration { field, message }
            if field == "sdk.compile" && message.contains("flutter.compileSdkVersion")
    ));
}

#[test]
fn scope_violation_fails_validation() {
    let toml = r#"
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

[[dependencies]]
coordinate = "com.google.dagger:hilt-android-compiler:2.44"
scope = "kapt"

[[dependencies]]
coordinate = "com.google.dagger:hilt-android:2.44"
requires = ["com.google.dagger:hilt-android-compiler"]
"#;
    let failure = Pipeline::new(inputs(toml)).run().unwrap_err();
    assert_eq!(failure.stage, FailureStage::ValidationFailed);
    assert!(failure.errors[0].to_string().contains("dependencies[1].requires"));
}

#[test]
fn plugin_cycle_is_detected() {
    let toml = r#"
[module]
namespace = "com.example.anga"

[[plugins]]
id = "a"
after = ["b"]

[[plugins]]
id = "b"
after = ["a"]
"#;
    let failure = Pipeline::new(inputs(toml)).run().unwrap_err();
    assert_eq!(failure.stage, FailureStage::CycleDetected);
    assert_eq!(failure.errors[0].to_string(), "Cyclic dependency: a -> b -> a");
}

#[test]
fn stages_advance_in_order_and_failure_is_terminal() {
    let mut pipeline = Pipeline::new(inputs(MINIMAL));
    assert_eq!(pipeline.stage(), Stage::Unparsed);
    assert_eq!(pipeline.advance(), Stage::Parsed);
    assert_eq!(pipeline.advance(), Stage::VersionResolved);
    assert!(pipeline.resolution().is_some());
    assert_eq!(pipeline.advance(), Stage::GraphBuilt);
    assert!(pipeline.graphs().is_some());
    assert_eq!(pipeline.advance(), Stage::Validated);
    assert_eq!(pipeline.advance(), Stage::Emitted);
    assert_eq!(pipeline.advance(), Stage::Emitted);
    assert!(pipeline.plan().is_some());

    let mut failed = Pipeline::new(inputs("[[dependencies]]\ncoordinate = \"a:b:c:d\"\n"));
    let stage = failed.advance_to(Stage::Emitted);
    assert_eq!(stage, Stage::Failed(FailureStage::ParseFailed));
    assert_eq!(failed.advance(), stage);
    assert!(failed.failure().is_some());
}
