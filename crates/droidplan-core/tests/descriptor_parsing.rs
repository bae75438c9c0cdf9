use droidplan_core::compat::JavaLevel;
use droidplan_core::coordinate::VersionSpec;
use droidplan_core::dependency::Scope;
use droidplan_core::descriptor::BuildDescriptor;
use droidplan_core::sdk::SdkValue;
use droidplan_util::errors::DroidplanError;

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
id = "com.android.application"

[[plugins]]
id = "kotlin-android"

[[plugins]]
id = "kotlin-kapt"
after = ["kotlin-android"]

[[plugins]]
id = "dev.flutter.flutter-gradle-plugin"
after = ["com.android.application", "kotlin-android"]

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

#[test]
fn parse_flutter_descriptor() {
    let raw = BuildDescriptor::parse_toml(FLUTTER_APP).unwrap();
    assert_eq!(raw.module.namespace, "com.example.anga");
    assert_eq!(raw.module.ndk_version.as_deref(), Some("27.0.12077973"));
    assert_eq!(
        raw.module.version_code,
        Some(SdkValue::Text("${flutter.versionCode}".to_string()))
    );
    assert_eq!(raw.module.version_name.as_deref(), Some("${flutter.versionName}"));
    assert_eq!(raw.sdk.min, Some(SdkValue::Level(23)));
    assert!(raw.compat.core_library_desugaring);

    let parsed = raw.parse().unwrap();
    assert_eq!(parsed.plugins.len(), 4);
    assert_eq!(parsed.constraints.len(), 3);
    assert_eq!(parsed.platforms.len(), 1);
    assert_eq!(parsed.platforms[0].index, 1);
    assert_eq!(parsed.dependencies.len(), 3);

    let auth = &parsed.dependencies[1];
    assert_eq!(auth.request.version, VersionSpec::Inherited);
    assert_eq!(auth.scope, Scope::Compile);
    assert_eq!(auth.configuration, "implementation");

    assert_eq!(parsed.dependencies[0].scope, Scope::Desugaring);
    assert_eq!(parsed.dependencies[2].scope, Scope::AnnotationProcessor);
    assert_eq!(
        parsed.compat.source.as_ref().and_then(|s| s.to_level()),
        Some(JavaLevel(17))
    );
}

#[test]
fn constraints_follow_after_lists() {
    let parsed = BuildDescriptor::parse_toml(FLUTTER_APP)
        .unwrap()
        .parse()
        .unwrap();
    assert!(parsed
        .constraints
        .iter()
        .any(|c| c.before == "com.android.application"
            && c.after == "dev.flutter.flutter-gradle-plugin"));
}

#[test]
fn inherited_version_without_platform_fails() {
    let toml = r#"
[module]
namespace = "com.example"

[[dependencies]]
coordinate = "com.google.firebase:firebase-auth"
"#;
    let errors = BuildDescriptor::parse_toml(toml).unwrap().parse().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], DroidplanError::MalformedCoordinate { .. }));
}

#[test]
fn all_parse_errors_are_collected() {
    let toml = r#"
[[plugins]]
id = "bad plugin"

[[dependencies]]
coordinate = "a:b:c:d"

[[dependencies]]
coordinate = "g:a:1.0"
scope = "shadow"

[[dependencies]]
coordinate = "g:b:1.0"
requires = [":::"]
"#;
    let errors = BuildDescriptor::parse_toml(toml).unwrap().parse().unwrap_err();
    assert_eq!(errors.len(), 4, "{errors:?}");
    assert!(errors
        .iter()
        .any(|e| matches!(e, DroidplanError::InvalidConfiguration { field, .. } if field == "dependencies[1].scope")));
}

#[test]
fn requires_accepts_keys_and_full_coordinates() {
    let toml = r#"
[[dependencies]]
coordinate = "g:a:1.0"
requires = ["g:b", "g:c:2.0"]
"#;
    let parsed = BuildDescriptor::parse_toml(toml).unwrap().parse().unwrap();
    assert_eq!(parsed.dependencies[0].requires, vec!["g:b", "g:c"]);
}

#[test]
fn empty_descriptor_parses_with_defaults() {
    let raw = BuildDescriptor::parse_toml("").unwrap();
    assert!(raw.module.namespace.is_empty());
    let parsed = raw.parse().unwrap();
    assert!(parsed.plugins.is_empty());
    assert!(parsed.dependencies.is_empty());
}

#[test]
fn invalid_toml_is_manifest_error() {
    let err = BuildDescriptor::parse_toml("[module\nnamespace=").unwrap_err();
    assert!(err.to_string().contains("Manifest error"), "got: {err}");
}

#[test]
fn from_path_reads_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("Droidplan.toml");
    std::fs::write(&path, FLUTTER_APP).unwrap();
    let raw = BuildDescriptor::from_path(&path).unwrap();
    assert_eq!(raw.plugins.len(), 4);
}

#[test]
fn from_path_missing_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let err = BuildDescriptor::from_path(&tmp.path().join("Droidplan.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read"), "got: {err}");
}
