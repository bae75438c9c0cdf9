use droidplan_core::coordinate::Coordinate;
use droidplan_core::platform::PlatformCatalog;

const FIREBASE: &str = r#"
["com.google.firebase:firebase-bom:33.15.0"]
"com.google.firebase:firebase-auth" = "23.2.1"
"com.google.firebase:firebase-auth-ktx" = "23.2.1"
"#;

#[test]
fn parse_catalog() {
    let catalog = PlatformCatalog::parse_toml(FIREBASE).unwrap();
    let bom = Coordinate::parse("com.google.firebase:firebase-bom:33.15.0").unwrap();
    assert_eq!(catalog.len(), 1);
    assert!(catalog.contains(&bom));
    assert_eq!(
        catalog.managed_version(&bom, "com.google.firebase:firebase-auth"),
        Some("23.2.1")
    );
    assert_eq!(catalog.managed_version(&bom, "com.google.firebase:missing"), None);
}

#[test]
fn unknown_bom_version_is_not_matched() {
    let catalog = PlatformCatalog::parse_toml(FIREBASE).unwrap();
    let other = Coordinate::parse("com.google.firebase:firebase-bom:32.0.0").unwrap();
    assert!(!catalog.contains(&other));
}

#[test]
fn bom_key_must_be_a_coordinate() {
    let err = PlatformCatalog::parse_toml("[\"not-a-coordinate\"]\n\"g:a\" = \"1.0\"\n").unwrap_err();
    assert!(err.to_string().contains("Malformed coordinate"), "got: {err}");
}

#[test]
fn merge_keeps_existing_entries() {
    let bom = Coordinate::parse("g:bom:1").unwrap();
    let mut first = PlatformCatalog::new();
    first.insert(&bom, "g:a", "1.0");
    let mut second = PlatformCatalog::new();
    second.insert(&bom, "g:a", "9.9");
    second.insert(&bom, "g:b", "2.0");

    first.merge(second);
    assert_eq!(first.managed_version(&bom, "g:a"), Some("1.0"));
    assert_eq!(first.managed_version(&bom, "g:b"), Some("2.0"));
}

#[test]
fn from_path_reads_catalog() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("firebase.toml");
    std::fs::write(&path, FIREBASE).unwrap();
    let catalog = PlatformCatalog::from_path(&path).unwrap();
    assert!(!catalog.is_empty());
}
