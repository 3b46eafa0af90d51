use std::fs;

use tempfile::TempDir;
use wisp_manifest::{Error, MANIFEST_FILE, Manifest, PackageType};

#[test]
fn reads_manifest_from_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(MANIFEST_FILE),
        r#"{ "name": "demo", "version": "1.0.0", "type": "module", "main": "./dist/index.js" }"#,
    )
    .unwrap();

    let manifest = Manifest::read(dir.path()).unwrap();
    assert_eq!(manifest.name, "demo");
    assert_eq!(manifest.version, "1.0.0");
    assert_eq!(manifest.package_type, PackageType::Module);
    assert_eq!(manifest.main.as_deref(), Some("./dist/index.js"));
}

#[test]
fn missing_manifest_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = Manifest::read(dir.path()).unwrap_err();
    assert!(matches!(err, Error::ManifestNotFound(ref path) if path == dir.path()));
}

#[test]
fn malformed_manifest_is_reported_with_path() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();

    let err = Manifest::read(dir.path()).unwrap_err();
    match err {
        Error::ManifestParse { path, .. } => assert_eq!(path, dir.path().join(MANIFEST_FILE)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_package_type_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(MANIFEST_FILE), r#"{ "type": "umd" }"#).unwrap();
    assert!(matches!(
        Manifest::read(dir.path()),
        Err(Error::ManifestParse { .. })
    ));
}
