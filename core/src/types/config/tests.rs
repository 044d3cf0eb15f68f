use super::*;
use crate::types::geometry::Size;
use tempfile::TempDir;

#[test]
fn missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();

    let options = WebViewOptions::load(&WebViewOptions::path(temp.path())).unwrap();

    assert_eq!(options, WebViewOptions::default());
    assert!(!options.debug);
    assert_eq!(options.unknown_method, UnknownMethodPolicy::Ignore);
    assert!(options.runtime.auto_install);
    assert_eq!(options.window.size(), Size::new(640, 480));
}

#[test]
fn partial_file_fills_remaining_defaults() {
    let temp = TempDir::new().unwrap();
    let path = WebViewOptions::path(temp.path());
    std::fs::write(
        &path,
        r#"
debug = true
unknown_method = "reject"

[window]
title = "Demo"
width = 1024
center = true

[window.min_size]
width = 400
height = 300
"#,
    )
    .unwrap();

    let options = WebViewOptions::load(&path).unwrap();

    assert!(options.debug);
    assert_eq!(options.unknown_method, UnknownMethodPolicy::Reject);
    assert_eq!(options.window.title, "Demo");
    assert_eq!(options.window.size(), Size::new(1024, 480));
    assert!(options.window.center);
    assert_eq!(options.window.min_size, Some(Size::new(400, 300)));
    assert_eq!(options.window.max_size, None);
    assert_eq!(options.runtime, RuntimeOptions::default());
}

#[test]
fn save_then_load_preserves_options() {
    let temp = TempDir::new().unwrap();
    let path = WebViewOptions::path(temp.path());
    let options = WebViewOptions {
        autofocus: true,
        data_path: Some(temp.path().join("profile")),
        window: WindowOptions {
            title: "Saved".to_string(),
            icon_id: 101,
            max_size: Some(Size::new(1280, 720)),
            ..Default::default()
        },
        ..Default::default()
    };

    options.save(&path).unwrap();
    let loaded = WebViewOptions::load(&path).unwrap();

    assert_eq!(loaded, options);
}

#[test]
fn invalid_toml_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = WebViewOptions::path(temp.path());
    std::fs::write(&path, "debug = [not valid").unwrap();

    let err = WebViewOptions::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn validate_reports_problems() {
    let options = WebViewOptions {
        window: WindowOptions {
            width: -5,
            min_size: Some(Size::new(800, 600)),
            max_size: Some(Size::new(640, 480)),
            ..Default::default()
        },
        ..Default::default()
    };

    let errors = options.validate();

    assert_eq!(errors.len(), 2);
    assert!(WebViewOptions::default().validate().is_empty());
}

#[test]
fn defaults_replace_invalid_values() {
    let options = WebViewOptions {
        debug: true,
        window: WindowOptions {
            title: "Kept".to_string(),
            width: -5,
            height: 300,
            min_size: Some(Size::new(800, 600)),
            max_size: Some(Size::new(640, 480)),
            ..Default::default()
        },
        ..Default::default()
    };

    let repaired = options.with_defaults_for_invalid();

    assert!(repaired.validate().is_empty());
    assert!(repaired.debug);
    assert_eq!(repaired.window.title, "Kept");
    assert_eq!(repaired.window.size(), Size::new(640, 300));
    assert_eq!(repaired.window.min_size, None);
    assert_eq!(repaired.window.max_size, None);
}

#[test]
fn environment_overrides_data_path() {
    let options = WebViewOptions {
        data_path: Some(PathBuf::from("configured")),
        ..Default::default()
    };

    assert_eq!(
        options.data_path_with_override(Some(OsString::from("from-env"))),
        Some(PathBuf::from("from-env"))
    );
    assert_eq!(
        options.data_path_with_override(Some(OsString::new())),
        Some(PathBuf::from("configured"))
    );
    assert_eq!(
        options.data_path_with_override(None),
        Some(PathBuf::from("configured"))
    );
    assert_eq!(WebViewOptions::default().data_path_with_override(None), None);
}
