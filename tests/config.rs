use oxide_icon::{EngineConfig, Error, IconEngine, IconSize, Platform, load_config};

#[test]
fn parse_full_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("icon-engine.json");
    std::fs::write(
        &path,
        r#"{
            "icon_size": "small",
            "init_attempts": 5,
            "platform": "macos"
        }"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(
        config,
        EngineConfig {
            icon_size: IconSize::Small,
            init_attempts: 5,
            platform: Some(Platform::MacOs),
        }
    );

    let engine = IconEngine::new(&config).unwrap();
    assert_eq!(engine.platform(), Platform::MacOs);
}

#[test]
fn malformed_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("icon-engine.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(err.to_string(), "invalid configuration");
}

#[test]
fn unknown_icon_size_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("icon-engine.json");
    std::fs::write(&path, r#"{ "icon_size": "gigantic" }"#).unwrap();

    assert!(load_config(&path).is_err());
}

#[test]
fn config_serializes_back() {
    let config = EngineConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(
        json,
        r#"{"icon_size":"jumbo","init_attempts":3,"platform":null}"#
    );
}
