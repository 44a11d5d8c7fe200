//! Settings loading tests
//!
//! Only explicit paths are used here so the search path and process
//! environment of the test runner do not matter.

use flowlog_stacks::config::{Settings, SettingsFormat, SettingsLayer, CONFIG_ENV};
use flowlog_stacks::error::Error;
use pretty_assertions::assert_eq;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_from_toml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("flowlogs.toml");
    fs::write(
        &path,
        r#"vpc_id = "vpc-0abc123"
region = "eu-west-1"
provider_version = "~> 5.40"

[tags]
project = "flowlogs"
"#,
    )
    .unwrap();

    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(
        settings,
        Settings {
            vpc_id: "vpc-0abc123".to_string(),
            region: "eu-west-1".to_string(),
            tags: BTreeMap::from([("project".to_string(), "flowlogs".to_string())]),
            provider_version: "~> 5.40".to_string(),
        }
    );
    settings.validate().unwrap();
}

#[test]
fn test_from_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"vpc_id": "vpc-json", "tags": {"a": "b"}}"#).unwrap();

    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.vpc_id, "vpc-json");
    assert_eq!(settings.region, "us-east-1");
}

#[test]
fn test_malformed_file_names_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "vpc_id: [unterminated").unwrap();

    let err = Settings::from_file(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigLoad { .. }));
    assert!(err.to_string().contains("broken.yaml"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_unknown_keys_ignored_types_enforced() {
    let settings = Settings::parse("vpc_id = \"vpc-1\"\nextra = 1\n", SettingsFormat::Toml).unwrap();
    assert_eq!(settings.vpc_id, "vpc-1");

    assert!(Settings::parse("tags = \"not-a-map\"\n", SettingsFormat::Toml).is_err());
}

#[test]
fn test_empty_file_fails_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.toml");
    fs::write(&path, "").unwrap();

    let settings = Settings::from_file(&path).unwrap();
    assert!(matches!(settings.validate(), Err(Error::MissingSetting(_))));
}

#[test]
fn test_config_env_names_the_only_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ci.yaml");
    fs::write(&path, "vpc_id: vpc-ci\ntags:\n  team: net\n").unwrap();
    let env = HashMap::from([(CONFIG_ENV, path.display().to_string())]);

    let settings = Settings::load_with(None, |k| env.get(k).cloned()).unwrap();
    assert_eq!(settings.vpc_id, "vpc-ci");
    assert_eq!(settings.region, "us-east-1");
}

#[test]
fn test_explicit_path_beats_config_env() {
    let dir = tempdir().unwrap();
    let explicit = dir.path().join("explicit.toml");
    fs::write(&explicit, "vpc_id = \"vpc-explicit\"\n").unwrap();
    let env = HashMap::from([
        (CONFIG_ENV, dir.path().join("missing.toml").display().to_string()),
        ("FLOWLOGS_REGION", "ap-south-1".to_string()),
    ]);

    let settings = Settings::load_with(Some(&explicit), |k| env.get(k).cloned()).unwrap();
    assert_eq!(settings.vpc_id, "vpc-explicit");
    assert_eq!(settings.region, "ap-south-1");
}

#[test]
fn test_missing_config_env_file() {
    let env = HashMap::from([(CONFIG_ENV, "/nonexistent/flowlogs.json".to_string())]);
    let err = Settings::load_with(None, |k| env.get(k).cloned()).unwrap_err();
    assert!(matches!(err, Error::ConfigLoad { .. }));
}

#[test]
fn test_higher_file_restating_default_region_wins() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("flowlogs.yaml");
    let user = dir.path().join("settings.toml");
    fs::write(&project, "region: us-east-1\n").unwrap();
    fs::write(&user, "vpc_id = \"vpc-user\"\nregion = \"eu-west-1\"\n").unwrap();

    let settings = SettingsLayer::from_file(&project)
        .unwrap()
        .or(SettingsLayer::from_file(&user).unwrap())
        .resolve();
    assert_eq!(settings.region, "us-east-1");
    assert_eq!(settings.vpc_id, "vpc-user");
}
