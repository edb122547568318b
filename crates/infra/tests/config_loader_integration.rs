//! Integration tests for configuration loader
//!
//! Loads settings from files and turns them into a connected client.

use std::io::Write;

use samplify_domain::{ClientOptions, Environment, SessionPhase};
use samplify_infra::{config, connect_with_settings};
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[tokio::test]
async fn test_client_from_toml_file() {
    let path = write_config(
        r#"
environment = "prod"
timeout_secs = 12
client_id = "integration-client"
username = "bob"
password = "pa55"
"#,
        "toml",
    );

    let settings = config::load_from_file(Some(path.clone())).expect("settings");
    assert_eq!(settings.environment, Some(Environment::Prod));

    let client = connect_with_settings(&settings).expect("client");
    assert_eq!(client.options().api_base_url, ClientOptions::prod().api_base_url);
    assert_eq!(client.options().timeout, std::time::Duration::from_secs(12));
    assert_eq!(client.session_phase().await, SessionPhase::Unauthenticated);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_json_file_with_url_overrides() {
    let path = write_config(
        r#"{
            "api_base_url": "https://sandbox.example.com/sample/v1/",
            "auth_url": "https://sandbox.example.com/auth/v1",
            "client_id": "integration-client",
            "username": "bob",
            "password": "pa55"
        }"#,
        "json",
    );

    let options = config::load_from_file(Some(path.clone())).expect("settings").options();
    assert_eq!(options.api_base_url, "https://sandbox.example.com/sample/v1");
    assert_eq!(options.auth_url, "https://sandbox.example.com/auth/v1");
    assert_eq!(options.status_url, ClientOptions::uat().status_url);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_unknown_environment_in_file_is_config_error() {
    let path = write_config(
        r#"
environment = "staging"
client_id = "c"
username = "u"
password = "p"
"#,
        "toml",
    );

    let err = config::load_from_file(Some(path.clone())).unwrap_err();
    assert!(matches!(err, samplify_domain::SamplifyError::Config(_)));

    std::fs::remove_file(path).ok();
}
