//! Config loading: error messages, defaults and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use orgmirror_core::{config, ConfigError};

const FULL: &str = r#"
source:
  organization: acme
  token: ghp_source
  api_url: https://github.example.com/api/v3/
mirror:
  organization: acme-mirror
  token: mirror_token
  api_url: https://git.example.org/api/v1
  git_url: https://git.example.org/
transfer:
  work_directory: ~/mirrors
  request_delay_ms: 250
  max_retries: 3
  retry_base_delay_secs: 2
"#;

const MINIMAL: &str = r#"
source:
  organization: acme
  token: ghp_source
mirror:
  organization: acme
  token: mirror_token
transfer:
  work_directory: /srv/mirrors
"#;

fn write_config(dir: &assert_fs::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("config.yaml");
    fs::write(&path, body).expect("write config");
    path
}

fn home() -> &'static Path {
    Path::new("/home/alice")
}

// ---------------------------------------------------------------------------
// 1. Load error messages
// ---------------------------------------------------------------------------

#[test]
fn missing_file_returns_not_found_with_hint() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = dir.path().join("absent.yaml");
    let err = config::load_at(&path, home()).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains("absent.yaml"));
    assert!(msg.contains("config.example.yaml"));
}

#[test]
fn malformed_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = write_config(&dir, ": : corrupt : yaml : !!!\n  - broken: [unclosed");
    let err = config::load_at(&path, home()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let body = MINIMAL.replace("transfer:", "extra: true\ntransfer:");
    let path = write_config(&dir, &body);
    let err = config::load_at(&path, home()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

#[test]
fn missing_section_is_a_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = write_config(&dir, "source:\n  organization: acme\n  token: t\n");
    let err = config::load_at(&path, home()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Defaults and normalisation
// ---------------------------------------------------------------------------

#[test]
fn minimal_config_uses_defaults() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = write_config(&dir, MINIMAL);
    let cfg = config::load_at(&path, home()).expect("load");

    assert_eq!(cfg.source.api_url, config::DEFAULT_SOURCE_API_URL);
    assert_eq!(cfg.mirror.api_url, config::DEFAULT_MIRROR_API_URL);
    assert_eq!(cfg.mirror.git_url, config::DEFAULT_MIRROR_GIT_URL);
    assert_eq!(cfg.transfer.request_delay(), Duration::from_secs(1));
    let policy = cfg.transfer.retry_policy();
    assert_eq!(policy.max_attempts, 5);
    assert_eq!(policy.base_delay, Duration::from_secs(5));
    assert_eq!(cfg.transfer.work_directory, PathBuf::from("/srv/mirrors"));
}

#[test]
fn full_config_expands_home_and_trims_slashes() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = write_config(&dir, FULL);
    let cfg = config::load_at(&path, home()).expect("load");

    assert_eq!(cfg.transfer.work_directory, PathBuf::from("/home/alice/mirrors"));
    assert_eq!(cfg.source.api_url, "https://github.example.com/api/v3");
    assert_eq!(cfg.mirror.git_url, "https://git.example.org");
    assert_eq!(cfg.source.token.expose(), "ghp_source");
    assert_eq!(cfg.mirror.organization, "acme-mirror");
}

#[test]
fn debug_output_never_contains_tokens() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = write_config(&dir, FULL);
    let cfg = config::load_at(&path, home()).expect("load");
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("ghp_source"));
    assert!(!rendered.contains("mirror_token"));
}

// ---------------------------------------------------------------------------
// 3. Validation
// ---------------------------------------------------------------------------

#[rstest::rstest]
#[case("token: ghp_source", "token: \"\"", "source.token")]
#[case("token: mirror_token", "token: \"  \"", "mirror.token")]
#[case("organization: acme\n  token: ghp", "organization: \"\"\n  token: ghp", "source.organization")]
#[case("work_directory: /srv/mirrors", "work_directory: /srv/mirrors\n  max_retries: 0", "max_retries")]
fn invalid_values_are_rejected(#[case] from: &str, #[case] to: &str, #[case] field: &str) {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let body = MINIMAL.replacen(from, to, 1);
    assert_ne!(body, MINIMAL, "fixture replacement must apply");
    let path = write_config(&dir, &body);
    let err = config::load_at(&path, home()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "got: {err}");
    assert!(err.to_string().contains(field), "got: {err}");
}

#[test]
fn non_http_api_url_is_rejected() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let body = MINIMAL.replace(
        "organization: acme\n  token: mirror_token",
        "organization: acme\n  token: mirror_token\n  git_url: ssh://git.example.org",
    );
    let path = write_config(&dir, &body);
    let err = config::load_at(&path, home()).unwrap_err();
    assert!(err.to_string().contains("mirror.git_url"), "got: {err}");
}
