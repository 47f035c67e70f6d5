//! Configuration system tests
//!
//! Tests configuration loading, validation, and environment overrides
//! through the public API.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use enroll_portal::config::PortalConfig;
use enroll_portal::error::Error;

/// Test fixture for configuration testing
struct ConfigFixture {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("enroll.toml");
        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }
}

// ─────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_load_minimal_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[generator]\nmodel = \"gemini-2.0-pro\"\n");

    let config = PortalConfig::load(Some(fixture.path())).unwrap();
    assert_eq!(config.generator.model, "gemini-2.0-pro");
    // Everything else keeps defaults
    assert!(config.generator.base_url.starts_with("https://"));
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_full_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[generator]
base_url = "https://example.test/v1beta"
model = "gemini-test"
timeout_secs = 5

[picture]
max_bytes = 1024

[logging]
level = "debug"
json_format = true
"#,
    );

    let config = PortalConfig::load(Some(fixture.path())).unwrap();
    assert_eq!(config.generator.base_url, "https://example.test/v1beta");
    assert_eq!(config.generator.timeout_secs, 5);
    assert_eq!(config.picture.max_bytes, 1024);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json_format);
}

#[test]
fn test_load_rejects_invalid_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config("this is not toml [[[");

    let err = PortalConfig::load(Some(fixture.path())).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }));
}

#[test]
fn test_load_rejects_invalid_values() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[picture]\nmax_bytes = 0\n");

    let err = PortalConfig::load(Some(fixture.path())).unwrap_err();
    assert!(matches!(err, Error::ConfigValidation { .. }));
}

#[test]
fn test_load_missing_explicit_file_errors() {
    let err = PortalConfig::load(Some("/definitely/not/here.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound { .. }));
    assert_eq!(err.exit_code(), 10);
}

// ─────────────────────────────────────────────────────────────────
// Environment Overrides
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_env_overrides_beat_file_values() {
    let fixture = ConfigFixture::new();
    fixture.write_config("[generator]\nmodel = \"from-file\"\n");

    std::env::set_var("ENROLL_GENERATOR_MODEL", "from-env");
    let config = PortalConfig::load(Some(fixture.path()));
    std::env::remove_var("ENROLL_GENERATOR_MODEL");

    assert_eq!(config.unwrap().generator.model, "from-env");
}
