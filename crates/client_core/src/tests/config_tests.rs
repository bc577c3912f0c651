use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn strips_trailing_slash_from_base_url() {
    assert_eq!(
        normalize_base_url(" http://localhost:9090/ ").expect("valid"),
        "http://localhost:9090"
    );
}

#[test]
fn rejects_empty_and_non_http_base_urls() {
    assert_eq!(normalize_base_url("   "), Err(ConfigError::EmptyBaseUrl));
    assert!(matches!(
        normalize_base_url("ftp://example.com"),
        Err(ConfigError::InvalidBaseUrl { .. })
    ));
    assert!(matches!(
        normalize_base_url("not a url"),
        Err(ConfigError::InvalidBaseUrl { .. })
    ));
}

#[test]
fn resolves_relative_artifact_paths_against_base_url() {
    let settings = ClientSettings::default()
        .with_base_url("http://analysis.local:9090/")
        .expect("valid");

    assert_eq!(
        settings.resolve("/api/image/abc_overlay.jpg"),
        "http://analysis.local:9090/api/image/abc_overlay.jpg"
    );
    assert_eq!(
        settings.resolve("api/image/abc_overlay.jpg"),
        "http://analysis.local:9090/api/image/abc_overlay.jpg"
    );
    assert_eq!(
        settings.resolve("https://cdn.local/x.jpg"),
        "https://cdn.local/x.jpg"
    );
}

#[test]
fn reads_settings_file_values() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("pixeltype_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join(SETTINGS_FILE);
    fs::write(
        &path,
        "base_url = \"http://10.0.0.5:9090/\"\nrequest_timeout_secs = \"30\"\ncheckpoint_delay_ms = \"50\"\n",
    )
    .expect("write settings");

    let settings = load_settings_from(&path);
    if env::var("APP__BASE_URL").is_err() && env::var("PIXELTYPE_BASE_URL").is_err() {
        assert_eq!(settings.base_url, "http://10.0.0.5:9090");
    }
    if env::var("APP__REQUEST_TIMEOUT_SECS").is_err() {
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }
    if env::var("APP__CHECKPOINT_DELAY_MS").is_err() {
        assert_eq!(settings.checkpoint_delay, Duration::from_millis(50));
    }

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn reads_bare_integer_settings_alongside_base_url() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("pixeltype_config_int_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join(SETTINGS_FILE);
    fs::write(
        &path,
        "base_url = \"http://10.0.0.5:9090\"\nrequest_timeout_secs = 30\ndisplay_delay_ms = 75\n",
    )
    .expect("write settings");

    let settings = load_settings_from(&path);
    if env::var("APP__BASE_URL").is_err() && env::var("PIXELTYPE_BASE_URL").is_err() {
        assert_eq!(settings.base_url, "http://10.0.0.5:9090");
    }
    if env::var("APP__REQUEST_TIMEOUT_SECS").is_err() {
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }
    if env::var("APP__DISPLAY_DELAY_MS").is_err() {
        assert_eq!(settings.display_delay, Duration::from_millis(75));
    }

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_settings_file_falls_back_to_defaults() {
    let settings = load_settings_from(Path::new("/definitely/not/here/pixeltype.toml"));
    if env::var("APP__DISPLAY_DELAY_MS").is_err() {
        assert_eq!(settings.display_delay, Duration::from_millis(500));
    }
}
