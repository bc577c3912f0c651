use std::{collections::HashMap, fs, path::Path, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9090";
pub const SETTINGS_FILE: &str = "pixeltype.toml";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("base url must not be empty")]
    EmptyBaseUrl,
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub base_url: String,
    pub request_timeout: Duration,
    /// Nominal spacing between advisory progress checkpoints.
    pub checkpoint_delay: Duration,
    /// Pause between the final checkpoint and showing results.
    pub display_delay: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout: Duration::from_secs(120),
            checkpoint_delay: Duration::from_millis(500),
            display_delay: Duration::from_millis(500),
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    /// Resolves a service-relative artifact path against the base url.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_overrides(&mut settings, |key| file_cfg.get(key).map(scalar)),
            Err(err) => tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}"),
        }
    }

    apply_overrides(&mut settings, |key| {
        let upper = key.to_ascii_uppercase();
        std::env::var(format!("APP__{upper}")).ok()
    });
    if let Ok(v) = std::env::var("PIXELTYPE_BASE_URL") {
        apply_base_url(&mut settings, &v);
    }

    settings
}

// Numbers may be written bare or quoted; both reach the same parser as env values.
fn scalar(value: &toml::Value) -> String {
    match value {
        toml::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn apply_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("base_url") {
        apply_base_url(settings, &v);
    }
    if let Some(secs) = lookup("request_timeout_secs").and_then(|v| v.parse::<u64>().ok()) {
        settings.request_timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = lookup("checkpoint_delay_ms").and_then(|v| v.parse::<u64>().ok()) {
        settings.checkpoint_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = lookup("display_delay_ms").and_then(|v| v.parse::<u64>().ok()) {
        settings.display_delay = Duration::from_millis(ms);
    }
}

fn apply_base_url(settings: &mut ClientSettings, raw: &str) {
    match normalize_base_url(raw) {
        Ok(url) => settings.base_url = url,
        Err(err) => tracing::warn!("keeping base url {}: {err}", settings.base_url),
    }
}

pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }

    let parsed = Url::parse(trimmed).map_err(|err| ConfigError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
