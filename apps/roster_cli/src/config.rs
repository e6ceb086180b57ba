use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context};
use client_core::{ControllerConfig, DEFAULT_MIN_FILTER_CHARS};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "roster.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub rows: usize,
    pub min_filter_chars: usize,
    pub request_timeout_secs: u64,
    pub session_cookie: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8888".into(),
            rows: 30,
            min_filter_chars: DEFAULT_MIN_FILTER_CHARS,
            request_timeout_secs: 10,
            session_cookie: None,
        }
    }
}

impl Settings {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            min_filter_chars: self.min_filter_chars,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.min_filter_chars >= DEFAULT_MIN_FILTER_CHARS,
            "min_filter_chars must be at least {DEFAULT_MIN_FILTER_CHARS}, got {}",
            self.min_filter_chars
        );
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    server_url: Option<String>,
    rows: Option<usize>,
    min_filter_chars: Option<usize>,
    request_timeout_secs: Option<u64>,
    session_cookie: Option<String>,
}

/// Defaults, then `roster.toml` (when present), then environment.
pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if config_path.exists() {
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read '{}'", config_path.display()))?;
        apply_file_config(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", config_path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings.validate()?;
    Ok(settings)
}

fn apply_file_config(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileConfig = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.rows {
        settings.rows = v;
    }
    if let Some(v) = file_cfg.min_filter_chars {
        settings.min_filter_chars = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = file_cfg.session_cookie {
        settings.session_cookie = Some(v);
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    let first = |keys: [&str; 2]| keys.into_iter().find_map(|key| var(key));

    if let Some(v) = first(["APP__SERVER_URL", "ROSTER_SERVER_URL"]) {
        settings.server_url = v;
    }
    if let Some(v) = first(["APP__ROWS", "ROSTER_ROWS"]).and_then(|v| v.parse().ok()) {
        settings.rows = v;
    }
    if let Some(v) = first(["APP__MIN_FILTER_CHARS", "ROSTER_MIN_FILTER_CHARS"])
        .and_then(|v| v.parse().ok())
    {
        settings.min_filter_chars = v;
    }
    if let Some(v) = first(["APP__REQUEST_TIMEOUT_SECS", "ROSTER_REQUEST_TIMEOUT_SECS"])
        .and_then(|v| v.parse().ok())
    {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = first(["APP__SESSION_COOKIE", "ROSTER_SESSION_COOKIE"]) {
        settings.session_cookie = Some(v);
    }
}
