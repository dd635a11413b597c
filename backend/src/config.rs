//! # Server Settings
//!
//! Settings are read once at start-up from an optional JSON file (named by
//! `FORM_CONFIG`, `form.json` by default) and then overridden by environment
//! variables. Every field has a default, so a missing file is not an error.

use crate::error::Result;
use log::{info, warn};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Shared key legacy archives were obscured with.
pub const LEGACY_SECRET_KEY: &str = "TgQQk42O";

/// Publisher tag of the templates shipped with the module.
pub const SYSTEM_PUBLISHER: &str = "sscms";

/// Plugin metadata the archive codec and the template manager need.
pub trait PluginEnvironment {
    /// Version string written into the archive marker file.
    fn version(&self) -> String;

    fn web_root_path(&self) -> PathBuf;

    /// Directory holding one sub-directory per template bundle.
    fn templates_directory(&self) -> PathBuf {
        self.web_root_path()
            .join("assets")
            .join("form")
            .join("templates")
    }

    /// Directory holding the notification mail templates.
    fn mail_directory(&self) -> PathBuf {
        self.web_root_path().join("assets").join("form").join("mail")
    }
}

/// Server settings. `secret_key` keys the archive cipher; its default is the
/// legacy shared key, so deployments should set `FORM_SECRET_KEY`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub web_root_path: PathBuf,
    pub secret_key: String,
    pub system_publisher: String,
    pub plugin_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: PathBuf::from("form.sqlite"),
            web_root_path: PathBuf::from("wwwroot"),
            secret_key: LEGACY_SECRET_KEY.to_string(),
            system_publisher: SYSTEM_PUBLISHER.to_string(),
            plugin_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Settings {
    /// Loads the file named by `FORM_CONFIG` (if present) and applies the
    /// `FORM_*` environment overrides.
    pub fn load() -> Result<Self> {
        let path = env::var("FORM_CONFIG").unwrap_or_else(|_| "form.json".to_string());
        let mut settings = Self::from_file(Path::new(&path))?;
        settings.apply_env(|name| env::var(name).ok());
        if settings.uses_legacy_secret() {
            warn!("No secret key configured, archives are sealed with the legacy shared key");
        }
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        info!("Loading settings from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Whether archives would be sealed with the publicly known legacy key.
    pub fn uses_legacy_secret(&self) -> bool {
        self.secret_key.is_empty() || self.secret_key == LEGACY_SECRET_KEY
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("FORM_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("FORM_PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(path) = lookup("FORM_DATABASE") {
            self.database_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("FORM_WEB_ROOT") {
            self.web_root_path = PathBuf::from(path);
        }
        if let Some(key) = lookup("FORM_SECRET_KEY") {
            self.secret_key = key;
        }
    }
}

impl PluginEnvironment for Settings {
    fn version(&self) -> String {
        self.plugin_version.clone()
    }

    fn web_root_path(&self) -> PathBuf {
        self.web_root_path.clone()
    }
}
