// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FaroError, Result};

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "FARO_API_URL";

/// Default API host used when neither the config file nor the environment
/// name one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the registry REST API (e.g. `https://faro.example/api`).
    pub api_base_url: String,
    /// Public origin of the web front-end; verification QR codes point here.
    pub public_origin: String,
    /// Per-request timeout for API calls.
    pub request_timeout_secs: u64,
    /// Where downloaded certificates are written. `None` = `<data dir>/downloads`.
    pub downloads_dir: Option<PathBuf>,
    /// Program used to open rendered certificates (`xdg-open` when unset).
    pub viewer_command: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            public_origin: "http://localhost:3000".into(),
            request_timeout_secs: 30,
            downloads_dir: None,
            viewer_command: None,
        }
    }
}

impl AppConfig {
    /// Load `config.json` from `dir`, falling back to defaults when the file
    /// is absent, then apply the environment override.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut config = Self::load_stored(dir)?;
        config.apply_env_override(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    /// Load `config.json` as written, without environment overrides.
    pub fn load_stored(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let config = match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).map_err(|e| {
                FaroError::Config(format!("{}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(config)
    }

    /// Write the configuration to `config.json` in `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), json)?;
        Ok(())
    }

    /// Replace the API base URL with `value` when it is set and non-blank.
    pub fn apply_env_override(&mut self, value: Option<String>) {
        match value.map(|v| v.trim().to_owned()) {
            Some(url) if !url.is_empty() => {
                debug!(%url, "API base URL overridden from {API_URL_ENV}");
                self.api_base_url = url;
            }
            Some(_) => warn!("{API_URL_ENV} is set but empty, ignoring"),
            None => {}
        }
    }
}
