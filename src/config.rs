// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the Withings client
//!
//! Only endpoint and transport settings live here. Credentials are supplied
//! by the embedding application.

use crate::constants::{endpoints, env_config};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_oauth_base_url")]
    pub oauth_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    endpoints::API_BASE_URL.to_string()
}

fn default_oauth_base_url() -> String {
    endpoints::OAUTH_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    endpoints::DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            oauth_base_url: default_oauth_base_url(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("withings-client/config.toml"))
        .unwrap_or_else(|| "config.toml".into())
}

impl Config {
    /// Load from a TOML file, or from the environment when the file is absent
    pub fn load(path: Option<String>) -> Result<Self> {
        let config_path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            dotenv::dotenv().ok();
            Ok(Self::from_env())
        }
    }

    /// Settings from `WITHINGS_*` environment variables, with defaults
    pub fn from_env() -> Self {
        Self {
            api_base_url: env_config::api_base_url(),
            oauth_base_url: env_config::oauth_base_url(),
            request_timeout_secs: env_config::request_timeout_secs(),
        }
    }

    pub fn save(&self, path: Option<String>) -> Result<()> {
        let config_path = path.map(PathBuf::from).unwrap_or_else(default_config_path);

        let parent = Path::new(&config_path)
            .parent()
            .context("Invalid config path")?;
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }
}
