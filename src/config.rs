use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{ClientOptions, Credentials, Endpoint};
use crate::consts::{ENV_HOST, ENV_PASSWORD, ENV_PORT, ENV_USER};
use crate::core::Granularity;
use crate::error::AppError;

/// Port may be written as a number or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ConfigPort {
    Number(u16),
    Text(String),
}

impl ConfigPort {
    fn as_string(&self) -> String {
        match self {
            ConfigPort::Number(n) => n.to_string(),
            ConfigPort::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) host: Option<String>,
    #[serde(default)]
    pub(crate) port: Option<ConfigPort>,
    #[serde(default)]
    pub(crate) job: Option<String>,
    #[serde(default)]
    pub(crate) since: Option<String>,
    #[serde(default)]
    pub(crate) until: Option<String>,
    #[serde(default)]
    pub(crate) granularity: Option<Granularity>,
    #[serde(default)]
    pub(crate) output_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) max_result_size: Option<usize>,
    #[serde(default)]
    pub(crate) login_timeout_secs: Option<u64>,
    #[serde(default)]
    pub(crate) query_timeout_secs: Option<u64>,
    #[serde(default)]
    pub(crate) aggregate_output: Option<PathBuf>,
}

impl Config {
    /// Load an explicit config file, or the first parsable default location.
    ///
    /// An explicit path must exist and parse; default locations that fail to
    /// parse are skipped with a warning.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        for path in Self::get_config_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return Ok(config);
                }
                Err(e) => tracing::warn!("{e}"),
            }
        }

        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. XDG config: ~/.config/sankhya-extract/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(
                home.join(".config")
                    .join("sankhya-extract")
                    .join("config.toml"),
            );
        }

        // 2. Platform config dir (e.g. ~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("sankhya-extract").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.sankhya-extract.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".sankhya-extract.toml"));
        }

        paths
    }

    /// Host and port from the environment, falling back to the config file
    pub(crate) fn endpoint(&self) -> Endpoint {
        resolve_endpoint(self, env_var(ENV_HOST), env_var(ENV_PORT))
    }

    pub(crate) fn client_options(&self, max_result_size: Option<usize>) -> ClientOptions {
        let defaults = ClientOptions::default();
        ClientOptions {
            login_timeout: self
                .login_timeout_secs
                .map_or(defaults.login_timeout, Duration::from_secs),
            query_timeout: self
                .query_timeout_secs
                .map_or(defaults.query_timeout, Duration::from_secs),
            max_result_size: max_result_size
                .or(self.max_result_size)
                .unwrap_or(defaults.max_result_size),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> String {
    value.unwrap_or_else(|| {
        tracing::warn!("{name} is not set; requests will be sent without it");
        String::new()
    })
}

fn resolve_endpoint(config: &Config, env_host: Option<String>, env_port: Option<String>) -> Endpoint {
    Endpoint {
        host: required(env_host.or_else(|| config.host.clone()), ENV_HOST),
        port: required(
            env_port.or_else(|| config.port.as_ref().map(ConfigPort::as_string)),
            ENV_PORT,
        ),
    }
}

/// User and password only ever come from the environment
pub(crate) fn credentials_from_env() -> Credentials {
    Credentials {
        user: required(env_var(ENV_USER), ENV_USER),
        password: required(env_var(ENV_PASSWORD), ENV_PASSWORD),
    }
}
