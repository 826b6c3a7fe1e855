use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub local_path: String,
    pub max_upload_bytes: usize,
}

impl VaultConfig {
    pub fn load() -> Result<Self, AppError> {
        // Common config handles .env and the APP__ prefix
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Builds the service settings from `lookup`, which maps variable names
    /// to values. In `prod`, every variable must be set explicitly.
    pub fn from_lookup<F>(mut common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";
        let get = |key: &str, default: Option<&str>| get_env(&lookup, key, default, is_prod);

        if let Some(level) = lookup("LOG_LEVEL") {
            common.log_level = level;
        }
        if let Some(endpoint) = lookup("OTLP_ENDPOINT") {
            common.otlp_endpoint = Some(endpoint);
        }

        let default_limit = DEFAULT_MAX_UPLOAD_BYTES.to_string();
        let max_upload_bytes = get("STORAGE_MAX_UPLOAD_BYTES", Some(default_limit.as_str()))?
            .parse::<usize>()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "STORAGE_MAX_UPLOAD_BYTES must be a byte count: {}",
                    e
                ))
            })?;

        Ok(VaultConfig {
            common,
            mongodb: MongoConfig {
                uri: get("MONGODB_URI", Some("mongodb://localhost:27017"))?,
                database: get("MONGODB_DATABASE", Some("family_vault"))?,
            },
            storage: StorageConfig {
                local_path: get("STORAGE_LOCAL_PATH", Some("uploads"))?,
                max_upload_bytes,
            },
        })
    }
}

fn get_env<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
