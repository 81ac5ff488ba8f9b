use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AvailabilityConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    /// Process-local product set, for local development only.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown product store backend '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Products preloaded into the memory backend.
    pub seed: Vec<String>,
    pub timeout_ms: u64,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AvailabilityConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_vars(common_config, |key| env::var(key).ok())
    }

    /// Build the service configuration from a variable lookup.
    pub fn from_vars<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";
        let get = |key: &str, default: Option<&str>| get_var(&lookup, key, default, is_prod);

        let backend: StoreBackend = get("PRODUCT_STORE", Some("mongodb"))?.parse()?;
        if backend == StoreBackend::Memory && is_prod {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "The memory product store cannot be used in production"
            )));
        }

        // The memory backend never dials MongoDB, so the URI is optional there.
        let uri_default = match backend {
            StoreBackend::MongoDb => None,
            StoreBackend::Memory => Some("mongodb://localhost:27017"),
        };

        let timeout_ms = get("PRODUCT_STORE_TIMEOUT_MS", Some("5000"))?
            .parse::<u64>()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "PRODUCT_STORE_TIMEOUT_MS must be a whole number of milliseconds: {}",
                    e
                ))
            })?;
        if timeout_ms == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PRODUCT_STORE_TIMEOUT_MS must be greater than zero"
            )));
        }

        let seed = lookup("PRODUCT_STORE_SEED")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(AvailabilityConfig {
            common,
            mongodb: MongoConfig {
                uri: Secret::new(get("MONGODB_URI", uri_default)?),
                database: get("MONGODB_DATABASE", Some("manufacturing"))?,
            },
            store: StoreConfig {
                backend,
                seed,
                timeout_ms,
            },
        })
    }
}

fn get_var<F>(lookup: &F, key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(val) => Ok(val),
        None => {
            if is_prod && default.is_none() {
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
