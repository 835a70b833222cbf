use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::convert::UnknownFieldPolicy;
use crate::error::StrainError;
use crate::util::{DEFAULT_BATCH_SIZE, DEFAULT_HASH_BLOCK_SIZE};

pub const DEFAULT_CONFIG_FILE: &str = "strainbank.json";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub hash_block_size: Option<usize>,
    #[serde(default)]
    pub unknown_fields: Option<UnknownFieldPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub batch_size: usize,
    pub hash_block_size: usize,
    pub unknown_fields: UnknownFieldPolicy,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            batch_size: DEFAULT_BATCH_SIZE,
            hash_block_size: DEFAULT_HASH_BLOCK_SIZE,
            unknown_fields: UnknownFieldPolicy::Reject,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path`, or `strainbank.json` from the working directory when no path
    /// is given. A missing default file means defaults.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, StrainError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(ResolvedConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| StrainError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| StrainError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, StrainError> {
        let defaults = ResolvedConfig::default();

        let schema_version = config.schema_version.unwrap_or(defaults.schema_version);
        if schema_version != SCHEMA_VERSION {
            return Err(StrainError::UnsupportedSchema(schema_version));
        }

        let batch_size = config.batch_size.unwrap_or(defaults.batch_size);
        if batch_size == 0 {
            return Err(StrainError::InvalidBatchSize);
        }
        let hash_block_size = config.hash_block_size.unwrap_or(defaults.hash_block_size);
        if hash_block_size == 0 {
            return Err(StrainError::InvalidBlockSize);
        }

        Ok(ResolvedConfig {
            schema_version,
            batch_size,
            hash_block_size,
            unknown_fields: config.unknown_fields.unwrap_or(defaults.unknown_fields),
        })
    }
}
