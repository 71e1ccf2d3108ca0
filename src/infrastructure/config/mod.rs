use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::csv::MAX_UPLOAD_BYTES;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;

pub const CONFIG_FILE: &str = "csv_enricher.toml";
pub const ENV_PREFIX: &str = "CSV_ENRICHER_";

/// Instruction sent ahead of every description. It asks for the first and last
/// name of a person mentioned in the text, or `----` when there is none.
pub const DEFAULT_INSTRUCTION: &str = "Gjej emrin dhe mbiemrin e nje personi ne kete pershkrin dhe pergjigja jote duhet te jete vetem emri dhe mbiemri . Nese ne pershkrim nuk ka emer real  atehere pergjigja jote do te jete '----'.";

pub const DEFAULT_SENTINEL: &str = "----";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_bytes: u64,
    /// Relative paths resolve against the working directory
    pub output_dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_UPLOAD_BYTES,
            output_dir: PathBuf::from("uploads"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub instruction: String,
    pub sentinel: String,
    pub request_timeout_secs: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            instruction: DEFAULT_INSTRUCTION.to_string(),
            sentinel: DEFAULT_SENTINEL.to_string(),
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub llm: LLMConfig,
    pub enrichment: EnrichmentConfig,
}

impl AppConfig {
    /// Defaults, then `csv_enricher.toml`, then `CSV_ENRICHER_*` variables.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment(Path::new(CONFIG_FILE)))
    }

    pub fn figment(config_file: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::ConfigError("server.port must be > 0".to_string()));
        }
        if self.upload.max_bytes == 0 {
            return Err(AppError::ConfigError(
                "upload.max_bytes must be > 0".to_string(),
            ));
        }
        if self.upload.output_dir.as_os_str().is_empty() {
            return Err(AppError::ConfigError(
                "upload.output_dir must not be empty".to_string(),
            ));
        }
        if self.enrichment.instruction.trim().is_empty() {
            return Err(AppError::ConfigError(
                "enrichment.instruction must not be empty".to_string(),
            ));
        }
        if self.enrichment.request_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "enrichment.request_timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
