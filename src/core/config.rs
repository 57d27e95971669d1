use crate::core::errors::ConfigError;
use std::env;
use std::path::Path;
use tracing::Level;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub log_level: Level,
}

/// Gemini API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub model: String,
    pub timeout_seconds: u64,
}

/// Local persistence configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: String,
}

/// Language detection configuration
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Minimum trimmed length before detection is attempted;
    /// anything shorter defaults to English
    pub min_text_length: usize,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub detection: DetectionConfig,
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Self::load_from_env()?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_env() -> Result<Self, ConfigError> {
        // Parse log level
        let log_level = env::var("LOG_LEVEL")
            .ok()
            .and_then(|s| match s.to_lowercase().as_str() {
                "trace" => Some(Level::TRACE),
                "debug" => Some(Level::DEBUG),
                "info" => Some(Level::INFO),
                "warn" | "warning" => Some(Level::WARN),
                "error" => Some(Level::ERROR),
                _ => None,
            })
            .unwrap_or(Level::INFO);

        Ok(Self {
            server: ServerConfig {
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(8787),
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                log_level,
            },
            api: ApiConfig {
                api_key: env::var("GEMINI_API_KEY")
                    .ok()
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.0-flash-lite".to_string()),
                timeout_seconds: env::var("API_TIMEOUT_SECONDS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            },
            storage: StorageConfig {
                data_dir: env::var("DATA_DIR").unwrap_or_else(|_| ".data".to_string()),
            },
            detection: DetectionConfig {
                min_text_length: env::var("MIN_TEXT_LENGTH")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            },
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.api_key.is_empty() {
            return Err(ConfigError::NoApiKey);
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::InvalidApiTimeout);
        }

        if self.detection.min_text_length == 0 {
            return Err(ConfigError::InvalidMinTextLength(
                self.detection.min_text_length,
            ));
        }

        // Validate data directory parent exists (the directory itself
        // is created on store startup)
        let data_path = Path::new(&self.storage.data_dir);
        if let Some(parent) = data_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(ConfigError::InvalidDataDir(format!(
                    "Parent directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }

    pub fn server_port(&self) -> u16 {
        self.server.port
    }

    pub fn server_host(&self) -> &str {
        &self.server.host
    }

    pub fn log_level(&self) -> Level {
        self.server.log_level
    }

    pub fn api_key(&self) -> &str {
        &self.api.api_key
    }

    pub fn model(&self) -> &str {
        &self.api.model
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    pub fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    pub fn min_text_length(&self) -> usize {
        self.detection.min_text_length
    }
}

// Note: No Default implementation because Config::new() can fail
// Users should explicitly call Config::new()? and handle errors
