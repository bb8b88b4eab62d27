use blackjack_core::game::session::{DEFAULT_MINIMUM_BET, DEFAULT_STARTING_CREDITS};
use blackjack_core::{Credits, TableRules};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

/// Table configuration loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TableConfig {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub table: TableSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TableConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: TableConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.player.validate()?;
        self.table.validate()?;
        self.logging.normalize();
        if self.logging.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.level".to_string(),
                message: format!("unknown level '{}'", self.logging.level),
            });
        }
        Ok(())
    }

    pub fn rules(&self) -> TableRules {
        TableRules {
            minimum_bet: self.table.minimum_bet,
            include_jokers: self.table.jokers,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PlayerConfig {
    /// Asked for at startup when absent.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_credits")]
    pub credits: Credits,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: None,
            credits: DEFAULT_STARTING_CREDITS,
        }
    }
}

impl PlayerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "player.name".to_string(),
                    message: "name must not be empty".to_string(),
                });
            }
        }

        if self.credits < 0 {
            return Err(ValidationError::InvalidField {
                field: "player.credits".to_string(),
                message: "starting credits must not be negative".to_string(),
            });
        }

        Ok(())
    }
}

fn default_credits() -> Credits {
    DEFAULT_STARTING_CREDITS
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TableSection {
    #[serde(default = "default_minimum_bet")]
    pub minimum_bet: Credits,
    #[serde(default)]
    pub jokers: bool,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_rounds: Option<u32>,
}

impl Default for TableSection {
    fn default() -> Self {
        Self {
            minimum_bet: DEFAULT_MINIMUM_BET,
            jokers: false,
            seed: None,
            max_rounds: None,
        }
    }
}

impl TableSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.minimum_bet <= 0 {
            return Err(ValidationError::InvalidField {
                field: "table.minimum_bet".to_string(),
                message: "minimum bet must be greater than zero".to_string(),
            });
        }

        if self.max_rounds == Some(0) {
            return Err(ValidationError::InvalidField {
                field: "table.max_rounds".to_string(),
                message: "round cap must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn default_minimum_bet() -> Credits {
    DEFAULT_MINIMUM_BET
}

/// Logs go to stderr unless a file is given, in which case they are JSON lines.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_tracing_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_tracing_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.level.trim().is_empty() {
            self.level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
