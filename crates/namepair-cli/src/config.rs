use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_DATA_PATH: &str = "namepair.json";
const DEFAULT_TELEMETRY_DIR: &str = "telemetry";

/// Root application configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            seed: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: AppConfig =
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

    /// Like [`AppConfig::from_path`], but a missing file yields the defaults.
    pub fn from_path_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::from_path(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.data_path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "data_path".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        self.logging.validate()
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_telemetry_dir")]
    pub telemetry_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            telemetry_dir: default_telemetry_dir(),
        }
    }
}

impl LoggingConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.tracing_level),
            });
        }
        if self.enable_structured && self.telemetry_dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "logging.telemetry_dir".to_string(),
                message: "directory must not be empty when structured logging is enabled"
                    .to_string(),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
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
    "info".to_string()
}

fn default_telemetry_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TELEMETRY_DIR)
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL_YAML: &str = r#"
data_path: "state/names.json"
seed: 4242
logging:
  enable_structured: true
  tracing_level: "debug"
  telemetry_dir: "state/logs"
"#;

    #[test]
    fn loads_full_config() {
        let mut cfg: AppConfig = serde_yaml::from_str(FULL_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.data_path, PathBuf::from("state/names.json"));
        assert_eq!(cfg.seed, Some(4242));
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert_eq!(cfg.logging.telemetry_dir, PathBuf::from("state/logs"));
    }

    #[test]
    fn empty_mapping_uses_defaults() {
        let mut cfg: AppConfig = serde_yaml::from_str("{}").expect("parse yaml");
        cfg.validate().expect("validate");
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert!(!cfg.logging.enable_structured);
    }

    #[test]
    fn blank_level_falls_back_to_info() {
        let mut cfg: AppConfig =
            serde_yaml::from_str("logging:\n  tracing_level: \" \"\n").expect("parse yaml");
        cfg.validate().expect("validate");
        assert_eq!(cfg.logging.level(), Some(Level::INFO));
    }

    #[test]
    fn rejects_unknown_level() {
        let mut cfg: AppConfig =
            serde_yaml::from_str("logging:\n  tracing_level: loud\n").expect("parse yaml");
        let err = cfg.validate().expect_err("invalid level");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "logging.tracing_level"
        ));
    }

    #[test]
    fn rejects_empty_data_path() {
        let mut cfg: AppConfig = serde_yaml::from_str("data_path: \"\"\n").expect("parse yaml");
        let err = cfg.validate().expect_err("empty path");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "data_path"
        ));
    }

    #[test]
    fn missing_file_yields_defaults_but_bad_yaml_does_not() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.yaml");
        assert_eq!(
            AppConfig::from_path_or_default(&missing).expect("defaults"),
            AppConfig::default()
        );

        let broken = dir.path().join("broken.yaml");
        let mut file = File::create(&broken).expect("create");
        writeln!(file, "seed: [not a number").expect("write");
        let err = AppConfig::from_path_or_default(&broken).expect_err("parse failure");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), broken.as_path());
    }
}
