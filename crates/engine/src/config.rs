use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::app::{WindowConfig, DEFAULT_MAX_DELTA_MS};

pub const CONFIG_ENV_VAR: &str = "BLOCKFIELD_CONFIG";
pub const TIME_STEP_ENV_VAR: &str = "BLOCKFIELD_TIME_STEP";

pub const DEFAULT_FIXED_STEP_MS: f32 = 1000.0 / 60.0;
pub const DEFAULT_IDLE_SLEEP_MS: u64 = 100;
pub const DEFAULT_METRICS_LOG_INTERVAL_MS: u64 = 1000;

/// Where the per-frame simulation step comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStepMode {
    /// Always `fixed_step_ms`, for reproducible stepping.
    #[default]
    Fixed,
    /// The clamped wall-clock time since the previous frame.
    Measured,
}

impl TimeStepMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeStepMode::Fixed => "fixed",
            TimeStepMode::Measured => "measured",
        }
    }
}

impl FromStr for TimeStepMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(TimeStepMode::Fixed),
            "measured" => Ok(TimeStepMode::Measured),
            other => Err(format!(
                "unknown time step mode '{other}' (expected fixed or measured)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub grab_cursor: bool,
    pub max_delta_ms: f32,
    pub fixed_step_ms: f32,
    pub time_step_mode: TimeStepMode,
    pub idle_sleep_ms: u64,
    pub metrics_log_interval_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Blockfield".to_string(),
            window_width: 1024,
            window_height: 768,
            grab_cursor: true,
            max_delta_ms: DEFAULT_MAX_DELTA_MS,
            fixed_step_ms: DEFAULT_FIXED_STEP_MS,
            time_step_mode: TimeStepMode::Fixed,
            idle_sleep_ms: DEFAULT_IDLE_SLEEP_MS,
            metrics_log_interval_ms: DEFAULT_METRICS_LOG_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoopConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, path)
    }

    /// `origin` only labels errors.
    pub fn from_json_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        serde_path_to_error::deserialize::<_, LoopConfig>(&mut deserializer).map_err(|error| {
            let field = error.path().to_string();
            ConfigError::Parse {
                path: origin.to_path_buf(),
                field: if field.is_empty() || field == "." {
                    "<root>".to_string()
                } else {
                    field
                },
                source: error.into_inner(),
            }
        })
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            title: self.window_title.clone(),
            width: self.window_width,
            height: self.window_height,
            grab_cursor: self.grab_cursor,
        }
    }
}

/// Defaults, then the file named by `BLOCKFIELD_CONFIG` if set, then the
/// `BLOCKFIELD_TIME_STEP` override.
pub fn load_loop_config() -> Result<LoopConfig, ConfigError> {
    let mut config = match env::var(CONFIG_ENV_VAR) {
        Ok(value) => {
            let path = PathBuf::from(value);
            let config = LoopConfig::from_json_file(&path)?;
            info!(path = %path.display(), "config_loaded");
            config
        }
        Err(env::VarError::NotPresent) => LoopConfig::default(),
        Err(source) => {
            return Err(ConfigError::EnvVar {
                var: CONFIG_ENV_VAR,
                source,
            })
        }
    };
    config.time_step_mode =
        resolve_time_step_mode(env::var(TIME_STEP_ENV_VAR), config.time_step_mode);
    Ok(config)
}

fn resolve_time_step_mode(
    env_value: Result<String, env::VarError>,
    configured: TimeStepMode,
) -> TimeStepMode {
    match env_value {
        Ok(value) => match value.parse::<TimeStepMode>() {
            Ok(mode) => mode,
            Err(reason) => {
                warn!(
                    env_var = TIME_STEP_ENV_VAR,
                    value = value.as_str(),
                    reason = reason.as_str(),
                    "invalid time step env var value; falling back to config"
                );
                configured
            }
        },
        Err(env::VarError::NotPresent) => configured,
        Err(err) => {
            warn!(
                env_var = TIME_STEP_ENV_VAR,
                error = %err,
                "unable to read time step env var; falling back to config"
            );
            configured
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = LoopConfig::from_json_str("{}", Path::new("inline")).expect("config");
        assert_eq!(config, LoopConfig::default());
    }

    #[test]
    fn defaults_match_reference_pacing() {
        let config = LoopConfig::default();
        assert_eq!(config.max_delta_ms, 50.0);
        assert!((config.fixed_step_ms - 16.666_666).abs() < 0.001);
        assert_eq!(config.idle_sleep_ms, 100);
        assert_eq!(config.time_step_mode, TimeStepMode::Fixed);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "time_step_mode": "measured", "idle_sleep_ms": 250, "grab_cursor": false }}"#
        )
        .expect("write config");

        let config = LoopConfig::from_json_file(file.path()).expect("config");

        assert_eq!(config.time_step_mode, TimeStepMode::Measured);
        assert_eq!(config.idle_sleep_ms, 250);
        assert!(!config.grab_cursor);
        assert_eq!(config.max_delta_ms, DEFAULT_MAX_DELTA_MS);
    }

    #[test]
    fn parse_error_reports_field_path() {
        let error = LoopConfig::from_json_str(
            r#"{ "max_delta_ms": "fast" }"#,
            Path::new("loop.json"),
        )
        .expect_err("should fail");

        match error {
            ConfigError::Parse { path, field, .. } => {
                assert_eq!(path, PathBuf::from("loop.json"));
                assert_eq!(field, "max_delta_ms");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        let error = LoopConfig::from_json_str(r#"{ "vsync": true }"#, Path::new("loop.json"))
            .expect_err("should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = LoopConfig::from_json_file(&dir.path().join("absent.json"))
            .expect_err("should fail");
        assert!(matches!(error, ConfigError::Read { .. }));
    }

    #[test]
    fn time_step_env_override_wins_when_valid() {
        let mode = resolve_time_step_mode(Ok("Measured".to_string()), TimeStepMode::Fixed);
        assert_eq!(mode, TimeStepMode::Measured);
    }

    #[test]
    fn invalid_time_step_env_falls_back_to_config() {
        let mode = resolve_time_step_mode(Ok("sometimes".to_string()), TimeStepMode::Measured);
        assert_eq!(mode, TimeStepMode::Measured);
    }

    #[test]
    fn absent_time_step_env_keeps_config() {
        let mode = resolve_time_step_mode(Err(env::VarError::NotPresent), TimeStepMode::Fixed);
        assert_eq!(mode, TimeStepMode::Fixed);
    }

    #[test]
    fn window_config_copies_window_fields() {
        let config = LoopConfig {
            window_title: "t".to_string(),
            window_width: 320,
            window_height: 200,
            grab_cursor: false,
            ..LoopConfig::default()
        };
        let window = config.window_config();

        assert_eq!(window.title, "t");
        assert_eq!((window.width, window.height), (320, 200));
        assert!(!window.grab_cursor);
    }
}
