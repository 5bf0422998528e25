use std::path::{Path, PathBuf};

use tracing::warn;

use crate::ai::HeuristicConfig;
use crate::error::ConfigError;
use crate::stats::DEFAULT_STATS_FILE;

/// Where and whether win/loss stats are kept.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub path: PathBuf,
    /// When false, stats live only for the current run.
    pub persist: bool,
}

impl Default for StatsConfig {
    fn default() -> Self {
        StatsConfig {
            path: PathBuf::from(DEFAULT_STATS_FILE),
            persist: true,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub bell_on_drop: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            enabled: true,
            bell_on_drop: false,
        }
    }
}

/// Presentation timing. The game itself never waits on these.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Time for a falling disc to move down one row.
    pub drop_frame_ms: u64,
    /// Pause before the computer's reply starts to fall.
    pub ai_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            drop_frame_ms: 100,
            ai_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            file: PathBuf::from("connect_four.log"),
            filter: "info".to_string(),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub heuristic: HeuristicConfig,
    pub stats: StatsConfig,
    pub audio: AudioConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.heuristic.validate()?;

        if self.ui.drop_frame_ms == 0 {
            return Err(ConfigError::Validation(
                "ui.drop_frame_ms must be > 0".into(),
            ));
        }
        if self.stats.persist && self.stats.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "stats.path must be set when stats.persist is true".into(),
            ));
        }
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "log.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[heuristic]
setup_threshold = 6.5
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.heuristic.setup_threshold - 6.5).abs() < 1e-9);
        // Other fields should be defaults
        assert!((config.heuristic.center_weight - 0.5).abs() < 1e-9);
        assert_eq!(config.heuristic.preference_order, vec![3, 2, 4, 1, 5, 0, 6]);
        assert_eq!(config.ui.ai_delay_ms, 1000);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        let default = AppConfig::default();
        assert_eq!(config.heuristic, default.heuristic);
        assert_eq!(config.stats.path, default.stats.path);
        assert!(config.audio.enabled);
    }

    #[test]
    fn test_validation_rejects_zero_drop_frame() {
        let mut config = AppConfig::default();
        config.ui.drop_frame_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_stats_path() {
        let mut config = AppConfig::default();
        config.stats.path = PathBuf::new();
        assert!(config.validate().is_err());

        config.stats.persist = false;
        config.validate().expect("path is unused without persistence");
    }

    #[test]
    fn test_validation_rejects_bad_heuristic() {
        let mut config = AppConfig::default();
        config.heuristic.preference_order = vec![1, 9];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_log_filter() {
        let mut config = AppConfig::default();
        config.log.filter = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.ui.drop_frame_ms, 100);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[heuristic]
seed = 11

[audio]
enabled = false
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.heuristic.seed, Some(11));
        assert!(!config.audio.enabled);
        // Others are defaults
        assert!((config.heuristic.exposure_penalty - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[ui]\ndrop_frame_ms = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));

        std::fs::write(&path, "[ui\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config.heuristic, HeuristicConfig::default());
    }
}
