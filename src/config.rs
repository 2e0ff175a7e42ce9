use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::calendar::WeekStart;
use crate::theme::ThemeConfig;

const APP_DIR: &str = "crm-calendar";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub week_start: WeekStart,
    pub upcoming_limit: usize,
    pub data_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub seed_demo_events: bool,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sunday,
            upcoming_limit: 5,
            data_file: None,
            log_file: None,
            seed_demo_events: true,
            theme: ThemeConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`. A missing
    /// file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) => p,
            None => return Ok(Self::default()),
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| data_dir().join("events.json"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| data_dir().join("crm-calendar.log"))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.upcoming_limit, 5);
        assert!(config.seed_demo_events);
        assert!(config.data_path().ends_with("events.json"));
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r##"
            week_start = "monday"
            upcoming_limit = 3
            data_file = "/tmp/cal/events.json"
            seed_demo_events = false

            [theme]
            preset = "nord"
            today_bg = "#ff0000"

            [theme.event_colors]
            call = "yellow"
            "##,
        )
        .unwrap();
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.upcoming_limit, 3);
        assert_eq!(config.data_path(), PathBuf::from("/tmp/cal/events.json"));
        assert!(!config.seed_demo_events);
        assert_eq!(config.theme.preset.as_deref(), Some("nord"));
        assert_eq!(config.theme.event_colors.call.as_deref(), Some("yellow"));
    }

    #[test]
    fn rejects_unknown_week_start() {
        assert!(Config::parse(r#"week_start = "wednesday""#).is_err());
    }

    #[test]
    fn load_reads_file_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let missing = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(missing.upcoming_limit, 5);

        std::fs::write(&path, "upcoming_limit = 9").unwrap();
        assert_eq!(Config::load(Some(path.as_path())).unwrap().upcoming_limit, 9);

        std::fs::write(&path, "upcoming_limit = \"many\"").unwrap();
        assert!(matches!(Config::load(Some(path.as_path())), Err(ConfigError::Parse { .. })));
    }
}
