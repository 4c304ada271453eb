//! Dashboard configuration.
//!
//! Stored as JSON at `<config dir>/bifocus/config.json`. Every field has a
//! default, so an empty object is a valid configuration.

mod error;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tracing::debug;

use crate::stats::WorkspaceId;
use crate::widget::WidgetSize;

pub use error::ConfigError;

/// Application directory name under the platform config and data dirs.
pub const APP_DIR: &str = "bifocus";

/// Configuration file name.
pub const CONFIG_FILE: &str = "config.json";

/// Accepted range of `tick_interval_ms`.
pub const TICK_INTERVAL_RANGE: std::ops::RangeInclusive<u64> = 1..=60_000;

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

/// Notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Whether completion notifications may be shown.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Dashboard configuration.
///
/// # Example
///
/// ```
/// use bifocus::config::DashboardConfig;
///
/// let config: DashboardConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config.default_workspace.as_str(), "pro");
/// assert_eq!(config.tick_interval_ms, 1000);
/// assert!(config.notifications.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Workspace active at startup.
    #[serde(default)]
    pub default_workspace: WorkspaceId,

    /// Countdown period in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Size of the floating widget, used to clamp its position.
    #[serde(default)]
    pub widget: WidgetSize,

    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Directory of the persisted values; the platform data dir if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_workspace: WorkspaceId::default(),
            tick_interval_ms: default_tick_interval_ms(),
            widget: WidgetSize::default(),
            notifications: NotificationConfig::default(),
            data_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Sets the countdown period.
    #[must_use]
    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Sets the startup workspace.
    #[must_use]
    pub fn with_default_workspace(mut self, workspace: WorkspaceId) -> Self {
        self.default_workspace = workspace;
        self
    }

    /// Reads and validates the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`], [`ConfigError::Parse`] or
    /// [`ConfigError::InvalidValue`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Loads the configuration from the platform config dir, falling back to
    /// the defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), plus [`ConfigError::NoConfigDir`].
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load(&path)
        } else {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Returns `<config dir>/bifocus/config.json`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir("config"))
    }

    /// Returns the configured data dir, or `<data dir>/bifocus`.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(ConfigError::NoConfigDir("data")),
        }
    }

    /// Returns the countdown period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validates value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !TICK_INTERVAL_RANGE.contains(&self.tick_interval_ms) {
            return Err(ConfigError::invalid(
                "tick_interval_ms",
                format!(
                    "must be between {} and {}",
                    TICK_INTERVAL_RANGE.start(),
                    TICK_INTERVAL_RANGE.end()
                ),
            ));
        }
        for (field, value) in [
            ("widget.width", self.widget.width),
            ("widget.height", self.widget.height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(field, "must be a positive number"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    mod default_tests {
        use super::*;

        #[test]
        fn test_default_config() {
            let config = DashboardConfig::default();
            assert_eq!(config.default_workspace.as_str(), "pro");
            assert_eq!(config.tick_interval(), Duration::from_secs(1));
            assert_eq!(config.widget, WidgetSize::default());
            assert!(config.notifications.enabled);
            assert!(config.data_dir.is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_empty_object_is_default() {
            let config: DashboardConfig = serde_json::from_str("{}").unwrap();
            assert_eq!(config, DashboardConfig::default());
        }

        #[test]
        fn test_explicit_data_dir_wins() {
            let config = DashboardConfig::default().with_data_dir("/tmp/bifocus-test");
            assert_eq!(
                config.resolve_data_dir().unwrap(),
                PathBuf::from("/tmp/bifocus-test")
            );
        }
    }

    mod validate_tests {
        use super::*;

        #[test]
        fn test_tick_interval_bounds() {
            assert!(DashboardConfig::default()
                .with_tick_interval_ms(1)
                .validate()
                .is_ok());
            assert!(DashboardConfig::default()
                .with_tick_interval_ms(60_000)
                .validate()
                .is_ok());

            let err = DashboardConfig::default()
                .with_tick_interval_ms(0)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidValue {
                    field: "tick_interval_ms",
                    ..
                }
            ));
            assert!(DashboardConfig::default()
                .with_tick_interval_ms(60_001)
                .validate()
                .is_err());
        }

        #[test]
        fn test_widget_size_must_be_positive() {
            let mut config = DashboardConfig::default();
            config.widget.width = 0.0;
            assert!(config.validate().is_err());

            let mut config = DashboardConfig::default();
            config.widget.height = f64::NAN;
            assert!(config.validate().is_err());
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_load_partial_file() {
            let file = write_config(
                r#"{"default_workspace": "perso", "notifications": {"enabled": false}}"#,
            );
            let config = DashboardConfig::load(file.path()).unwrap();
            assert_eq!(config.default_workspace.as_str(), "perso");
            assert!(!config.notifications.enabled);
            assert_eq!(config.tick_interval_ms, 1000);
        }

        #[test]
        fn test_load_missing_file() {
            let dir = tempfile::tempdir().unwrap();
            let err = DashboardConfig::load(dir.path().join("missing.json")).unwrap_err();
            assert!(matches!(err, ConfigError::Io { .. }));
        }

        #[test]
        fn test_load_invalid_json() {
            let file = write_config("{ not json");
            let err = DashboardConfig::load(file.path()).unwrap_err();
            assert!(matches!(err, ConfigError::Parse { .. }));
        }

        #[test]
        fn test_load_invalid_workspace() {
            let file = write_config(r#"{"default_workspace": "no spaces"}"#);
            let err = DashboardConfig::load(file.path()).unwrap_err();
            assert!(matches!(err, ConfigError::Parse { .. }));
        }

        #[test]
        fn test_load_out_of_range() {
            let file = write_config(r#"{"tick_interval_ms": 0}"#);
            let err = DashboardConfig::load(file.path()).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }));
        }
    }
}
