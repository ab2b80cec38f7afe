//! # Session Configuration
//!
//! Configuration for a registration session.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KRS_MAX_CREDITS=24                                                 │
//! │     KRS_MODE=what_if                                                   │
//! │     KRS_RESET_DELAY_MS=2000                                            │
//! │     KRS_CATALOG_PATH=/srv/krs/catalog.json                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/registration/config.toml (Linux)                         │
//! │     ~/Library/Application Support/id.krs.registration/config.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     24 SKS cap, committed mode, 2 s reset, 07:00-17:00 grid            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [registration]
//! max_credits = 24
//! start_mode = "committed"   # committed | what_if
//!
//! [workflow]
//! reset_delay_ms = 2000
//!
//! [timetable]
//! first_hour = 7
//! last_hour = 17
//!
//! [catalog]
//! path = "/srv/krs/catalog.json"   # omit to use the built-in catalog
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use krs_core::conflict::GridSpec;
use krs_core::{Catalog, Mode, DEFAULT_MAX_CREDITS, GRID_FIRST_HOUR, GRID_LAST_HOUR};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Registration Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSettings {
    /// Credit cap per term. Review is refused above it.
    #[serde(default = "default_max_credits")]
    pub max_credits: u32,

    /// Mode the session starts in.
    #[serde(default)]
    pub start_mode: Mode,
}

fn default_max_credits() -> u32 {
    DEFAULT_MAX_CREDITS
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        RegistrationSettings {
            max_credits: default_max_credits(),
            start_mode: Mode::default(),
        }
    }
}

// =============================================================================
// Workflow Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSettings {
    /// How long the success screen stays before returning to editing.
    #[serde(default = "default_reset_delay")]
    pub reset_delay_ms: u64,
}

fn default_reset_delay() -> u64 {
    2000
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        WorkflowSettings {
            reset_delay_ms: default_reset_delay(),
        }
    }
}

// =============================================================================
// Timetable Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSettings {
    #[serde(default = "default_first_hour")]
    pub first_hour: u16,

    /// Exclusive.
    #[serde(default = "default_last_hour")]
    pub last_hour: u16,
}

fn default_first_hour() -> u16 {
    GRID_FIRST_HOUR
}

fn default_last_hour() -> u16 {
    GRID_LAST_HOUR
}

impl Default for TimetableSettings {
    fn default() -> Self {
        TimetableSettings {
            first_hour: default_first_hour(),
            last_hour: default_last_hour(),
        }
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON catalog file. `None` uses the built-in informatics catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Main Session Configuration
// =============================================================================

/// Complete session configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub registration: RegistrationSettings,

    #[serde(default)]
    pub workflow: WorkflowSettings,

    #[serde(default)]
    pub timetable: TimetableSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading session config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load session config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML document and validates it. Environment is not consulted.
    pub fn from_toml(contents: &str) -> SessionResult<Self> {
        let config: SessionConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Session config saved");
        Ok(())
    }

    pub fn validate(&self) -> SessionResult<()> {
        if self.registration.max_credits == 0 {
            return Err(SessionError::InvalidConfig(
                "max_credits must be greater than 0".into(),
            ));
        }

        let TimetableSettings {
            first_hour,
            last_hour,
        } = self.timetable;
        if first_hour >= last_hour || last_hour > 24 {
            return Err(SessionError::InvalidConfig(format!(
                "timetable hours must satisfy first_hour < last_hour <= 24, got {}..{}",
                first_hour, last_hour
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `KRS_*` overrides from `lookup`. Unparseable values are
    /// logged and ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("KRS_MAX_CREDITS") {
            match value.parse::<u32>() {
                Ok(max) => {
                    debug!(max_credits = max, "Overriding credit cap from environment");
                    self.registration.max_credits = max;
                }
                Err(_) => warn!(value = %value, "Ignoring invalid KRS_MAX_CREDITS"),
            }
        }

        if let Some(value) = lookup("KRS_MODE") {
            match value.parse::<Mode>() {
                Ok(mode) => {
                    debug!(%mode, "Overriding start mode from environment");
                    self.registration.start_mode = mode;
                }
                Err(e) => warn!(value = %value, "Ignoring KRS_MODE: {}", e),
            }
        }

        if let Some(value) = lookup("KRS_RESET_DELAY_MS") {
            match value.parse::<u64>() {
                Ok(ms) => self.workflow.reset_delay_ms = ms,
                Err(_) => warn!(value = %value, "Ignoring invalid KRS_RESET_DELAY_MS"),
            }
        }

        if let Some(path) = lookup("KRS_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog.path = Some(PathBuf::from(path));
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("id", "krs", "registration")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.workflow.reset_delay_ms)
    }

    pub fn grid_spec(&self) -> GridSpec {
        GridSpec {
            first_hour: self.timetable.first_hour,
            last_hour: self.timetable.last_hour,
        }
    }

    /// Reads the configured catalog file, or returns the built-in catalog.
    pub fn load_catalog(&self) -> SessionResult<Catalog> {
        match &self.catalog.path {
            Some(path) => {
                info!(?path, "Loading course catalog");
                let json = std::fs::read_to_string(path)
                    .map_err(|e| SessionError::CatalogLoadFailed(format!("{}: {}", path.display(), e)))?;
                let catalog = Catalog::from_json(&json)?;
                info!(courses = catalog.len(), "Catalog loaded");
                Ok(catalog)
            }
            None => {
                debug!("No catalog path configured, using built-in catalog");
                Ok(Catalog::builtin())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.registration.max_credits, 24);
        assert_eq!(config.registration.start_mode, Mode::Committed);
        assert_eq!(config.reset_delay(), Duration::from_millis(2000));
        assert_eq!(config.grid_spec(), GridSpec::default());
        assert!(config.catalog.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SessionConfig::from_toml(
            r#"
            [registration]
            start_mode = "what_if"

            [timetable]
            last_hour = 18
            "#,
        )
        .unwrap();

        assert_eq!(config.registration.start_mode, Mode::WhatIf);
        assert_eq!(config.registration.max_credits, 24);
        assert_eq!(config.timetable.first_hour, 7);
        assert_eq!(config.grid_spec().bucket_count(), 11);
        assert_eq!(config.workflow.reset_delay_ms, 2000);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SessionConfig::default();

        config.registration.max_credits = 0;
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));

        config.registration.max_credits = 20;
        config.timetable.first_hour = 17;
        config.timetable.last_hour = 7;
        assert!(config.validate().is_err());

        config.timetable.first_hour = 7;
        config.timetable.last_hour = 25;
        assert!(config.validate().is_err());

        config.timetable.last_hour = 24;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars = env(&[
            ("KRS_MAX_CREDITS", "21"),
            ("KRS_MODE", "simulasi"),
            ("KRS_RESET_DELAY_MS", "500"),
            ("KRS_CATALOG_PATH", "/tmp/catalog.json"),
        ]);
        let mut config = SessionConfig::default();
        config.apply_overrides(|k| vars.get(k).cloned());

        assert_eq!(config.registration.max_credits, 21);
        assert_eq!(config.registration.start_mode, Mode::WhatIf);
        assert_eq!(config.workflow.reset_delay_ms, 500);
        assert_eq!(config.catalog.path, Some(PathBuf::from("/tmp/catalog.json")));
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let vars = env(&[("KRS_MAX_CREDITS", "lots"), ("KRS_MODE", "draft")]);
        let mut config = SessionConfig::default();
        config.apply_overrides(|k| vars.get(k).cloned());
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_toml_serialization() {
        let config = SessionConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[registration]"));
        assert!(toml_str.contains("[workflow]"));
        assert!(toml_str.contains("start_mode = \"committed\""));

        let back = SessionConfig::from_toml(&toml_str).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_builtin_catalog_when_no_path() {
        let catalog = SessionConfig::default().load_catalog().unwrap();
        assert_eq!(catalog.len(), 8);
    }

    #[test]
    fn test_missing_catalog_file() {
        let mut config = SessionConfig::default();
        config.catalog.path = Some(PathBuf::from("/nonexistent/krs/catalog.json"));
        assert!(matches!(
            config.load_catalog(),
            Err(SessionError::CatalogLoadFailed(_))
        ));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("krs-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = SessionConfig::default();
        config.registration.max_credits = 22;
        config.save(Some(path.clone())).unwrap();

        let loaded = SessionConfig::from_toml(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.registration.max_credits, 22);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
