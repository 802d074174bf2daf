use crate::error::AppError;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub snapshot: SnapshotSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the backend command endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SnapshotSettings {
    /// Overrides the platform data-dir location of the timer snapshot.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl SnapshotSettings {
    /// Resolved snapshot file location.
    pub fn resolve(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("freelance-invoice")
                .join("timer-snapshot.json"),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8090".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("configuration").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn load_uses_defaults_without_sources() {
        std::env::remove_var("APP_BACKEND__BASE_URL");
        std::env::remove_var("APP_LOG_LEVEL");

        let settings = Settings::load().unwrap();
        assert_eq!(settings.backend.base_url, "http://localhost:8090");
        assert_eq!(settings.log_level, "info");
        assert!(settings.snapshot.path.is_none());
    }

    #[test]
    #[serial]
    fn environment_overrides_nested_fields() {
        std::env::set_var("APP_BACKEND__BASE_URL", "http://127.0.0.1:9999");
        std::env::set_var("APP_LOG_LEVEL", "debug");

        let settings = Settings::load().unwrap();
        assert_eq!(settings.backend.base_url, "http://127.0.0.1:9999");
        assert_eq!(settings.log_level, "debug");

        std::env::remove_var("APP_BACKEND__BASE_URL");
        std::env::remove_var("APP_LOG_LEVEL");
    }

    #[test]
    fn snapshot_override_wins_over_platform_dir() {
        let snapshot = SnapshotSettings {
            path: Some(PathBuf::from("/tmp/timer.json")),
        };
        assert_eq!(snapshot.resolve(), PathBuf::from("/tmp/timer.json"));
    }

    #[test]
    fn snapshot_default_ends_with_known_file_name() {
        let snapshot = SnapshotSettings::default();
        assert!(snapshot.resolve().ends_with("timer-snapshot.json"));
    }
}
