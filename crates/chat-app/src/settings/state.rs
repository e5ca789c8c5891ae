use std::path::{Path, PathBuf};

use compass_gateway::{DEFAULT_ENDPOINT, GatewayConfig};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};

pub const SETTINGS_DIRECTORY_NAME: &str = "compass";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const SETTINGS_ENV_PREFIX: &str = "COMPASS_";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppSettings {
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(&self.endpoint)
    }

    pub fn normalized(mut self) -> Self {
        self.endpoint = if self.endpoint.trim().is_empty() {
            default_endpoint()
        } else {
            self.endpoint.trim().to_string()
        };
        self.log_filter = if self.log_filter.trim().is_empty() {
            default_log_filter()
        } else {
            self.log_filter.trim().to_string()
        };
        self
    }
}

/// Layered settings: defaults, then the JSON file, then `COMPASS_*` variables.
pub struct SettingsStore {
    settings: AppSettings,
    config_path: PathBuf,
    load_error: Option<figment::Error>,
}

impl SettingsStore {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".compass"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn new(config_path: PathBuf) -> Self {
        let (settings, load_error) = match Self::load_from(&config_path) {
            Ok(settings) => (settings, None),
            Err(error) => (AppSettings::default(), Some(error)),
        };
        Self {
            settings,
            config_path,
            load_error,
        }
    }

    pub fn load() -> Self {
        Self::new(Self::default_config_path())
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Why the layered sources were rejected, when [`Self::settings`] fell back to defaults.
    pub fn load_error(&self) -> Option<&figment::Error> {
        self.load_error.as_ref()
    }

    fn load_from(path: &Path) -> Result<AppSettings, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(AppSettings::default()));
        if path.exists() {
            figment = figment.merge(Json::file(path));
        } else {
            tracing::info!("settings file not found at {:?}, using defaults", path);
        }
        figment = figment.merge(Env::prefixed(SETTINGS_ENV_PREFIX));

        figment
            .extract::<AppSettings>()
            .map(AppSettings::normalized)
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
