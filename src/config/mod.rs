use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use thiserror::Error;

use crate::style::{Style, DEFAULT_METHOD_STYLES, DEFAULT_STATUS_STYLES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("date format {0:?} cannot be rendered")]
    InvalidDateFormat(String),
}

/// Options accepted by the monitor. Every field has a fixed baseline, so a
/// partial config file (or none at all) yields a usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    // Detail blocks
    pub show_request_info: bool,
    pub show_response_info: bool,
    // Inline options
    pub date_format: String,
    pub show_response_time: bool,
    pub show_inline_payload: bool,
    pub show_inline_query: bool,
    pub show_inline_params: bool,
    pub show_inline_headers: bool,
    pub show_inline_response_code: bool,
    pub show_inline_response: bool,
    pub show_inline_response_error: bool,
    // Colors
    pub colors: ColorsConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            show_request_info: false,
            show_response_info: false,
            date_format: "%m/%d/%Y, %I:%M:%S".to_string(),
            show_response_time: true,
            show_inline_payload: true,
            show_inline_query: false,
            show_inline_params: false,
            show_inline_headers: false,
            show_inline_response_code: true,
            show_inline_response: false,
            show_inline_response_error: true,
            colors: ColorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// Method style table, keyed by lowercase method name.
    pub methods: HashMap<String, Style>,
    pub status_code: StatusStyles,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            methods: DEFAULT_METHOD_STYLES.clone(),
            status_code: DEFAULT_STATUS_STYLES.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusStyles {
    pub informational: Style,
    pub success: Style,
    pub redirection: Style,
    pub client_error: Style,
    pub server_error: Style,
}

impl Default for StatusStyles {
    fn default() -> Self {
        DEFAULT_STATUS_STYLES.clone()
    }
}

impl MonitorConfig {
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("MONITOR_CONFIG").unwrap_or_else(|_| "config/default.yaml".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("MONITOR"));

        let settings = builder.build()?;
        let config: MonitorConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects date format strings chrono cannot render. The formatter also
    /// falls back at render time, so a config that skips validation degrades
    /// output instead of failing requests.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut probe = String::new();
        if write!(probe, "{}", chrono::Utc::now().format(&self.date_format)).is_err() {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }
        Ok(())
    }
}
