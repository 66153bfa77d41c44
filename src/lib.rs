pub mod config;
pub mod format;
pub mod monitor;
pub mod style;

pub use config::{ColorsConfig, ConfigError, MonitorConfig, StatusStyles};
pub use monitor::{ConsoleMonitor, RequestSnapshot, ResponseSnapshot};
pub use style::{style_for_method, style_for_status, Style};
