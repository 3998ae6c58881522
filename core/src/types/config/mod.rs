mod app;
mod core;

pub use app::{AppConfig, AppConfigError, GeneralConfig, SessionConfig, StorageConfig, Theme};
pub use self::core::Config;
