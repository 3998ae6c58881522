use std::path::PathBuf;

/// Core configuration: where the data directory lives.
#[derive(Clone, Debug)]
pub struct Config {
    pub base_path: PathBuf,
}

impl Config {
    pub fn db_path(&self) -> PathBuf {
        self.base_path.join("quill.redb")
    }

    pub fn app_config_path(&self) -> PathBuf {
        super::AppConfig::path(&self.base_path)
    }
}
