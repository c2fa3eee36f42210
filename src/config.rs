use serde::Deserialize;
use std::path::Path;
use validator::Validate;

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid config: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Main configuration for anim-loader
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// Database URL (SeaORM / SQLite)
    #[validate(length(min = 1))]
    pub database_url: String,

    /// Id of the picker control that `trigger_pick` looks up
    #[validate(length(min = 1))]
    pub control_id: String,

    /// Key holding the text of the last imported file
    #[validate(length(min = 1))]
    pub content_key: String,

    /// Key holding the load counter
    #[validate(length(min = 1))]
    pub counter_key: String,

    /// Whether the counter is reset to 0 when the importer starts
    pub reset_counter_on_start: bool,

    /// Files larger than this many bytes are rejected (at most 1 GiB)
    #[validate(range(min = 1, max = 1073741824))]
    pub max_file_size: u64,

    /// Log level (e.g., info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            control_id: "files".to_string(),
            content_key: "loaded_anim".to_string(),
            counter_key: "loaded_count".to_string(),
            reset_counter_on_start: true,
            max_file_size: 16 * 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads `~/.anim-loader/config` (if present) and `ANIM_LOADER__*` overrides.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let home = dirs::home_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ".".to_string());
        let source = config::File::with_name(&format!("{}/.anim-loader/config", home))
            .required(false);
        Self::build(source)
    }

    /// Same as [`Config::load`] but reads the given file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, ConfigLoadError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Config::default();
        let settings = config::Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("control_id", defaults.control_id)?
            .set_default("content_key", defaults.content_key)?
            .set_default("counter_key", defaults.counter_key)?
            .set_default("reset_counter_on_start", defaults.reset_counter_on_start)?
            .set_default("max_file_size", defaults.max_file_size)?
            .set_default("log_level", defaults.log_level)?
            .add_source(file)
            // Environment overrides: ANIM_LOADER__DATABASE_URL, ANIM_LOADER__COUNTER_KEY, etc.
            .add_source(config::Environment::with_prefix("ANIM_LOADER").separator("__"))
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }
}

fn default_database_url() -> String {
    match dirs::home_dir() {
        Some(home) => format!("sqlite://{}/.anim-loader/store.db", home.display()),
        None => "sqlite://anim-loader.db".to_string(),
    }
}
