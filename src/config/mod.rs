pub mod load;
pub mod save;
pub mod types;

pub use save::save_json;
pub use types::{
    AppConfig, DEFAULT_CONFIG_FILE, Defaults, Directories, LoggingSettings, RunSettings,
};
