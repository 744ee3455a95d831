use crate::component::clip_selector::SelectionMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub directories: Directories,
    pub defaults: Defaults,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Directories {
    pub logs: PathBuf,
    pub video_output: PathBuf,
    pub image_output: PathBuf,
    pub temp: PathBuf,
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            logs: PathBuf::from("logs"),
            video_output: PathBuf::from("output/videos"),
            image_output: PathBuf::from("output/images"),
            temp: PathBuf::from("temp"),
        }
    }
}

/// 命令列未指定時使用的參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub interval: f64,
    pub duration: f64,
    pub min_gap: f64,
    pub max_gap: f64,
    pub min_clip: f64,
    pub max_clip: f64,
    pub coverage_percent: f64,
    pub chunk_size: f64,
    pub save_images: bool,
    pub chunk_retries: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            interval: 10.0,
            duration: 1.0,
            min_gap: 5.0,
            max_gap: 15.0,
            min_clip: 1.0,
            max_clip: 3.0,
            coverage_percent: 20.0,
            chunk_size: 60.0,
            save_images: false,
            chunk_retries: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 單次執行的有效設定，執行期間不會改變
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    #[serde(flatten)]
    pub mode: SelectionMode,
    pub chunk_size: f64,
    pub save_images: bool,
    pub worker_count: usize,
    pub chunk_retries: u32,
    pub seed: u64,
}
