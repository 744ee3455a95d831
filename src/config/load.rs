use crate::config::types::AppConfig;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

impl AppConfig {
    /// 讀取設定檔；檔案不存在時使用預設值
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("找不到設定檔 {}，使用預設值", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("無法讀取設定檔: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("無法解析設定檔: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "defaults": { "chunk_size": 30.0 }, "logging": { "level": "debug" } }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert!((config.defaults.chunk_size - 30.0).abs() < f64::EPSILON);
        assert!((config.defaults.interval - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.directories.temp, Path::new("temp"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(AppConfig::load(&path).is_err());
    }
}
