use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// 以縮排格式寫出 JSON
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("無法序列化 JSON")?;

    fs::write(path, content).with_context(|| format!("無法寫入 {}", path.display()))?;

    Ok(())
}
