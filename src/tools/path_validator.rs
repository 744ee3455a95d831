use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn validate_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("輸入檔案不存在: {}", path.display());
    }
    if !path.is_file() {
        bail!("輸入路徑不是檔案: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("video.mp4");

        assert!(validate_input_file(&file).is_err());
        std::fs::write(&file, b"x").unwrap();
        assert!(validate_input_file(&file).is_ok());
        assert!(validate_input_file(dir.path()).is_err());
    }

    #[test]
    fn test_ensure_directory_exists_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_directory_exists(&nested).unwrap();
    }
}
