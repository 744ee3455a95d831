use crate::config::Directories;
use crate::tools::ensure_directory_exists;
use anyhow::Result;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 一次執行會用到的所有路徑
#[derive(Debug, Clone)]
pub struct RunLayout {
    pub run_id: String,
    pub run_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub output_path: PathBuf,
    pub frame_dir: PathBuf,
}

impl RunLayout {
    /// run id 為 `<檔名>-<uuid 前 8 碼>`
    #[must_use]
    pub fn new(directories: &Directories, source: &Path, output: Option<&Path>) -> Self {
        let stem = source
            .file_stem()
            .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().into_owned());
        let short_id: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        let run_id = format!("{stem}-{short_id}");

        let output_path = output.map_or_else(
            || directories.video_output.join(format!("{stem}_short.mp4")),
            Path::to_path_buf,
        );

        Self {
            run_dir: directories.logs.join(&run_id),
            scratch_dir: directories.temp.join(&run_id),
            frame_dir: directories.image_output.join(&stem),
            output_path,
            run_id,
        }
    }

    pub fn create(&self) -> Result<()> {
        ensure_directory_exists(&self.run_dir)?;
        ensure_directory_exists(&self.scratch_dir)?;
        Ok(())
    }

    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.run_dir.join("config.json")
    }

    #[must_use]
    pub fn summary_path(&self) -> PathBuf {
        self.run_dir.join("run.json")
    }

    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.run_dir.join("summariser.log")
    }

    pub fn remove_scratch(&self) {
        if self.scratch_dir.exists()
            && let Err(e) = fs::remove_dir_all(&self.scratch_dir)
        {
            warn!("無法刪除暫存目錄 {}: {e}", self.scratch_dir.display());
        }
    }
}
