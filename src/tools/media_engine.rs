use super::ffmpeg_command::ClipRequest;
use super::ffprobe_info::MediaInfo;
use crate::error::MediaEngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// 串接方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatMethod {
    /// 直接複製串流，所有輸入的編碼參數必須一致
    StreamCopy,
    /// 先正規化參數再重新編碼
    Reencode,
}

impl fmt::Display for ConcatMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StreamCopy => write!(f, "stream copy"),
            Self::Reencode => write!(f, "re-encode"),
        }
    }
}

/// 外部媒體引擎
///
/// 每個方法都會產生一個檔案，或回傳錯誤。實作必須可以在多個 worker
/// 執行緒間共用。
pub trait MediaEngine: Send + Sync {
    fn extract_clip(&self, request: &ClipRequest<'_>) -> Result<(), MediaEngineError>;

    fn concat(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        method: ConcatMethod,
    ) -> Result<(), MediaEngineError>;

    fn extract_frame(
        &self,
        source: &Path,
        timestamp: f64,
        output: &Path,
    ) -> Result<(), MediaEngineError>;

    fn probe(&self, path: &Path) -> Result<MediaInfo, MediaEngineError>;
}
