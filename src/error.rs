//! 錯誤型別
//!
//! - `InvalidParameter`：參數錯誤，在任何處理開始前回報，屬於致命錯誤
//! - `MediaEngine`：外部 ffmpeg/ffprobe 失敗，僅影響單一 chunk
//! - `Stitch`：沒有任何 chunk 成功，或最終合併失敗

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("參數錯誤 `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error(transparent)]
    MediaEngine(#[from] MediaEngineError),

    #[error("合併影片失敗: {reason}")]
    Stitch { reason: String },

    #[error("無法建立 worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O 錯誤: {0}")]
    Io(#[from] std::io::Error),
}

impl SummaryError {
    #[must_use]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// 外部媒體引擎（ffmpeg / ffprobe）的失敗
#[derive(Debug, Error)]
pub enum MediaEngineError {
    #[error("無法執行 {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} 執行失敗 ({status}): {stderr}")]
    Failed {
        program: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("輸出檔案未建立: {}", path.display())]
    MissingOutput { path: PathBuf },

    #[error("無法解析 ffprobe 輸出: {0}")]
    Probe(String),

    #[error("I/O 錯誤: {0}")]
    Io(#[from] std::io::Error),
}

pub type SummaryResult<T> = Result<T, SummaryError>;
