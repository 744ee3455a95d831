use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChunkStatus {
    Success {
        output_path: PathBuf,
        frame_paths: Vec<PathBuf>,
    },
    /// chunk 內沒有任何區段
    Empty,
    Failure {
        reason: String,
    },
    /// 收到中斷信號，chunk 尚未開始就被略過
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkResult {
    pub index: usize,
    #[serde(flatten)]
    pub status: ChunkStatus,
}

impl ChunkResult {
    #[must_use]
    pub const fn new(index: usize, status: ChunkStatus) -> Self {
        Self { index, status }
    }

    #[must_use]
    pub fn failure(index: usize, reason: impl Into<String>) -> Self {
        Self::new(
            index,
            ChunkStatus::Failure {
                reason: reason.into(),
            },
        )
    }

    #[must_use]
    pub const fn cancelled(index: usize) -> Self {
        Self::new(index, ChunkStatus::Cancelled)
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, ChunkStatus::Success { .. })
    }

    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        match &self.status {
            ChunkStatus::Success { output_path, .. } => Some(output_path),
            _ => None,
        }
    }

    #[must_use]
    pub fn frame_paths(&self) -> &[PathBuf] {
        match &self.status {
            ChunkStatus::Success { frame_paths, .. } => frame_paths,
            _ => &[],
        }
    }

    /// 會在最終影片中留下空缺的原因；成功或空 chunk 回傳 `None`
    #[must_use]
    pub fn gap_reason(&self) -> Option<&str> {
        match &self.status {
            ChunkStatus::Failure { reason } => Some(reason),
            ChunkStatus::Cancelled => Some("已取消"),
            ChunkStatus::Success { .. } | ChunkStatus::Empty => None,
        }
    }
}
