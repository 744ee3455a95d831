use crate::component::chunk_worker::ChunkResult;
use crate::component::clip_selector::{CoverageShortfall, Interval, SelectionMode};
use crate::component::stitcher::{ChunkGap, StitchOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    /// 已產生輸出，但部分 chunk 缺漏
    PartiallySucceeded,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "成功"),
            Self::PartiallySucceeded => write!(f, "部分成功"),
            Self::Failed => write!(f, "失敗"),
        }
    }
}

/// 一次執行的完整紀錄，寫入 run.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub source: PathBuf,
    pub total_duration: f64,
    pub mode: SelectionMode,
    pub seed: u64,
    pub intervals: Vec<Interval>,
    pub coverage_shortfall: Option<CoverageShortfall>,
    pub chunks: Vec<ChunkResult>,
    pub stitch: Option<StitchOutcome>,
    pub stitch_error: Option<String>,
    pub frame_paths: Vec<PathBuf>,
    pub status: RunStatus,
}

impl RunSummary {
    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        self.stitch.as_ref().map(|s| s.output_path.as_path())
    }

    #[must_use]
    pub fn selected_seconds(&self) -> f64 {
        self.intervals.iter().map(|i| i.length).sum()
    }

    /// 失敗或取消的 chunk 與原因，依 index 排序
    #[must_use]
    pub fn failed_chunks(&self) -> Vec<ChunkGap> {
        self.chunks
            .iter()
            .filter_map(|r| {
                r.gap_reason().map(|reason| ChunkGap {
                    index: r.index,
                    reason: reason.to_string(),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn status_for(chunks: &[ChunkResult], stitch: Option<&StitchOutcome>) -> RunStatus {
        match stitch {
            None => RunStatus::Failed,
            Some(_) if chunks.iter().any(|r| r.gap_reason().is_some()) => {
                RunStatus::PartiallySucceeded
            }
            Some(_) => RunStatus::Succeeded,
        }
    }
}
