use crate::component::chunk_worker::ChunkResult;
use crate::error::{SummaryError, SummaryResult};
use crate::tools::{ConcatMethod, MediaEngine};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 最終影片中缺少的 chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkGap {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StitchOutcome {
    pub output_path: PathBuf,
    pub method: ConcatMethod,
    /// 實際被合併的 chunk，依 index 排序
    pub joined: Vec<usize>,
    pub gaps: Vec<ChunkGap>,
}

pub struct Stitcher<'a> {
    engine: &'a dyn MediaEngine,
}

impl<'a> Stitcher<'a> {
    #[must_use]
    pub fn new(engine: &'a dyn MediaEngine) -> Self {
        Self { engine }
    }

    /// 合併所有成功的 chunk
    ///
    /// 失敗或取消的 chunk 記錄為空缺；完全沒有成功的 chunk 時回傳 `Stitch` 錯誤。
    pub fn stitch(&self, results: &[ChunkResult], output: &Path) -> SummaryResult<StitchOutcome> {
        let mut ordered: Vec<&ChunkResult> = results.iter().collect();
        ordered.sort_by_key(|r| r.index);

        let mut inputs = Vec::new();
        let mut joined = Vec::new();
        let mut gaps = Vec::new();

        for result in ordered {
            if let Some(path) = result.output_path() {
                inputs.push(path.to_path_buf());
                joined.push(result.index);
            } else if let Some(reason) = result.gap_reason() {
                warn!("chunk {} 不會出現在輸出中: {reason}", result.index);
                gaps.push(ChunkGap {
                    index: result.index,
                    reason: reason.to_string(),
                });
            }
        }

        if inputs.is_empty() {
            return Err(SummaryError::Stitch {
                reason: "沒有任何成功的 chunk 可以合併".to_string(),
            });
        }

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let method = if let [single] = inputs.as_slice() {
            fs::copy(single, output)?;
            ConcatMethod::StreamCopy
        } else {
            self.concat(&inputs, output)?
        };

        info!(
            "合併完成 ({method}): {} 個 chunk -> {}",
            joined.len(),
            output.display()
        );

        Ok(StitchOutcome {
            output_path: output.to_path_buf(),
            method,
            joined,
            gaps,
        })
    }

    fn concat(&self, inputs: &[PathBuf], output: &Path) -> SummaryResult<ConcatMethod> {
        if self.signatures_match(inputs) {
            match self.engine.concat(inputs, output, ConcatMethod::StreamCopy) {
                Ok(()) => return Ok(ConcatMethod::StreamCopy),
                Err(e) => warn!("stream copy 合併失敗，改為重新編碼: {e}"),
            }
        } else {
            info!("chunk 編碼參數不一致，改為重新編碼");
        }

        self.engine
            .concat(inputs, output, ConcatMethod::Reencode)
            .map_err(|e| SummaryError::Stitch {
                reason: e.to_string(),
            })?;
        Ok(ConcatMethod::Reencode)
    }

    /// 無法 probe 的輸入一律視為不一致
    fn signatures_match(&self, inputs: &[PathBuf]) -> bool {
        let mut signatures = Vec::with_capacity(inputs.len());
        for input in inputs {
            match self.engine.probe(input) {
                Ok(info) => signatures.push(info.signature()),
                Err(e) => {
                    warn!("無法讀取 {} 的編碼參數: {e}", input.display());
                    return false;
                }
            }
        }
        signatures.windows(2).all(|pair| pair[0] == pair[1])
    }
}
