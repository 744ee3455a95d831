use super::result::{ChunkResult, ChunkStatus};
use crate::component::chunk_planner::Chunk;
use crate::error::MediaEngineError;
use crate::tools::{ClipRequest, ConcatMethod, MediaEngine};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 處理單一 chunk：擷取每個區段、串接成一個檔案，並視需要擷取代表畫面
///
/// 中間檔案放在 `scratch_root/chunk_NNN/`，處理完即刪除；
/// chunk 輸出 `scratch_root/chunk_NNN.mp4` 與畫面檔留給呼叫端。
pub struct ChunkWorker<'a> {
    engine: &'a dyn MediaEngine,
    source: &'a Path,
    scratch_root: &'a Path,
    frame_dir: Option<&'a Path>,
}

impl<'a> ChunkWorker<'a> {
    #[must_use]
    pub fn new(engine: &'a dyn MediaEngine, source: &'a Path, scratch_root: &'a Path) -> Self {
        Self {
            engine,
            source,
            scratch_root,
            frame_dir: None,
        }
    }

    /// 啟用畫面擷取，畫面存放於 `frame_dir`
    #[must_use]
    pub fn with_frame_dir(mut self, frame_dir: &'a Path) -> Self {
        self.frame_dir = Some(frame_dir);
        self
    }

    #[must_use]
    pub fn chunk_output_path(&self, index: usize) -> PathBuf {
        self.scratch_root.join(format!("chunk_{index:03}.mp4"))
    }

    fn work_dir(&self, index: usize) -> PathBuf {
        self.scratch_root.join(format!("chunk_{index:03}"))
    }

    fn frame_path(frame_dir: &Path, chunk_index: usize, clip_index: usize) -> PathBuf {
        frame_dir.join(format!("frame_{chunk_index:03}_{clip_index:03}.jpg"))
    }

    pub fn process(&self, chunk: &Chunk) -> ChunkResult {
        if chunk.is_empty() {
            debug!("chunk {} 沒有區段，略過", chunk.index);
            return ChunkResult::new(chunk.index, ChunkStatus::Empty);
        }

        let work_dir = self.work_dir(chunk.index);
        let output_path = self.chunk_output_path(chunk.index);

        let outcome = self.process_stages(chunk, &work_dir, &output_path);

        if work_dir.exists()
            && let Err(e) = fs::remove_dir_all(&work_dir)
        {
            warn!("無法清理暫存目錄 {}: {e}", work_dir.display());
        }

        match outcome {
            Ok(frame_paths) => {
                info!(
                    "chunk {} ({:.2}s) 完成: {} 個區段 -> {}",
                    chunk.index,
                    chunk.duration(),
                    chunk.intervals.len(),
                    output_path.display()
                );
                ChunkResult::new(
                    chunk.index,
                    ChunkStatus::Success {
                        output_path,
                        frame_paths,
                    },
                )
            }
            Err(e) => {
                self.discard_outputs(chunk, &output_path);
                ChunkResult::failure(chunk.index, e.to_string())
            }
        }
    }

    fn process_stages(
        &self,
        chunk: &Chunk,
        work_dir: &Path,
        output_path: &Path,
    ) -> Result<Vec<PathBuf>, MediaEngineError> {
        fs::create_dir_all(work_dir)?;

        let mut clip_paths = Vec::with_capacity(chunk.intervals.len());
        for (clip_index, interval) in chunk.intervals.iter().enumerate() {
            let clip_path = work_dir.join(format!("clip_{clip_index:03}.mp4"));
            let request = ClipRequest {
                source: self.source,
                chunk_start: chunk.start,
                offset: chunk.offset_of(interval),
                length: interval.length,
                output: &clip_path,
            };

            debug!(
                "chunk {} 擷取區段 {clip_index}: {:.2}s + {:.2}s",
                chunk.index, interval.start, interval.length
            );
            self.engine.extract_clip(&request)?;
            clip_paths.push(clip_path);
        }

        let mut frame_paths = Vec::new();
        if let Some(frame_dir) = self.frame_dir {
            fs::create_dir_all(frame_dir)?;
            for (clip_index, (clip_path, interval)) in
                clip_paths.iter().zip(&chunk.intervals).enumerate()
            {
                let frame_path = Self::frame_path(frame_dir, chunk.index, clip_index);
                let timestamp = representative_offset(interval.length);
                self.engine
                    .extract_frame(clip_path, timestamp, &frame_path)?;
                frame_paths.push(frame_path);
            }
        }

        if let [single] = clip_paths.as_slice() {
            fs::rename(single, output_path)?;
        } else {
            // 同一 chunk 的區段以相同參數編碼，可直接串接
            self.engine
                .concat(&clip_paths, output_path, ConcatMethod::StreamCopy)?;
        }

        Ok(frame_paths)
    }

    /// 失敗時不留下任何部分輸出
    fn discard_outputs(&self, chunk: &Chunk, output_path: &Path) {
        let mut leftovers = vec![output_path.to_path_buf()];
        if let Some(frame_dir) = self.frame_dir {
            leftovers.extend(
                (0..chunk.intervals.len())
                    .map(|clip_index| Self::frame_path(frame_dir, chunk.index, clip_index)),
            );
        }

        for path in leftovers.iter().filter(|p| p.exists()) {
            if let Err(e) = fs::remove_file(path) {
                warn!("無法刪除失敗的輸出檔案 {}: {e}", path.display());
            }
        }
    }
}

/// 區段內的代表時間點
///
/// 選取區段內 35% 處，但盡量離邊界 0.5 秒。
#[must_use]
pub fn representative_offset(length: f64) -> f64 {
    (length * 0.35).max(0.5).min(length - 0.5).max(0.0)
}
