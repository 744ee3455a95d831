use super::report::RunSummary;
use crate::component::chunk_planner::plan;
use crate::component::chunk_worker::ChunkWorker;
use crate::component::clip_selector::select;
use crate::component::parallel_executor::ParallelExecutor;
use crate::component::stitcher::Stitcher;
use crate::config::RunSettings;
use crate::error::{SummaryError, SummaryResult};
use crate::tools::MediaEngine;
use log::{error, info};
use std::fs;
use std::path::{Path, PathBuf};

/// 一次摘要所需的輸入與輸出位置
pub struct SummaryRequest<'a> {
    pub source: &'a Path,
    pub total_duration: f64,
    pub settings: &'a RunSettings,
    pub scratch_dir: &'a Path,
    pub output_path: &'a Path,
    /// 僅在 `settings.save_images` 時使用
    pub frame_dir: &'a Path,
}

/// 選取、切分、平行處理、合併
///
/// 參數錯誤在任何 ffmpeg 呼叫前回傳 `Err`。開始處理後，chunk 失敗與
/// 合併失敗都記錄在回傳的 `RunSummary` 中。
pub fn summarise(
    engine: &dyn MediaEngine,
    request: &SummaryRequest<'_>,
    executor: &ParallelExecutor,
) -> SummaryResult<RunSummary> {
    let settings = request.settings;

    let selection = select(request.total_duration, &settings.mode, settings.seed)?;
    if selection.intervals.is_empty() {
        return Err(SummaryError::invalid(
            "mode",
            format!(
                "{} 模式在 {:.2} 秒的影片中沒有選出任何片段",
                settings.mode.name(),
                request.total_duration
            ),
        ));
    }
    info!(
        "選取 {} 個片段，共 {:.2} 秒",
        selection.intervals.len(),
        selection.total_length()
    );

    let chunks = plan(request.total_duration, settings.chunk_size, &selection.intervals)?;
    fs::create_dir_all(request.scratch_dir)?;

    let mut worker = ChunkWorker::new(engine, request.source, request.scratch_dir);
    if settings.save_images {
        worker = worker.with_frame_dir(request.frame_dir);
    }

    let results = executor.run_all(&chunks, |chunk| worker.process(chunk))?;

    let (stitch, stitch_error) = match Stitcher::new(engine).stitch(&results, request.output_path)
    {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => {
            error!("{e}");
            (None, Some(e.to_string()))
        }
    };

    let frame_paths: Vec<PathBuf> = results
        .iter()
        .flat_map(|r| r.frame_paths().iter().cloned())
        .collect();
    let status = RunSummary::status_for(&results, stitch.as_ref());

    Ok(RunSummary {
        source: request.source.to_path_buf(),
        total_duration: request.total_duration,
        mode: settings.mode,
        seed: settings.seed,
        intervals: selection.intervals,
        coverage_shortfall: selection.shortfall,
        chunks: results,
        stitch,
        stitch_error,
        frame_paths,
        status,
    })
}
