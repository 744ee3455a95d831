use super::layout::RunLayout;
use super::pipeline::{SummaryRequest, summarise};
use super::report::{RunStatus, RunSummary};
use crate::component::clip_selector::SelectionMode;
use crate::component::parallel_executor::ParallelExecutor;
use crate::config::{RunSettings, save_json};
use crate::tools::{CpuBudget, FfmpegEngine, MediaEngine, validate_input_file};
use anyhow::{Context, Result, bail};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// 命令列或互動選單整理出的執行請求
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input: PathBuf,
    pub mode: SelectionMode,
    pub chunk_size: f64,
    pub save_images: bool,
    pub workers: Option<usize>,
    pub seed: Option<u64>,
    pub retries: u32,
    pub output: Option<PathBuf>,
    pub keep_temp: bool,
}

pub struct VideoSummariser {
    engine: FfmpegEngine,
    shutdown_signal: Arc<AtomicBool>,
}

impl VideoSummariser {
    #[must_use]
    pub fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            engine: FfmpegEngine::new(),
            shutdown_signal,
        }
    }

    pub fn run(&self, request: &RunRequest, layout: &RunLayout) -> Result<RunSummary> {
        println!("{}", style("=== 影片摘要 ===").cyan().bold());

        validate_input_file(&request.input)?;
        if !self.engine.is_available() {
            bail!("找不到 ffmpeg 或 ffprobe，請確認已安裝並加入 PATH");
        }

        let media = self
            .engine
            .probe(&request.input)
            .with_context(|| format!("無法讀取影片資訊: {}", request.input.display()))?;
        info!(
            "輸入 {} 長度 {:.2} 秒",
            request.input.display(),
            media.duration_seconds
        );

        let cpu_budget = CpuBudget::detect();
        let worker_count = cpu_budget.worker_count(request.workers);
        info!("偵測到 {} 個 CPU，使用 {worker_count} 個 worker", cpu_budget.cpu_count());
        let settings = RunSettings {
            mode: request.mode,
            chunk_size: request.chunk_size,
            save_images: request.save_images,
            worker_count,
            chunk_retries: request.retries,
            seed: request.seed.unwrap_or_else(seed_from_clock),
        };
        save_json(&settings, &layout.settings_path())?;

        println!(
            "{}",
            style(format!(
                "模式: {}，seed: {}，使用 {} 個 worker",
                settings.mode, settings.seed, settings.worker_count
            ))
            .dim()
        );

        let progress_bar = ProgressBar::new(0);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
                .progress_chars("#>-"),
        );
        progress_bar.set_message("處理 chunk 中...");

        let executor =
            ParallelExecutor::new(settings.worker_count, Arc::clone(&self.shutdown_signal))
                .with_retries(settings.chunk_retries)
                .with_progress(progress_bar);

        let summary_request = SummaryRequest {
            source: &request.input,
            total_duration: media.duration_seconds,
            settings: &settings,
            scratch_dir: &layout.scratch_dir,
            output_path: &layout.output_path,
            frame_dir: &layout.frame_dir,
        };
        let outcome = summarise(&self.engine, &summary_request, &executor);

        if request.keep_temp {
            info!("保留暫存目錄: {}", layout.scratch_dir.display());
        } else {
            layout.remove_scratch();
        }

        let summary = outcome.context("摘要執行失敗")?;
        save_json(&summary, &layout.summary_path())?;

        if self.shutdown_signal.load(Ordering::SeqCst) {
            warn!("執行被中斷，輸出只包含已完成的 chunk");
        }

        self.print_summary(&summary, layout);

        if summary.status == RunStatus::Failed {
            let reason = summary.stitch_error.as_deref().unwrap_or("未知錯誤");
            error!("摘要失敗: {reason}");
            bail!("摘要失敗: {reason}");
        }

        Ok(summary)
    }

    fn print_summary(&self, summary: &RunSummary, layout: &RunLayout) {
        let succeeded = summary.chunks.iter().filter(|r| r.is_success()).count();
        let failed = summary.failed_chunks();

        println!();
        println!("{}", style("=== 摘要結果 ===").cyan().bold());
        println!(
            "  片段: {} 個，共 {:.2} 秒 / {:.2} 秒",
            summary.intervals.len(),
            summary.selected_seconds(),
            summary.total_duration
        );
        if let Some(shortfall) = summary.coverage_shortfall {
            println!(
                "  {}",
                style(format!(
                    "覆蓋率未達標: 目標 {:.2} 秒，實際 {:.2} 秒",
                    shortfall.target_seconds, shortfall.achieved_seconds
                ))
                .yellow()
            );
        }
        println!("  chunk: {} 個", summary.chunks.len());
        println!("  成功: {} 個", style(succeeded).green());
        if !failed.is_empty() {
            println!("  失敗: {} 個", style(failed.len()).red());
            for gap in &failed {
                println!("    chunk {}: {}", gap.index, style(&gap.reason).dim());
            }
        }
        if let Some(stitch) = &summary.stitch {
            println!(
                "  輸出: {} ({})",
                style(stitch.output_path.display()).green(),
                stitch.method
            );
        }
        if !summary.frame_paths.is_empty() {
            println!(
                "  畫面: {} 張 -> {}",
                summary.frame_paths.len(),
                layout.frame_dir.display()
            );
        }
        println!("  紀錄: {}", layout.run_dir.display());
        println!("  狀態: {}", summary.status);

        info!(
            "摘要完成 - 狀態: {}, 成功: {succeeded}, 失敗: {}",
            summary.status,
            failed.len()
        );
    }
}

/// 未指定 seed 時以目前時間產生，並記錄於 run.json 以便重現
fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs() ^ u64::from(d.subsec_nanos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Directories;

    #[test]
    fn test_missing_input_fails_before_processing() {
        let root = tempfile::tempdir().unwrap();
        let directories = Directories {
            logs: root.path().join("logs"),
            video_output: root.path().join("videos"),
            image_output: root.path().join("images"),
            temp: root.path().join("temp"),
        };
        let input = root.path().join("missing.mp4");
        let layout = RunLayout::new(&directories, &input, None);
        layout.create().unwrap();

        let request = RunRequest {
            input,
            mode: SelectionMode::Fixed {
                interval: 10.0,
                clip_duration: 1.0,
            },
            chunk_size: 60.0,
            save_images: false,
            workers: None,
            seed: Some(1),
            retries: 0,
            output: None,
            keep_temp: false,
        };

        let summariser = VideoSummariser::new(Arc::new(AtomicBool::new(false)));
        assert!(summariser.run(&request, &layout).is_err());
        assert!(!layout.summary_path().exists());
    }
}
