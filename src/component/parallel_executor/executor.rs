use crate::component::chunk_planner::Chunk;
use crate::component::chunk_worker::{ChunkResult, ChunkStatus};
use crate::error::SummaryResult;
use indicatif::ProgressBar;
use log::{info, warn};
use rayon::ThreadPoolBuilder;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

/// 固定大小的 worker pool
///
/// 每個 worker 同一時間只會等待一個 ffmpeg 子程序，因此同時存在的
/// 轉檔程序數不會超過 `worker_count`。
pub struct ParallelExecutor {
    worker_count: usize,
    retries: u32,
    shutdown_signal: Arc<AtomicBool>,
    progress: ProgressBar,
}

impl ParallelExecutor {
    #[must_use]
    pub fn new(worker_count: usize, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            worker_count: worker_count.max(1),
            retries: 0,
            shutdown_signal,
            progress: ProgressBar::hidden(),
        }
    }

    /// 失敗的 chunk 最多重試 `retries` 次
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// 平行處理所有 chunk，結果依 chunk index 排序
    ///
    /// 單一 chunk 失敗不會中止其他 chunk。收到中斷信號後，尚未開始的
    /// chunk 標記為 `Cancelled`，已開始的會執行完畢。
    pub fn run_all<F>(&self, chunks: &[Chunk], task: F) -> SummaryResult<Vec<ChunkResult>>
    where
        F: Fn(&Chunk) -> ChunkResult + Sync,
    {
        info!(
            "開始處理 {} 個 chunk，使用 {} 個 worker",
            chunks.len(),
            self.worker_count
        );

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.worker_count)
            .thread_name(|i| format!("chunk-worker-{i}"))
            .build()?;

        self.progress.set_length(chunks.len() as u64);
        let (sender, receiver) = mpsc::channel();
        let task = &task;

        pool.scope_fifo(|scope| {
            for chunk in chunks {
                let sender = sender.clone();
                scope.spawn_fifo(move |_| {
                    let result = self.run_chunk(chunk, task);
                    self.progress.inc(1);
                    // 接收端在 scope 結束前不會被釋放
                    let _ = sender.send(result);
                });
            }
        });
        drop(sender);

        let mut results: Vec<ChunkResult> = receiver.into_iter().collect();
        results.sort_by_key(|r| r.index);
        self.progress.finish_and_clear();

        Ok(results)
    }

    fn run_chunk<F>(&self, chunk: &Chunk, task: &F) -> ChunkResult
    where
        F: Fn(&Chunk) -> ChunkResult,
    {
        if self.is_shutdown() {
            return ChunkResult::cancelled(chunk.index);
        }

        let mut result = task(chunk);
        let mut attempt = 0;

        while let ChunkStatus::Failure { reason } = &result.status {
            if attempt >= self.retries || self.is_shutdown() {
                warn!("chunk {} 失敗: {reason}", chunk.index);
                break;
            }
            attempt += 1;
            warn!(
                "chunk {} 失敗，重試 {attempt}/{}: {reason}",
                chunk.index, self.retries
            );
            result = task(chunk);
        }

        result
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown_signal.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    fn chunks(count: usize) -> Vec<Chunk> {
        (0..count)
            .map(|index| Chunk {
                index,
                start: index as f64 * 10.0,
                end: (index + 1) as f64 * 10.0,
                intervals: vec![],
            })
            .collect()
    }

    fn success(index: usize) -> ChunkResult {
        ChunkResult::new(
            index,
            ChunkStatus::Success {
                output_path: PathBuf::from(format!("chunk_{index:03}.mp4")),
                frame_paths: vec![],
            },
        )
    }

    #[test]
    fn test_results_ordered_by_index() {
        let executor = ParallelExecutor::new(4, Arc::new(AtomicBool::new(false)));
        let input = chunks(8);

        // 後面的 chunk 先完成
        let results = executor
            .run_all(&input, |chunk| {
                thread::sleep(Duration::from_millis(((8 - chunk.index) * 5) as u64));
                success(chunk.index)
            })
            .unwrap();

        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_failure_does_not_abort_siblings() {
        let executor = ParallelExecutor::new(2, Arc::new(AtomicBool::new(false)));
        let results = executor
            .run_all(&chunks(5), |chunk| {
                if chunk.index == 2 {
                    ChunkResult::failure(chunk.index, "forced")
                } else {
                    success(chunk.index)
                }
            })
            .unwrap();

        assert_eq!(results.len(), 5);
        assert_eq!(results.iter().filter(|r| r.is_success()).count(), 4);
        assert!(matches!(results[2].status, ChunkStatus::Failure { .. }));
    }

    #[test]
    fn test_concurrency_bounded_by_worker_count() {
        let executor = ParallelExecutor::new(2, Arc::new(AtomicBool::new(false)));
        let running = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        executor
            .run_all(&chunks(10), |chunk| {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(10));
                running.fetch_sub(1, Ordering::SeqCst);
                success(chunk.index)
            })
            .unwrap();

        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_retries_failed_chunk() {
        let executor = ParallelExecutor::new(1, Arc::new(AtomicBool::new(false))).with_retries(2);
        let calls = AtomicUsize::new(0);

        let results = executor
            .run_all(&chunks(1), |chunk| {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    ChunkResult::failure(chunk.index, "flaky")
                } else {
                    success(chunk.index)
                }
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(results[0].is_success());
    }

    #[test]
    fn test_shutdown_cancels_pending_chunks() {
        let shutdown = Arc::new(AtomicBool::new(false));
        let executor = ParallelExecutor::new(1, Arc::clone(&shutdown));

        let results = executor
            .run_all(&chunks(4), |chunk| {
                if chunk.index == 1 {
                    shutdown.store(true, Ordering::SeqCst);
                }
                success(chunk.index)
            })
            .unwrap();

        assert!(results[0].is_success());
        assert!(results[1].is_success());
        assert_eq!(results[2].status, ChunkStatus::Cancelled);
        assert_eq!(results[3].status, ChunkStatus::Cancelled);
    }
}
