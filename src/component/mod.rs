//! 功能元件模組
//!
//! 每個子模組實現摘要流程中的一個階段

pub mod chunk_planner;
pub mod chunk_worker;
pub mod clip_selector;
pub mod parallel_executor;
pub mod stitcher;
pub mod summariser;

pub use chunk_planner::{Chunk, plan};
pub use chunk_worker::{ChunkResult, ChunkStatus, ChunkWorker};
pub use clip_selector::{Interval, Selection, SelectionMode, select};
pub use parallel_executor::ParallelExecutor;
pub use stitcher::{ChunkGap, StitchOutcome, Stitcher};
pub use summariser::{RunLayout, RunRequest, RunStatus, RunSummary, VideoSummariser, summarise};
