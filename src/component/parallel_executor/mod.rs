//! 平行執行元件
//!
//! 以固定數量的 worker 處理所有 chunk，單一 chunk 失敗不影響其他 chunk

mod executor;

pub use executor::ParallelExecutor;
