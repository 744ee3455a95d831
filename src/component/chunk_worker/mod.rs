//! Chunk worker 元件
//!
//! 對單一 chunk 呼叫 ffmpeg 擷取區段並串接為一個輸出檔

mod result;
mod worker;

pub use result::{ChunkResult, ChunkStatus};
pub use worker::{ChunkWorker, representative_offset};
