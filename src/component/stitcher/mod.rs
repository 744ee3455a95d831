//! 合併元件
//!
//! 依 chunk 順序把成功的 chunk 輸出接成最終影片

mod stitcher;

pub use stitcher::{ChunkGap, StitchOutcome, Stitcher};
