//! 片段選取元件
//!
//! 三種以時間為基礎的選取模式：
//! - fixed：固定間隔
//! - random：隨機間隔與長度
//! - coverage：隨機放置直到達到目標覆蓋率

mod coverage;
mod selector;
mod types;

pub use selector::select;
pub use types::{CoverageShortfall, Interval, Selection, SelectionMode, TIME_EPSILON};
