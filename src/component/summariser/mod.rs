//! 影片摘要元件
//!
//! 串起片段選取、chunk 切分、平行擷取與最終合併

mod layout;
mod main;
mod pipeline;
mod report;

pub use layout::RunLayout;
pub use main::{RunRequest, VideoSummariser};
pub use pipeline::{SummaryRequest, summarise};
pub use report::{RunStatus, RunSummary};
