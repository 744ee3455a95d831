use crate::component::clip_selector::SelectionMode;
use crate::component::summariser::RunRequest;
use crate::config::{DEFAULT_CONFIG_FILE, Defaults};
use clap::{ArgGroup, Parser};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Fixed,
    Random,
    Coverage,
}

impl ModeKind {
    pub const ALL: [Self; 3] = [Self::Fixed, Self::Random, Self::Coverage];
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "固定間隔"),
            Self::Random => write!(f, "隨機間隔"),
            Self::Coverage => write!(f, "目標覆蓋率"),
        }
    }
}

/// 從長影片擷取片段並合併成一支短片
#[derive(Parser, Debug)]
#[command(name = "video_summariser", version, about)]
#[command(group(ArgGroup::new("mode").args(["fixed", "random", "coverage"])))]
pub struct Cli {
    /// 輸入影片；省略時以互動方式詢問
    pub input: Option<PathBuf>,

    /// 每隔 --interval 秒擷取一段
    #[arg(long)]
    pub fixed: bool,

    /// 隨機間隔與片段長度
    #[arg(long)]
    pub random: bool,

    /// 隨機放置片段直到覆蓋影片的 PERCENT%
    #[arg(long, value_name = "PERCENT")]
    pub coverage: Option<f64>,

    /// 片段起點間隔秒數（fixed）
    #[arg(long)]
    pub interval: Option<f64>,

    /// 片段長度秒數（fixed）
    #[arg(long)]
    pub duration: Option<f64>,

    #[arg(long)]
    pub min_gap: Option<f64>,

    #[arg(long)]
    pub max_gap: Option<f64>,

    #[arg(long)]
    pub min_clip: Option<f64>,

    #[arg(long)]
    pub max_clip: Option<f64>,

    /// 每個 chunk 的長度（秒）
    #[arg(long)]
    pub chunk_size: Option<f64>,

    /// worker 數量，預設為 CPU 數量
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// 亂數種子，相同種子得到相同選取結果
    #[arg(long)]
    pub seed: Option<u64>,

    /// 失敗 chunk 的重試次數
    #[arg(long)]
    pub retries: Option<u32>,

    /// 每個片段另存一張畫面
    #[arg(long)]
    pub save_images: bool,

    /// 輸出路徑，預設為 <video_output>/<檔名>_short.mp4
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 執行後保留暫存目錄
    #[arg(long)]
    pub keep_temp: bool,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

impl Cli {
    /// 命令列指定的模式；未指定時回傳 `None`
    #[must_use]
    pub const fn mode_kind(&self) -> Option<ModeKind> {
        if self.fixed {
            Some(ModeKind::Fixed)
        } else if self.random {
            Some(ModeKind::Random)
        } else if self.coverage.is_some() {
            Some(ModeKind::Coverage)
        } else {
            None
        }
    }

    /// 以命令列參數覆蓋設定檔預設值
    #[must_use]
    pub fn selection_mode(&self, kind: ModeKind, defaults: &Defaults) -> SelectionMode {
        let min_clip = self.min_clip.unwrap_or(defaults.min_clip);
        let max_clip = self.max_clip.unwrap_or(defaults.max_clip);

        match kind {
            ModeKind::Fixed => SelectionMode::Fixed {
                interval: self.interval.unwrap_or(defaults.interval),
                clip_duration: self.duration.unwrap_or(defaults.duration),
            },
            ModeKind::Random => SelectionMode::Random {
                min_gap: self.min_gap.unwrap_or(defaults.min_gap),
                max_gap: self.max_gap.unwrap_or(defaults.max_gap),
                min_clip,
                max_clip,
            },
            ModeKind::Coverage => SelectionMode::Coverage {
                target_percent: self.coverage.unwrap_or(defaults.coverage_percent),
                min_clip,
                max_clip,
            },
        }
    }

    #[must_use]
    pub fn into_request(self, input: PathBuf, kind: ModeKind, defaults: &Defaults) -> RunRequest {
        RunRequest {
            input,
            mode: self.selection_mode(kind, defaults),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            save_images: self.save_images || defaults.save_images,
            workers: self.workers,
            seed: self.seed,
            retries: self.retries.unwrap_or(defaults.chunk_retries),
            output: self.output,
            keep_temp: self.keep_temp,
        }
    }
}
