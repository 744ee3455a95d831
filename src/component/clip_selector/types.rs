use crate::error::{SummaryError, SummaryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 浮點時間比較容差（秒）
pub const TIME_EPSILON: f64 = 1e-9;

/// 被選入摘要的時間區段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub length: f64,
}

impl Interval {
    #[must_use]
    pub const fn new(start: f64, length: f64) -> Self {
        Self { start, length }
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.length
    }

    /// 兩區段是否重疊（首尾相接不算重疊）
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end() - TIME_EPSILON && other.start < self.end() - TIME_EPSILON
    }
}

/// 選取模式，每次執行只會有一種模式生效
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SelectionMode {
    /// 每隔 `interval` 秒擷取 `clip_duration` 秒
    Fixed { interval: f64, clip_duration: f64 },
    /// 隨機間隔、隨機長度
    Random {
        min_gap: f64,
        max_gap: f64,
        min_clip: f64,
        max_clip: f64,
    },
    /// 隨機放置片段直到達到目標覆蓋率
    Coverage {
        target_percent: f64,
        min_clip: f64,
        max_clip: f64,
    },
}

impl SelectionMode {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "fixed",
            Self::Random { .. } => "random",
            Self::Coverage { .. } => "coverage",
        }
    }

    pub fn validate(&self) -> SummaryResult<()> {
        match *self {
            Self::Fixed {
                interval,
                clip_duration,
            } => {
                require_positive("interval", interval)?;
                require_positive("clip_duration", clip_duration)?;
                if clip_duration > interval {
                    return Err(SummaryError::invalid(
                        "clip_duration",
                        format!("片段長度 {clip_duration} 大於間隔 {interval}，片段會重疊"),
                    ));
                }
                Ok(())
            }
            Self::Random {
                min_gap,
                max_gap,
                min_clip,
                max_clip,
            } => {
                require_positive("min_gap", min_gap)?;
                require_positive("max_gap", max_gap)?;
                require_ordered("min_gap", min_gap, max_gap)?;
                validate_clip_bounds(min_clip, max_clip)
            }
            Self::Coverage {
                target_percent,
                min_clip,
                max_clip,
            } => {
                if !target_percent.is_finite() || target_percent <= 0.0 || target_percent > 100.0 {
                    return Err(SummaryError::invalid(
                        "target_percent",
                        format!("覆蓋率必須介於 (0, 100]，目前為 {target_percent}"),
                    ));
                }
                validate_clip_bounds(min_clip, max_clip)
            }
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed {
                interval,
                clip_duration,
            } => write!(f, "fixed (每 {interval}s 擷取 {clip_duration}s)"),
            Self::Random {
                min_gap,
                max_gap,
                min_clip,
                max_clip,
            } => write!(
                f,
                "random (間隔 {min_gap}-{max_gap}s, 片段 {min_clip}-{max_clip}s)"
            ),
            Self::Coverage {
                target_percent,
                min_clip,
                max_clip,
            } => write!(
                f,
                "coverage ({target_percent}%, 片段 {min_clip}-{max_clip}s)"
            ),
        }
    }
}

fn require_positive(name: &'static str, value: f64) -> SummaryResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SummaryError::invalid(
            name,
            format!("必須為大於 0 的有限數值，目前為 {value}"),
        ))
    }
}

fn require_ordered(name: &'static str, min: f64, max: f64) -> SummaryResult<()> {
    if min > max {
        return Err(SummaryError::invalid(
            name,
            format!("最小值 {min} 大於最大值 {max}"),
        ));
    }
    Ok(())
}

fn validate_clip_bounds(min_clip: f64, max_clip: f64) -> SummaryResult<()> {
    require_positive("min_clip", min_clip)?;
    require_positive("max_clip", max_clip)?;
    require_ordered("min_clip", min_clip, max_clip)
}

/// 覆蓋率模式未達標時的提示（非致命）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageShortfall {
    pub target_seconds: f64,
    pub achieved_seconds: f64,
}

/// 選取結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub intervals: Vec<Interval>,
    pub shortfall: Option<CoverageShortfall>,
}

impl Selection {
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.intervals.iter().map(|i| i.length).sum()
    }
}
