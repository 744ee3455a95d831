use super::selector::uniform;
use super::types::{CoverageShortfall, Interval, Selection, TIME_EPSILON};
use log::warn;
use rand::Rng;
use rand::rngs::StdRng;

/// 單一片段放置失敗前的重抽次數
const PLACEMENT_RETRIES: usize = 64;
/// 連續放置失敗幾個片段後放棄
const MAX_CONSECUTIVE_FAILURES: usize = 32;
/// 總抽樣上限
const MAX_DRAWS: usize = 10_000;

/// 隨機放置互不重疊的片段，直到總長度達到 `target_percent`
///
/// 剩餘目標小於最短片段長度即視為達標；抽樣預算用盡時回傳目前結果，
/// 並以 `shortfall` 標示未達標。
pub(super) fn select_coverage(
    total_duration: f64,
    target_percent: f64,
    clip_bounds: (f64, f64),
    rng: &mut StdRng,
) -> Selection {
    let target = total_duration * target_percent / 100.0;
    let min_length = clip_bounds.0.min(total_duration);

    let mut placed: Vec<Interval> = Vec::new();
    let mut covered = 0.0;
    let mut draws = 0;
    let mut consecutive_failures = 0;

    let reached = loop {
        let remaining = target - covered;
        if remaining <= TIME_EPSILON
            || (remaining < min_length - TIME_EPSILON && !placed.is_empty())
        {
            break true;
        }
        if draws >= MAX_DRAWS || consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
            break false;
        }
        draws += 1;

        let drawn = uniform(rng, clip_bounds).min(total_duration);
        let length = if remaining >= min_length {
            drawn.min(remaining)
        } else {
            min_length
        };

        match find_free_slot(total_duration, length, &placed, rng) {
            Some((position, interval)) => {
                placed.insert(position, interval);
                covered += length;
                consecutive_failures = 0;
            }
            None => consecutive_failures += 1,
        }
    };

    let shortfall = if reached {
        None
    } else {
        warn!(
            "覆蓋率未達標: 目標 {target:.2}s，實際 {covered:.2}s（抽樣 {draws} 次）"
        );
        Some(CoverageShortfall {
            target_seconds: target,
            achieved_seconds: covered,
        })
    };

    Selection {
        intervals: placed,
        shortfall,
    }
}

/// 隨機抽一個起點，與既有片段重疊就重抽
///
/// `placed` 依起點排序且互不重疊，只需檢查插入位置前後兩個鄰居。
fn find_free_slot(
    total_duration: f64,
    length: f64,
    placed: &[Interval],
    rng: &mut StdRng,
) -> Option<(usize, Interval)> {
    let latest_start = (total_duration - length).max(0.0);

    for _ in 0..PLACEMENT_RETRIES {
        let start = if latest_start > 0.0 {
            rng.gen_range(0.0..=latest_start)
        } else {
            0.0
        };
        let candidate = Interval::new(start, length);
        let position = placed.partition_point(|p| p.start < start);

        let clashes_before = position > 0 && placed[position - 1].overlaps(&candidate);
        let clashes_after = placed
            .get(position)
            .is_some_and(|next| next.overlaps(&candidate));

        if !clashes_before && !clashes_after {
            return Some((position, candidate));
        }
    }

    None
}
