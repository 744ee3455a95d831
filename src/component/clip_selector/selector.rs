use super::coverage::select_coverage;
use super::types::{Interval, Selection, SelectionMode, TIME_EPSILON};
use crate::error::{SummaryError, SummaryResult};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 依模式從影片總長度中選出要保留的區段
///
/// 回傳的區段依 `start` 排序且互不重疊。`seed` 相同時 random / coverage
/// 模式的結果完全相同；fixed 模式不使用亂數。
pub fn select(total_duration: f64, mode: &SelectionMode, seed: u64) -> SummaryResult<Selection> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(SummaryError::invalid(
            "total_duration",
            format!("影片長度必須大於 0，目前為 {total_duration}"),
        ));
    }
    mode.validate()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let selection = match *mode {
        SelectionMode::Fixed {
            interval,
            clip_duration,
        } => Selection {
            intervals: select_fixed(total_duration, interval, clip_duration),
            shortfall: None,
        },
        SelectionMode::Random {
            min_gap,
            max_gap,
            min_clip,
            max_clip,
        } => Selection {
            intervals: select_random(
                total_duration,
                (min_gap, max_gap),
                (min_clip, max_clip),
                &mut rng,
            ),
            shortfall: None,
        },
        SelectionMode::Coverage {
            target_percent,
            min_clip,
            max_clip,
        } => select_coverage(
            total_duration,
            target_percent,
            (min_clip, max_clip),
            &mut rng,
        ),
    };

    debug!(
        "{} 模式選取 {} 個區段，共 {:.2}s / {:.2}s",
        mode.name(),
        selection.intervals.len(),
        selection.total_length(),
        total_duration
    );

    Ok(selection)
}

/// 在 `[min, max]` 之間均勻取樣
pub(super) fn uniform(rng: &mut StdRng, (min, max): (f64, f64)) -> f64 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

fn select_fixed(total_duration: f64, interval: f64, clip_duration: f64) -> Vec<Interval> {
    let mut intervals = Vec::new();

    for step in 0_u32.. {
        let start = f64::from(step) * interval;
        if start + clip_duration > total_duration + TIME_EPSILON {
            break;
        }
        let length = clip_duration.min(total_duration - start);
        intervals.push(Interval::new(start, length));
    }

    intervals
}

fn select_random(
    total_duration: f64,
    gap_bounds: (f64, f64),
    clip_bounds: (f64, f64),
    rng: &mut StdRng,
) -> Vec<Interval> {
    let mut intervals = Vec::new();
    let mut cursor = 0.0;

    while cursor < total_duration {
        cursor += uniform(rng, gap_bounds);
        if cursor >= total_duration {
            break;
        }

        let length = uniform(rng, clip_bounds).min(total_duration - cursor);
        if length > TIME_EPSILON {
            intervals.push(Interval::new(cursor, length));
        }
        cursor += length;
    }

    intervals
}
