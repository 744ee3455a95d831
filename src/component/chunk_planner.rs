//! 將影片時間軸切成固定長度的 chunk，並把選取的區段分配到各 chunk

use crate::component::clip_selector::{Interval, TIME_EPSILON};
use crate::error::{SummaryError, SummaryResult};
use serde::{Deserialize, Serialize};

/// 影片時間軸上的一段連續範圍，由單一 worker 處理
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    /// 已裁切到 chunk 邊界內的區段（絕對時間）
    pub intervals: Vec<Interval>,
}

impl Chunk {
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// 區段起點相對於 chunk 起點的位移
    #[must_use]
    pub fn offset_of(&self, interval: &Interval) -> f64 {
        (interval.start - self.start).max(0.0)
    }
}

/// 切分 `[0, total_duration)`
///
/// 最後一個 chunk 可能較短，且一定結束於 `total_duration`。跨越邊界的
/// 區段會被裁切成兩段，各自歸屬所在的 chunk。沒有區段的 chunk 也會保留，
/// 維持 index 連續。
pub fn plan(
    total_duration: f64,
    chunk_size: f64,
    intervals: &[Interval],
) -> SummaryResult<Vec<Chunk>> {
    if !chunk_size.is_finite() || chunk_size <= 0.0 {
        return Err(SummaryError::invalid(
            "chunk_size",
            format!("chunk 長度必須大於 0，目前為 {chunk_size}"),
        ));
    }
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(SummaryError::invalid(
            "total_duration",
            format!("影片長度必須大於 0，目前為 {total_duration}"),
        ));
    }

    let mut chunks = Vec::new();
    let mut cursor = 0;

    for index in 0_u32.. {
        let start = f64::from(index) * chunk_size;
        if total_duration - start <= TIME_EPSILON {
            break;
        }
        let mut end = (f64::from(index + 1) * chunk_size).min(total_duration);
        if total_duration - end <= TIME_EPSILON {
            end = total_duration;
        }

        // 區段已排序：跳過完全在此 chunk 之前的區段
        while cursor < intervals.len() && intervals[cursor].end() <= start + TIME_EPSILON {
            cursor += 1;
        }

        let assigned = intervals[cursor..]
            .iter()
            .take_while(|interval| interval.start < end - TIME_EPSILON)
            .filter_map(|interval| clip_to_range(interval, start, end))
            .collect();

        chunks.push(Chunk {
            index: index as usize,
            start,
            end,
            intervals: assigned,
        });
    }

    Ok(chunks)
}

fn clip_to_range(interval: &Interval, start: f64, end: f64) -> Option<Interval> {
    let clipped_start = interval.start.max(start);
    let clipped_end = interval.end().min(end);
    let length = clipped_end - clipped_start;

    (length > TIME_EPSILON).then(|| Interval::new(clipped_start, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_intervals(total: f64, every: f64, length: f64) -> Vec<Interval> {
        (0_i32..)
            .map(|i| f64::from(i) * every)
            .take_while(|start| start + length <= total)
            .map(|start| Interval::new(start, length))
            .collect()
    }

    #[test]
    fn test_concrete_scenario() {
        let intervals = fixed_intervals(100.0, 10.0, 1.0);
        let chunks = plan(100.0, 40.0, &intervals).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!((chunks[0].start, chunks[0].end), (0.0, 40.0));
        assert_eq!((chunks[1].start, chunks[1].end), (40.0, 80.0));
        assert_eq!((chunks[2].start, chunks[2].end), (80.0, 100.0));

        let starts = |chunk: &Chunk| chunk.intervals.iter().map(|i| i.start).collect::<Vec<_>>();
        assert_eq!(starts(&chunks[0]), vec![0.0, 10.0, 20.0, 30.0]);
        assert_eq!(starts(&chunks[1]), vec![40.0, 50.0, 60.0, 70.0]);
        assert_eq!(starts(&chunks[2]), vec![80.0, 90.0]);
    }

    #[test]
    fn test_chunks_partition_duration() {
        for &(total, size) in &[
            (100.0, 40.0),
            (0.7, 0.1),
            (59.97, 10.0),
            (5.0, 60.0),
            (90.0, 30.0),
        ] {
            let chunks = plan(total, size, &[]).unwrap();

            assert!((chunks[0].start).abs() < f64::EPSILON);
            assert!((chunks.last().unwrap().end - total).abs() < f64::EPSILON);
            for pair in chunks.windows(2) {
                assert!((pair[0].end - pair[1].start).abs() < f64::EPSILON);
            }
            for (i, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.index, i);
                assert!(chunk.duration() > 0.0);
                assert!(chunk.duration() <= size + 1e-9);
            }
        }
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_chunk() {
        let chunks = plan(90.0, 30.0, &[]).unwrap();
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_interval_crossing_boundary_is_split() {
        let intervals = vec![Interval::new(38.0, 4.0)];
        let chunks = plan(100.0, 40.0, &intervals).unwrap();

        assert_eq!(chunks[0].intervals, vec![Interval::new(38.0, 2.0)]);
        assert_eq!(chunks[1].intervals, vec![Interval::new(40.0, 2.0)]);
        assert!(chunks[2].is_empty());
    }

    #[test]
    fn test_empty_chunks_are_kept() {
        let intervals = vec![Interval::new(5.0, 1.0)];
        let chunks = plan(50.0, 10.0, &intervals).unwrap();

        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks.iter().filter(|c| !c.is_empty()).count(), 1);
    }

    #[test]
    fn test_offset_relative_to_chunk() {
        let chunks = plan(100.0, 40.0, &[Interval::new(55.0, 2.0)]).unwrap();
        let chunk = &chunks[1];
        assert!((chunk.offset_of(&chunk.intervals[0]) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_chunk_size() {
        assert!(plan(100.0, 0.0, &[]).is_err());
        assert!(plan(100.0, -1.0, &[]).is_err());
        assert!(plan(100.0, f64::NAN, &[]).is_err());
    }
}
