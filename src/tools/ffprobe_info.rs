use crate::error::MediaEngineError;
use serde::{Deserialize, Serialize};

/// ffprobe 取得的媒體資訊
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub duration_seconds: f64,
    pub video: Option<VideoStreamInfo>,
    pub audio: Option<AudioStreamInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStreamInfo {
    pub codec_name: String,
    pub width: u32,
    pub height: u32,
    pub pix_fmt: Option<String>,
    /// 原始幀率字串，例如 "30000/1001"
    pub frame_rate: String,
}

impl VideoStreamInfo {
    #[must_use]
    pub fn fps(&self) -> Option<f64> {
        parse_frame_rate(&self.frame_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioStreamInfo {
    pub codec_name: String,
    pub sample_rate: u32,
    pub channels: u32,
}

/// 判斷能否直接以 stream copy 串接的參數組合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSignature {
    pub video: Option<VideoStreamInfo>,
    pub audio: Option<AudioStreamInfo>,
}

impl MediaInfo {
    #[must_use]
    pub fn signature(&self) -> StreamSignature {
        StreamSignature {
            video: self.video.clone(),
            audio: self.audio.clone(),
        }
    }
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    pix_fmt: Option<String>,
    r_frame_rate: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
    duration: Option<String>,
}

/// 解析 `ffprobe -print_format json -show_format -show_streams` 的輸出
pub fn parse_probe_output(json: &str) -> Result<MediaInfo, MediaEngineError> {
    let probe: FfprobeOutput =
        serde_json::from_str(json).map_err(|e| MediaEngineError::Probe(e.to_string()))?;
    let streams = probe.streams.unwrap_or_default();

    let video_stream = streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let audio_stream = streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    // 影片長度優先從 format 取得，其次從 stream
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or_else(|| video_stream.and_then(|s| s.duration.as_ref()))
        .or_else(|| audio_stream.and_then(|s| s.duration.as_ref()))
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| MediaEngineError::Probe("無法取得影片長度".to_string()))?;

    let video = video_stream.and_then(|s| {
        Some(VideoStreamInfo {
            codec_name: s.codec_name.clone()?,
            width: s.width?,
            height: s.height?,
            pix_fmt: s.pix_fmt.clone(),
            frame_rate: s.r_frame_rate.clone().unwrap_or_else(|| "30/1".to_string()),
        })
    });

    let audio = audio_stream.and_then(|s| {
        Some(AudioStreamInfo {
            codec_name: s.codec_name.clone()?,
            sample_rate: s.sample_rate.as_deref()?.parse().ok()?,
            channels: s.channels.unwrap_or(2),
        })
    });

    Ok(MediaInfo {
        duration_seconds,
        video,
        audio,
    })
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}
