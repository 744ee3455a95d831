use super::ffmpeg_command::{ClipRequest, FfmpegCommand, ReencodeTarget, concat_manifest};
use super::ffprobe_info::{MediaInfo, parse_probe_output};
use super::media_engine::{ConcatMethod, MediaEngine};
use crate::error::MediaEngineError;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// 透過 ffmpeg / ffprobe 執行檔實作的媒體引擎
pub struct FfmpegEngine {
    ffmpeg: FfmpegCommand,
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl FfmpegEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_binaries("ffmpeg", "ffprobe")
    }

    #[must_use]
    pub fn with_binaries(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        let ffmpeg_path = ffmpeg.into();
        Self {
            ffmpeg: FfmpegCommand::new(ffmpeg_path.clone()),
            ffmpeg_path,
            ffprobe_path: ffprobe.into(),
        }
    }

    /// 確認 ffmpeg 與 ffprobe 都能執行
    #[must_use]
    pub fn is_available(&self) -> bool {
        [&self.ffmpeg_path, &self.ffprobe_path].iter().all(|program| {
            Command::new(program)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .is_ok_and(|status| status.success())
        })
    }

    fn reencode_target(&self, inputs: &[PathBuf]) -> ReencodeTarget {
        let infos: Vec<MediaInfo> = inputs
            .iter()
            .filter_map(|input| match self.probe(input) {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!("無法讀取 {} 的串流資訊: {e}", input.display());
                    None
                }
            })
            .collect();

        reencode_target_for(&infos, inputs.len())
    }
}

/// 以第一個影像串流決定重新編碼規格；幀率無效時使用預設值
fn reencode_target_for(infos: &[MediaInfo], input_count: usize) -> ReencodeTarget {
    let mut target = ReencodeTarget {
        with_audio: infos.len() == input_count && infos.iter().all(|i| i.audio.is_some()),
        ..ReencodeTarget::default()
    };
    if let Some(video) = infos.iter().find_map(|i| i.video.as_ref()) {
        // libx264 + yuv420p 需要偶數尺寸
        target.width = video.width.max(2) & !1;
        target.height = video.height.max(2) & !1;
        match video.fps() {
            Some(fps) if fps > 0.0 => {
                debug!("重新編碼規格: {}x{} @ {fps:.3} fps", target.width, target.height);
                target.frame_rate.clone_from(&video.frame_rate);
            }
            _ => warn!("無效的幀率 {}，改用 {}", video.frame_rate, target.frame_rate),
        }
    }
    target
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaEngine for FfmpegEngine {
    fn extract_clip(&self, request: &ClipRequest<'_>) -> Result<(), MediaEngineError> {
        run("ffmpeg", self.ffmpeg.extract_clip(request))?;
        ensure_output(request.output)
    }

    fn concat(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        method: ConcatMethod,
    ) -> Result<(), MediaEngineError> {
        match method {
            ConcatMethod::StreamCopy => {
                let manifest = output.with_extension("concat.txt");
                fs::write(&manifest, concat_manifest(inputs)?)?;
                let result = run("ffmpeg", self.ffmpeg.concat_copy(&manifest, output));
                if let Err(e) = fs::remove_file(&manifest) {
                    warn!("無法刪除串接清單 {}: {e}", manifest.display());
                }
                result?;
            }
            ConcatMethod::Reencode => {
                let target = self.reencode_target(inputs);
                run("ffmpeg", self.ffmpeg.concat_reencode(inputs, output, &target))?;
            }
        }
        ensure_output(output)
    }

    fn extract_frame(
        &self,
        source: &Path,
        timestamp: f64,
        output: &Path,
    ) -> Result<(), MediaEngineError> {
        run("ffmpeg", self.ffmpeg.extract_frame(source, timestamp, output))?;
        ensure_output(output)
    }

    fn probe(&self, path: &Path) -> Result<MediaInfo, MediaEngineError> {
        let mut cmd = Command::new(&self.ffprobe_path);
        cmd.args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path);

        let output = run("ffprobe", cmd)?;
        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

fn run(program: &'static str, mut command: Command) -> Result<Output, MediaEngineError> {
    debug!("執行 {command:?}");

    let output = command
        .stdin(Stdio::null())
        .output()
        .map_err(|source| MediaEngineError::Spawn { program, source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(MediaEngineError::Failed {
            program,
            status: output.status,
            stderr,
        });
    }

    Ok(output)
}

fn ensure_output(path: &Path) -> Result<(), MediaEngineError> {
    let valid = fs::metadata(path).is_ok_and(|m| m.len() > 0);
    if valid {
        Ok(())
    } else {
        Err(MediaEngineError::MissingOutput {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{AudioStreamInfo, VideoStreamInfo};

    #[test]
    fn test_missing_binary_reports_spawn_error() {
        let engine = FfmpegEngine::with_binaries(
            "/nonexistent/ffmpeg-binary",
            "/nonexistent/ffprobe-binary",
        );
        assert!(!engine.is_available());

        let result = engine.probe(Path::new("video.mp4"));
        assert!(matches!(
            result,
            Err(MediaEngineError::Spawn {
                program: "ffprobe",
                ..
            })
        ));
    }

    fn media(frame_rate: &str, with_audio: bool) -> MediaInfo {
        MediaInfo {
            duration_seconds: 5.0,
            video: Some(VideoStreamInfo {
                codec_name: "h264".to_string(),
                width: 1919,
                height: 1080,
                pix_fmt: Some("yuv420p".to_string()),
                frame_rate: frame_rate.to_string(),
            }),
            audio: with_audio.then(|| AudioStreamInfo {
                codec_name: "aac".to_string(),
                sample_rate: 48_000,
                channels: 2,
            }),
        }
    }

    #[test]
    fn test_reencode_target_follows_first_video() {
        let target = reencode_target_for(&[media("30000/1001", true), media("25/1", true)], 2);
        assert_eq!(target.width, 1918);
        assert_eq!(target.height, 1080);
        assert_eq!(target.frame_rate, "30000/1001");
        assert!(target.with_audio);
    }

    #[test]
    fn test_reencode_target_ignores_invalid_frame_rate() {
        let default_rate = ReencodeTarget::default().frame_rate;

        let target = reencode_target_for(&[media("0/0", true)], 1);
        assert_eq!(target.frame_rate, default_rate);

        let target = reencode_target_for(&[media("0/1", false)], 1);
        assert_eq!(target.frame_rate, default_rate);
        assert!(!target.with_audio);
    }

    #[test]
    fn test_reencode_target_without_audio_when_probe_missing() {
        let target = reencode_target_for(&[media("25/1", true)], 2);
        assert!(!target.with_audio);
    }

    #[test]
    fn test_ensure_output_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.mp4");

        assert!(ensure_output(&path).is_err());
        fs::write(&path, b"").unwrap();
        assert!(ensure_output(&path).is_err());
        fs::write(&path, b"data").unwrap();
        assert!(ensure_output(&path).is_ok());
    }
}
