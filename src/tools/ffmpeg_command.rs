use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// 擷取單一區段的參數
///
/// `offset` 為區段起點相對於 chunk 起點的位移。
#[derive(Debug, Clone, Copy)]
pub struct ClipRequest<'a> {
    pub source: &'a Path,
    pub chunk_start: f64,
    pub offset: f64,
    pub length: f64,
    pub output: &'a Path,
}

/// 重新編碼串接時統一的輸出規格
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReencodeTarget {
    pub width: u32,
    pub height: u32,
    pub frame_rate: String,
    pub with_audio: bool,
}

impl Default for ReencodeTarget {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frame_rate: "30/1".to_string(),
            with_audio: true,
        }
    }
}

pub struct FfmpegCommand {
    program: PathBuf,
}

impl FfmpegCommand {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]);
        cmd
    }

    /// 擷取並重新編碼一個區段
    ///
    /// 兩段式 seek：
    /// 1. `-ss` 在 `-i` 前：快速跳轉到 chunk 起點加上位移減去緩衝
    /// 2. `-ss` 在 `-i` 後：精準解碼到區段起點
    #[must_use]
    pub fn extract_clip(&self, request: &ClipRequest<'_>) -> Command {
        let (input_seek, output_seek) = split_seek(request.chunk_start, request.offset);
        let mut cmd = self.base_command();

        if input_seek > 0.0 {
            cmd.arg("-ss").arg(format!("{input_seek:.3}"));
        }
        cmd.arg("-i").arg(request.source);
        if output_seek > 0.0 {
            cmd.arg("-ss").arg(format!("{output_seek:.3}"));
        }

        cmd.arg("-t").arg(format!("{:.3}", request.length));
        cmd.args(["-map", "0:v:0", "-map", "0:a:0?", "-sn", "-dn"]);
        cmd.args(["-map_metadata", "-1"]);
        cmd.args(["-c:v", "libx264", "-preset", "ultrafast", "-pix_fmt", "yuv420p"]);
        cmd.args(["-c:a", "aac", "-ar", "48000", "-ac", "2"]);
        cmd.args(["-avoid_negative_ts", "make_zero", "-movflags", "+faststart"]);
        cmd.arg(request.output);
        cmd
    }

    /// 以 concat demuxer 直接串接（不重新編碼）
    #[must_use]
    pub fn concat_copy(&self, manifest: &Path, output: &Path) -> Command {
        let mut cmd = self.base_command();
        cmd.args(["-f", "concat", "-safe", "0", "-i"]);
        cmd.arg(manifest);
        cmd.args(["-map", "0", "-c", "copy", "-movflags", "+faststart"]);
        cmd.arg(output);
        cmd
    }

    /// 以 concat 濾鏡串接，先將每個輸入正規化為相同的解析度、幀率與取樣率
    #[must_use]
    pub fn concat_reencode(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        target: &ReencodeTarget,
    ) -> Command {
        let mut cmd = self.base_command();
        for input in inputs {
            cmd.arg("-i").arg(input);
        }

        cmd.arg("-filter_complex")
            .arg(build_concat_filter(inputs.len(), target));
        cmd.args(["-map", "[v]"]);
        if target.with_audio {
            cmd.args(["-map", "[a]", "-c:a", "aac", "-ar", "48000", "-ac", "2"]);
        }
        cmd.args(["-c:v", "libx264", "-preset", "ultrafast", "-pix_fmt", "yuv420p"]);
        cmd.args(["-movflags", "+faststart"]);
        cmd.arg(output);
        cmd
    }

    /// 擷取單張靜態畫面
    #[must_use]
    pub fn extract_frame(&self, source: &Path, timestamp: f64, output: &Path) -> Command {
        let mut cmd = self.base_command();
        cmd.arg("-i").arg(source);
        if timestamp > 0.0 {
            cmd.arg("-ss").arg(format!("{timestamp:.3}"));
        }
        cmd.args(["-frames:v", "1", "-an", "-sn", "-dn", "-q:v", "2"]);
        cmd.arg(output);
        cmd
    }
}

/// 將區段位移拆成 (輸入端 seek 的絕對時間, 輸出端 seek 的相對時間)
#[must_use]
pub fn split_seek(chunk_start: f64, offset: f64) -> (f64, f64) {
    let coarse = (offset - SEEK_MARGIN).max(0.0);
    (chunk_start + coarse, offset - coarse)
}

/// 建立 concat demuxer 使用的清單內容
///
/// concat demuxer 以清單檔所在目錄解析相對路徑，因此一律寫入絕對路徑。
pub fn concat_manifest(paths: &[PathBuf]) -> io::Result<String> {
    let mut manifest = String::new();
    for path in paths {
        let absolute = std::path::absolute(path)?;
        let escaped = absolute
            .to_string_lossy()
            .replace('\\', "/")
            .replace('\'', r"'\''");
        manifest.push_str(&format!("file '{escaped}'\n"));
    }
    Ok(manifest)
}

fn build_concat_filter(count: usize, target: &ReencodeTarget) -> String {
    let ReencodeTarget {
        width,
        height,
        frame_rate,
        with_audio,
    } = target;

    let mut filter = String::new();
    let mut concat_inputs = String::new();

    for i in 0..count {
        filter.push_str(&format!(
            "[{i}:v:0]scale={width}:{height}:force_original_aspect_ratio=decrease,\
             pad={width}:{height}:(ow-iw)/2:(oh-ih)/2:black,setsar=1,fps={frame_rate},format=yuv420p[v{i}];"
        ));
        concat_inputs.push_str(&format!("[v{i}]"));

        if *with_audio {
            filter.push_str(&format!(
                "[{i}:a:0]aresample=48000,aformat=channel_layouts=stereo[a{i}];"
            ));
            concat_inputs.push_str(&format!("[a{i}]"));
        }
    }

    let audio_flag = u8::from(*with_audio);
    filter.push_str(&format!(
        "{concat_inputs}concat=n={count}:v=1:a={audio_flag}[v]"
    ));
    if *with_audio {
        filter.push_str("[a]");
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_split_seek() {
        assert_eq!(split_seek(40.0, 15.0), (53.0, 2.0));
        assert_eq!(split_seek(40.0, 1.0), (40.0, 1.0));
        assert_eq!(split_seek(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_extract_clip_seeks_relative_to_chunk() {
        let ffmpeg = FfmpegCommand::new("ffmpeg");
        let request = ClipRequest {
            source: Path::new("/videos/input.mp4"),
            chunk_start: 60.0,
            offset: 12.5,
            length: 1.5,
            output: Path::new("/tmp/clip_000.mp4"),
        };
        let args = args_of(&ffmpeg.extract_clip(&request));

        let input_pos = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input_pos - 1], "70.500");
        assert_eq!(args[input_pos + 1], "/videos/input.mp4");
        assert_eq!(args[input_pos + 3], "2.000");
        assert!(args.windows(2).any(|w| w[0] == "-t" && w[1] == "1.500"));
        assert_eq!(args.last().unwrap(), "/tmp/clip_000.mp4");
    }

    #[test]
    fn test_extract_clip_at_chunk_start_skips_seek() {
        let ffmpeg = FfmpegCommand::new("ffmpeg");
        let request = ClipRequest {
            source: Path::new("in.mp4"),
            chunk_start: 0.0,
            offset: 0.0,
            length: 1.0,
            output: Path::new("out.mp4"),
        };
        let args = args_of(&ffmpeg.extract_clip(&request));
        assert!(!args.contains(&"-ss".to_string()));
    }

    #[test]
    fn test_concat_manifest_escapes_quotes() {
        let manifest = concat_manifest(&[
            PathBuf::from("/tmp/chunk_000.mp4"),
            PathBuf::from("/tmp/it's.mp4"),
        ])
        .unwrap();
        assert_eq!(
            manifest,
            "file '/tmp/chunk_000.mp4'\nfile '/tmp/it'\\''s.mp4'\n"
        );
    }

    #[test]
    fn test_concat_manifest_resolves_relative_paths() {
        let relative = PathBuf::from("temp/holiday-1a2b3c4d/chunk_000/clip_000.mp4");
        let manifest = concat_manifest(std::slice::from_ref(&relative)).unwrap();

        let expected = std::env::current_dir().unwrap().join(&relative);
        let entry = manifest
            .strip_prefix("file '")
            .and_then(|rest| rest.strip_suffix("'\n"))
            .unwrap();
        assert!(Path::new(entry).is_absolute(), "清單路徑應為絕對路徑: {entry}");
        assert_eq!(Path::new(entry), expected);
    }

    #[test]
    fn test_concat_filter_with_audio() {
        let filter = build_concat_filter(2, &ReencodeTarget::default());
        assert!(filter.contains("[0:v:0]scale=1280:720"));
        assert!(filter.contains("[1:a:0]aresample=48000"));
        assert!(filter.ends_with("[v0][a0][v1][a1]concat=n=2:v=1:a=1[v][a]"));
    }

    #[test]
    fn test_concat_filter_video_only() {
        let target = ReencodeTarget {
            with_audio: false,
            ..ReencodeTarget::default()
        };
        let filter = build_concat_filter(3, &target);
        assert!(!filter.contains("aresample"));
        assert!(filter.ends_with("[v0][v1][v2]concat=n=3:v=1:a=0[v]"));
    }
}
