mod cpu_budget;
mod ffmpeg_command;
mod ffmpeg_engine;
mod ffprobe_info;
mod media_engine;
mod path_validator;

pub use cpu_budget::CpuBudget;
pub use ffmpeg_command::{ClipRequest, FfmpegCommand, ReencodeTarget, concat_manifest, split_seek};
pub use ffmpeg_engine::FfmpegEngine;
pub use ffprobe_info::{
    AudioStreamInfo, MediaInfo, StreamSignature, VideoStreamInfo, parse_probe_output,
};
pub use media_engine::{ConcatMethod, MediaEngine};
pub use path_validator::{ensure_directory_exists, validate_input_file};
