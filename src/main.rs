use anyhow::Result;
use clap::Parser;
use console::{Term, style};
use log::{error, info};
use std::process::ExitCode;
use video_summariser::cli::{Cli, ModeKind};
use video_summariser::component::{RunLayout, VideoSummariser};
use video_summariser::config::AppConfig;
use video_summariser::init;
use video_summariser::menu::{prompt_input_path, prompt_mode};
use video_summariser::signal::setup_shutdown_signal;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    let (input, kind) = match cli.input.clone() {
        Some(input) => (input, cli.mode_kind().unwrap_or(ModeKind::Fixed)),
        None => {
            let term = Term::stdout();
            let input = prompt_input_path()?;
            let kind = match cli.mode_kind() {
                Some(kind) => kind,
                None => prompt_mode(&term)?,
            };
            (input, kind)
        }
    };

    let request = cli.into_request(input, kind, &config.defaults);
    let layout = RunLayout::new(&config.directories, &request.input, request.output.as_deref());
    layout.create()?;
    init::init(&config.logging.level, Some(&layout.log_path()))?;
    info!("執行 {} 開始", layout.run_id);

    let shutdown_signal = setup_shutdown_signal()?;
    let summariser = VideoSummariser::new(shutdown_signal);

    match summariser.run(&request, &layout) {
        Ok(summary) => {
            info!("執行 {} 結束: {}", layout.run_id, summary.status);
            if let Some(output) = summary.output_path() {
                info!("摘要影片: {}", output.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("執行 {} 失敗: {e:#}", layout.run_id);
            eprintln!("{} {e:#}", style("錯誤:").red().bold());
            Ok(ExitCode::FAILURE)
        }
    }
}
