use crate::cli::ModeKind;
use anyhow::{Result, bail};
use console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::path::PathBuf;

pub fn prompt_input_path() -> Result<PathBuf> {
    let path = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt("請輸入影片檔案路徑")
        .interact_text()?;
    Ok(PathBuf::from(path.trim()))
}

pub fn prompt_mode(term: &Term) -> Result<ModeKind> {
    let options: Vec<String> = ModeKind::ALL.iter().map(ToString::to_string).collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇擷取模式")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(index) => Ok(ModeKind::ALL[index]),
        None => bail!("已取消"),
    }
}
