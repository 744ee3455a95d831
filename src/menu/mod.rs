//! 未在命令列提供輸入時的互動選單

mod prompts;

pub use prompts::{prompt_input_path, prompt_mode};
