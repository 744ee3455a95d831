use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// 初始化日誌
///
/// `level` 來自設定檔，`RUST_LOG` 會覆蓋它。指定 `log_file` 時同時寫入
/// stderr 與該檔案。
pub fn init(level: &str, log_file: Option<&Path>) -> Result<()> {
    let mut builder = Builder::new();
    builder
        .parse_filters(level)
        .parse_default_env()
        .format_timestamp_millis();

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("無法開啟日誌檔: {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(TeeWriter { file })));
    }

    builder.try_init().context("無法初始化日誌")?;
    Ok(())
}

struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_writer_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summariser.log");
        let file = OpenOptions::new().create(true).append(true).open(&path).unwrap();

        let mut writer = TeeWriter { file };
        writer.write_all(b"chunk 0 done\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "chunk 0 done\n");
    }
}
