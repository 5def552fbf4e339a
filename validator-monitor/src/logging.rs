use anyhow::Result;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::constants::LOG_FILE_NAME;

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Initialize logging with optional file output and configurable log level
pub fn init_logging(logs_path: Option<PathBuf>, logs_enabled: Option<bool>, log_level: Option<String>) -> Result<()> {
    let save_logs = logs_enabled.unwrap_or(true);
    let level_str = log_level.unwrap_or_else(|| "info".to_string());
    let level_filter = parse_level(&level_str);

    // RUST_LOG still wins for per-module filters
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_filter);
    builder.parse_env(env_logger::Env::default());

    match logs_path {
        Some(logs_dir) if save_logs => {
            std::fs::create_dir_all(&logs_dir)?;

            let log_file_path = logs_dir.join(LOG_FILE_NAME);
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file_path)?;

            builder.target(env_logger::Target::Pipe(Box::new(DualWriter::new(log_file))));
            builder.try_init()?;

            log::info!("Logging to terminal and {} (level: {})", log_file_path.display(), level_str);
        }
        _ => {
            builder.try_init()?;
            log::debug!("Logging to terminal only (level: {})", level_str);
        }
    }

    Ok(())
}

/// Copies every log record into `sink` and echoes it to stdout
struct DualWriter<W: Write> {
    sink: W,
}

impl<W: Write> DualWriter<W> {
    fn new(sink: W) -> Self {
        Self { sink }
    }
}

impl<W: Write> Write for DualWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write_all(buf)?;
        io::stdout().lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()?;
        io::stdout().lock().flush()
    }
}
