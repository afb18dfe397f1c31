use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::{Error, Result};

/// 初始化 tracing: 終端機 + log 檔案 (logs/scroller.log)
///
/// `RUST_LOG` 優先，否則使用 `level`。
pub fn init(level: &str) -> Result<()> {
    let log_dir = "logs";
    let log_path = format!("{}/scroller.log", log_dir);
    if !Path::new(log_dir).exists() {
        fs::create_dir_all(log_dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .map_err(|e| Error::Config(format!("logger init error: {}", e)))
}
