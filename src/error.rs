use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    // 漸層區間必須 start < end
    #[error("Invalid gradient range: [{start}, {end})")]
    InvalidGradient { start: i32, end: i32 },

    #[error("Raster rule references strip {index}, but only {count} strips exist")]
    UnknownStrip { index: usize, count: usize },

    // 視窗 / 繪圖後端錯誤
    #[cfg(feature = "window")]
    #[error("Display error: {0}")]
    Display(String),
}
