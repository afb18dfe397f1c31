// 場景設定 - 解析度、漸層顏色、條帶倍率

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::color::Color;
use crate::error::{Error, Result};
use crate::scroll::{FOREGROUND_RATE, SPEED_STEP};

/// 背景條帶數 (光柵規則會用到 0..=5)
pub const BACKGROUND_STRIPS: usize = 6;

/// 水面漸層的起始掃描線
pub const WATER_START_LINE: i32 = 144;

/// 一組上下兩色
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ColorPair {
    pub top: Color,
    pub bottom: Color,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SceneConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default = "default_clear_color")]
    pub clear_color: Color,
    #[serde(default = "default_sky")]
    pub sky: ColorPair,
    #[serde(default = "default_water")]
    pub water: ColorPair,
    #[serde(default = "default_strip_increments")]
    pub strip_increments: Vec<f64>,
    #[serde(default = "default_foreground_rate")]
    pub foreground_rate: f64,
    #[serde(default = "default_speed_step")]
    pub speed_step: f64,
}

fn default_width() -> u32 {
    400
}

fn default_height() -> u32 {
    240
}

fn default_scale() -> u32 {
    2
}

fn default_clear_color() -> Color {
    Color::new(0, 128, 128)
}

fn default_sky() -> ColorPair {
    ColorPair {
        top: Color::new(0x1B, 0x00, 0x8B),
        bottom: Color::new(0x00, 0x74, 0xD7),
    }
}

fn default_water() -> ColorPair {
    ColorPair {
        top: Color::new(0x24, 0x92, 0xDB),
        bottom: Color::new(0x1F, 0x7F, 0xBE),
    }
}

fn default_strip_increments() -> Vec<f64> {
    vec![0.562, 0.437, 0.375, 0.625, 1.0, 2.0]
}

fn default_foreground_rate() -> f64 {
    FOREGROUND_RATE
}

fn default_speed_step() -> f64 {
    SPEED_STEP
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            scale: default_scale(),
            clear_color: default_clear_color(),
            sky: default_sky(),
            water: default_water(),
            strip_increments: default_strip_increments(),
            foreground_rate: default_foreground_rate(),
            speed_step: default_speed_step(),
        }
    }
}

impl SceneConfig {
    // 從 JSON 檔載入，缺少的欄位用預設值
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let scene: SceneConfig = serde_json::from_str(&data)?;
        scene.validate()?;
        info!(path = %path.display(), "scene loaded");
        Ok(scene)
    }

    pub fn validate(&self) -> Result<()> {
        if self.strip_increments.len() != BACKGROUND_STRIPS {
            return Err(Error::Config(format!(
                "expected {} strip increments, got {}",
                BACKGROUND_STRIPS,
                self.strip_increments.len()
            )));
        }
        if self.width == 0 || self.scale == 0 {
            return Err(Error::Config("width and scale must be non-zero".into()));
        }
        // 畫面緩衝區與視窗大小都不可溢位
        let sizes = [
            ("width * height", self.width.checked_mul(self.height)),
            ("width * scale", self.width.checked_mul(self.scale)),
            ("height * scale", self.height.checked_mul(self.scale)),
        ];
        for (what, product) in sizes {
            if product.is_none() {
                return Err(Error::Config(format!(
                    "{} overflows ({}x{} at scale {})",
                    what, self.width, self.height, self.scale
                )));
            }
        }
        // 水面漸層區間 [144, height) 不可為空
        if self.height as i32 <= WATER_START_LINE {
            return Err(Error::Config(format!(
                "height must exceed {} lines, got {}",
                WATER_START_LINE, self.height
            )));
        }
        if !(self.speed_step > 0.0 && self.speed_step <= 1.0) {
            return Err(Error::Config(format!(
                "speed_step must be in (0, 1], got {}",
                self.speed_step
            )));
        }
        Ok(())
    }
}
