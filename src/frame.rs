// FrameController - 一幀的更新與逐行光柵效果

use tracing::{debug, trace};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::input::{Direction, InputSnapshot};
use crate::raster::RasterEffectTable;
use crate::scroll::ScrollModel;

/// 圖層編號
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerId {
    Foreground = 0,
    Background = 1,
}

/// 可設定位移的圖層
pub trait Layer {
    fn set_position(&mut self, x: i32, y: i32);
}

/// 逐行光柵器與視窗的合約
pub trait Rasterizer {
    /// 處理視窗事件，回傳 false 表示要結束
    fn process(&mut self) -> Result<bool>;

    fn begin_frame(&mut self, frame: u32) -> Result<()>;

    /// 畫出游標所在的掃描線並前進，回傳是否還有剩餘的線
    fn draw_next_scanline(&mut self) -> Result<bool>;

    fn end_frame(&mut self) -> Result<()>;

    fn set_background_color(&mut self, color: Color);

    fn layer_mut(&mut self, id: LayerId) -> &mut dyn Layer;

    fn is_pressed(&self, direction: Direction) -> bool;
}

/// 一幀的統計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub frame: u32,
    pub lines: u32,
    pub offset_writes: u32,
    pub color_writes: u32,
}

#[derive(Debug)]
pub struct FrameController {
    model: ScrollModel,
    table: RasterEffectTable,
    frame: u32,
}

impl FrameController {
    pub fn new(model: ScrollModel, table: RasterEffectTable) -> Result<Self> {
        if model.strips().len() != table.strip_count() {
            return Err(Error::Config(format!(
                "scroll model has {} strips, raster table expects {}",
                model.strips().len(),
                table.strip_count()
            )));
        }
        Ok(FrameController {
            model,
            table,
            frame: 0,
        })
    }

    // 每幀一次: 更新速度、推進位置，前景位移立即送出
    pub fn update(&mut self, input: InputSnapshot, ctx: &mut dyn Rasterizer) {
        self.model.update_speed(input.left, input.right);
        self.model.advance();
        ctx.layer_mut(LayerId::Foreground)
            .set_position(self.model.foreground_offset(), 0);
    }

    // 逐行畫出一幀
    //
    // draw_next_scanline 畫完游標所在的線後才回報，所以對 `line` 求出的
    // 效果會作用在接下來畫的那條線上。行數由光柵器決定。
    pub fn draw_frame(&mut self, ctx: &mut dyn Rasterizer) -> Result<FrameStats> {
        let mut stats = FrameStats {
            frame: self.frame,
            ..FrameStats::default()
        };

        // Begin
        ctx.begin_frame(self.frame)?;
        let mut line: i32 = 1;

        // Scanning: 每次呼叫都畫一條線，回傳 false 的那次也算
        loop {
            let more = ctx.draw_next_scanline()?;
            stats.lines += 1;
            if !more {
                break;
            }

            let effect = self.table.evaluate(line, &self.model);
            if let Some(x) = effect.offset {
                ctx.layer_mut(LayerId::Background).set_position(x, 0);
                stats.offset_writes += 1;
            }
            if let Some(color) = effect.color {
                ctx.set_background_color(color);
                stats.color_writes += 1;
            }
            trace!(line, ?effect, "raster effect");
            line += 1;
        }

        // End
        ctx.end_frame()?;
        self.frame = self.frame.wrapping_add(1);

        debug!(
            frame = stats.frame,
            lines = stats.lines,
            offsets = stats.offset_writes,
            colors = stats.color_writes,
            speed = self.model.speed(),
            "frame drawn"
        );
        Ok(stats)
    }

    pub fn model(&self) -> &ScrollModel {
        &self.model
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    #[cfg(test)]
    pub fn model_mut(&mut self) -> &mut ScrollModel {
        &mut self.model
    }
}
