// PPU - 軟體逐行光柵器
//
// 兩個程序產生的圖層 (前景在上、背景在下)，透明處露出背景色。
// 每次 draw_next_scanline 畫一條線，位移與背景色可在兩條線之間改變。

use tracing::trace;

use crate::color::Color;
use crate::error::Result;
use crate::frame::{Layer, LayerId, Rasterizer};
use crate::input::{Direction, Hold};
use crate::scene::{SceneConfig, WATER_START_LINE};

/// 圖層寬度 (水平方向循環)
pub const LAYER_WIDTH: i32 = 512;

/// 水面調色板每幾幀輪替一次
pub const WATER_CYCLE_FRAMES: u32 = 8;

// 水面反光的循環調色板
const WATER_PALETTE: [Color; 4] = [
    Color::new(0xFF, 0xFF, 0xFF),
    Color::new(0xB6, 0xDB, 0xFF),
    Color::new(0x6D, 0xB6, 0xFF),
    Color::new(0x24, 0x92, 0xDB),
];

/// 圖層內容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Foreground,
    Background,
}

impl Pattern {
    /// 圖層座標上的像素，`None` 為透明
    pub fn sample(self, x: i32, y: i32, water_phase: usize) -> Option<Color> {
        match self {
            Pattern::Foreground => foreground_pixel(x, y),
            Pattern::Background => background_pixel(x, y, water_phase),
        }
    }
}

fn foreground_pixel(x: i32, y: i32) -> Option<Color> {
    // 地面: 16x16 棋盤格
    if y >= 208 {
        let checker = ((x / 16) + (y / 16)) % 2 == 0;
        return Some(if checker {
            Color::new(0xB4, 0x6C, 0x24)
        } else {
            Color::new(0x90, 0x48, 0x00)
        });
    }
    // 草皮
    if y >= 200 {
        return Some(Color::new(0x24, 0xB4, 0x24));
    }
    // 柱子
    let col = x % 256;
    if (96..112).contains(&col) && y >= 168 {
        return Some(Color::new(0x6C, 0x6C, 0x90));
    }
    None
}

fn background_pixel(x: i32, y: i32, water_phase: usize) -> Option<Color> {
    match y {
        // 雲
        16..=47 => {
            let dx = x % 128 - 64;
            let dy = y - 32;
            if dx * dx + dy * dy * 9 < 32 * 32 {
                Some(Color::new(0xFF, 0xFF, 0xFF))
            } else {
                None
            }
        }
        // 遠山: 三角波稜線
        64..=111 => {
            let t = x % 96;
            let ridge = 72 + (t - 48).abs() * 3 / 4;
            if y >= ridge {
                Some(Color::new(0x24, 0x48, 0x90))
            } else {
                None
            }
        }
        // 地平線上的丘陵
        112..=143 => {
            if ((x / 8) + (y / 4)) % 2 == 0 {
                Some(Color::new(0x24, 0x90, 0x48))
            } else {
                Some(Color::new(0x00, 0x6C, 0x24))
            }
        }
        // 水面反光，顏色隨幀輪替
        _ if y >= WATER_START_LINE => {
            if (x + y * 3) % 23 == 0 {
                Some(WATER_PALETTE[(water_phase + (x / 8) as usize) % WATER_PALETTE.len()])
            } else {
                None
            }
        }
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct LayerState {
    pub x: i32,
    pub y: i32,
    pub pattern: Pattern,
}

impl Layer for LayerState {
    fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}

impl LayerState {
    fn sample(&self, screen_x: i32, screen_y: i32, water_phase: usize) -> Option<Color> {
        let lx = (screen_x + self.x).rem_euclid(LAYER_WIDTH);
        let ly = screen_y + self.y;
        self.pattern.sample(lx, ly, water_phase)
    }
}

#[derive(Debug)]
pub struct Ppu {
    pub width: u32,
    pub height: u32,
    pub ly: u32, // 下一條要畫的掃描線
    pub frame: u32,
    pub background_color: Color,
    // 0 = 前景, 1 = 背景
    pub layers: [LayerState; 2],
    // 畫面緩衝區 - ARGB8888
    pub framebuffer: Vec<u32>,
    // 無視窗模式的固定按鍵
    pub hold: Option<Hold>,
}

impl Ppu {
    pub fn new(scene: &SceneConfig) -> Self {
        Ppu {
            width: scene.width,
            height: scene.height,
            ly: 0,
            frame: 0,
            background_color: scene.clear_color,
            layers: [
                LayerState {
                    x: 0,
                    y: 0,
                    pattern: Pattern::Foreground,
                },
                LayerState {
                    x: 0,
                    y: 0,
                    pattern: Pattern::Background,
                },
            ],
            framebuffer: vec![scene.clear_color.to_argb(); (scene.width * scene.height) as usize],
            hold: None,
        }
    }

    pub fn with_hold(mut self, hold: Option<Hold>) -> Self {
        self.hold = hold;
        self
    }

    fn water_phase(&self) -> usize {
        (self.frame / WATER_CYCLE_FRAMES) as usize % WATER_PALETTE.len()
    }

    // 渲染目前的掃描線
    fn render_scanline(&mut self) {
        let y = self.ly as i32;
        let phase = self.water_phase();
        let backdrop = self.background_color;
        let row = self.ly as usize * self.width as usize;

        for x in 0..self.width as i32 {
            let color = self.layers[LayerId::Foreground as usize]
                .sample(x, y, phase)
                .or_else(|| self.layers[LayerId::Background as usize].sample(x, y, phase))
                .unwrap_or(backdrop);
            self.framebuffer[row + x as usize] = color.to_argb();
        }
    }

    #[cfg(any(test, feature = "window"))]
    pub fn get_framebuffer(&self) -> &[u32] {
        &self.framebuffer
    }
}

impl Rasterizer for Ppu {
    fn process(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn begin_frame(&mut self, frame: u32) -> Result<()> {
        self.frame = frame;
        self.ly = 0;
        Ok(())
    }

    fn draw_next_scanline(&mut self) -> Result<bool> {
        if self.ly >= self.height {
            return Ok(false);
        }
        self.render_scanline();
        self.ly += 1;
        Ok(self.ly < self.height)
    }

    fn end_frame(&mut self) -> Result<()> {
        trace!(frame = self.frame, "ppu frame complete");
        Ok(())
    }

    fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    fn layer_mut(&mut self, id: LayerId) -> &mut dyn Layer {
        &mut self.layers[id as usize]
    }

    fn is_pressed(&self, direction: Direction) -> bool {
        self.hold.is_some_and(|h| h.is_pressed(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_scene() -> SceneConfig {
        SceneConfig {
            width: 64,
            height: 240,
            ..SceneConfig::default()
        }
    }

    #[test]
    fn test_scanline_cursor() {
        let mut ppu = Ppu::new(&small_scene());
        ppu.begin_frame(0).unwrap();
        let mut more = 0;
        while ppu.draw_next_scanline().unwrap() {
            more += 1;
        }
        assert_eq!(more, 239);
        assert_eq!(ppu.ly, 240);
        // 畫完之後再呼叫不會越界
        assert!(!ppu.draw_next_scanline().unwrap());
    }

    #[test]
    fn test_transparent_pixels_show_background_color() {
        let mut ppu = Ppu::new(&small_scene());
        let red = Color::new(0xFF, 0, 0);
        ppu.begin_frame(0).unwrap();
        ppu.set_background_color(red);
        // 第 0 行兩個圖層都透明
        ppu.draw_next_scanline().unwrap();
        assert!(ppu.get_framebuffer()[..64].iter().all(|&p| p == red.to_argb()));
    }

    #[test]
    fn test_background_color_changes_between_lines() {
        let mut ppu = Ppu::new(&small_scene());
        let a = Color::new(1, 2, 3);
        let b = Color::new(4, 5, 6);
        ppu.begin_frame(0).unwrap();
        ppu.set_background_color(a);
        ppu.draw_next_scanline().unwrap();
        ppu.set_background_color(b);
        ppu.draw_next_scanline().unwrap();
        assert_eq!(ppu.get_framebuffer()[0], a.to_argb());
        assert_eq!(ppu.get_framebuffer()[64], b.to_argb());
    }

    #[test]
    fn test_layer_offset_shifts_pixels() {
        let scene = small_scene();
        let mut ppu = Ppu::new(&scene);
        ppu.begin_frame(0).unwrap();
        // 跳到地面那一行
        ppu.ly = 210;
        ppu.layer_mut(LayerId::Foreground).set_position(16, 0);
        ppu.draw_next_scanline().unwrap();
        let row = 210 * 64;
        let expected = Pattern::Foreground.sample(16, 210, 0).unwrap().to_argb();
        assert_eq!(ppu.get_framebuffer()[row], expected);
    }

    #[test]
    fn test_negative_offset_wraps() {
        let layer = LayerState {
            x: -1,
            y: 0,
            pattern: Pattern::Foreground,
        };
        assert_eq!(
            layer.sample(0, 210, 0),
            Pattern::Foreground.sample(LAYER_WIDTH - 1, 210, 0)
        );
    }

    #[test]
    fn test_water_palette_cycles() {
        // (0 + 161 * 3) % 23 == 0
        let y = 161;
        let c0 = Pattern::Background.sample(0, y, 0);
        let c1 = Pattern::Background.sample(0, y, 1);
        assert!(c0.is_some());
        assert_ne!(c0, c1);
        assert_eq!(Pattern::Background.sample(0, y, 4), c0);

        let mut ppu = Ppu::new(&small_scene());
        ppu.begin_frame(WATER_CYCLE_FRAMES).unwrap();
        assert_eq!(ppu.water_phase(), 1);
    }

    #[test]
    fn test_hold_drives_input() {
        let ppu = Ppu::new(&small_scene()).with_hold(Some(Hold::Right));
        assert!(ppu.is_pressed(Direction::Right));
        assert!(!ppu.is_pressed(Direction::Left));
        let idle = Ppu::new(&small_scene());
        assert!(!idle.is_pressed(Direction::Right));
    }
}
