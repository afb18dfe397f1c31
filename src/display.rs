// SDL3 視窗後端 - 包住軟體 PPU，負責事件、鍵盤與畫面輸出

use sdl3::event::Event;
use sdl3::keyboard::{Keycode, Scancode};
use sdl3::pixels::PixelFormat;
use sdl3::rect::Rect;
use sdl3::render::Canvas;
use sdl3::video::Window;
use sdl3::{EventPump, Sdl};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::frame::{Layer, LayerId, Rasterizer};
use crate::input::Direction;
use crate::ppu::Ppu;
use crate::scene::SceneConfig;

pub const WINDOW_TITLE: &str = "Parallax Scroller";

pub struct SdlDisplay {
    pub _sdl: Sdl,
    pub canvas: Canvas<Window>,
    pub event_pump: EventPump,
    pub ppu: Ppu,
    left: bool,
    right: bool,
}

impl std::fmt::Debug for SdlDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdlDisplay")
            .field("ppu", &self.ppu)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl SdlDisplay {
    pub fn new(scene: &SceneConfig) -> Result<Self> {
        let sdl = sdl3::init().map_err(|e| Error::Display(format!("SDL init error: {:?}", e)))?;
        let video = sdl
            .video()
            .map_err(|e| Error::Display(format!("SDL video error: {:?}", e)))?;
        let window = video
            .window(
                WINDOW_TITLE,
                scene.width * scene.scale,
                scene.height * scene.scale,
            )
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| Error::Display(format!("SDL build window error: {:?}", e)))?;
        let canvas = window.into_canvas();
        let event_pump = sdl
            .event_pump()
            .map_err(|e| Error::Display(format!("SDL event pump error: {:?}", e)))?;
        Ok(Self {
            _sdl: sdl,
            canvas,
            event_pump,
            ppu: Ppu::new(scene),
            left: false,
            right: false,
        })
    }

    /// 把 PPU 的 ARGB framebuffer 上傳並以整數倍縮放置中
    fn blit_framebuffer(&mut self) -> Result<()> {
        let (w, h) = (self.ppu.width, self.ppu.height);
        let pixels = self.ppu.get_framebuffer();
        let texture_creator = self.canvas.texture_creator();
        let mut texture = texture_creator
            .create_texture_streaming(PixelFormat::ARGB8888, w, h)
            .map_err(|e| Error::Display(format!("SDL texture error: {:?}", e)))?;
        texture
            .with_lock(None, |buf: &mut [u8], pitch: usize| {
                for y in 0..h as usize {
                    let row = &pixels[y * w as usize..(y + 1) * w as usize];
                    let dst = &mut buf[y * pitch..y * pitch + w as usize * 4];
                    for (x, &px) in row.iter().enumerate() {
                        // 小端序: B, G, R, A
                        dst[x * 4..x * 4 + 4].copy_from_slice(&px.to_le_bytes());
                    }
                }
            })
            .map_err(|e| Error::Display(format!("lock texture error: {:?}", e)))?;

        self.canvas.clear();
        let (ww, wh) = self.canvas.window().size();
        let scale = (ww / w).min(wh / h).max(1);
        let dst_w = w * scale;
        let dst_h = h * scale;
        let dst_x = ((ww as i32 - dst_w as i32) / 2).max(0);
        let dst_y = ((wh as i32 - dst_h as i32) / 2).max(0);
        let dst = Rect::new(dst_x, dst_y, dst_w, dst_h);
        self.canvas
            .copy(&texture, None, dst)
            .map_err(|e| Error::Display(format!("copy texture error: {:?}", e)))?;
        self.canvas.present();
        Ok(())
    }
}

impl Rasterizer for SdlDisplay {
    /// 處理事件，回傳是否繼續執行
    fn process(&mut self) -> Result<bool> {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return Ok(false),
                _ => {}
            }
        }
        let keyboard = self.event_pump.keyboard_state();
        self.left = keyboard.is_scancode_pressed(Scancode::Left);
        self.right = keyboard.is_scancode_pressed(Scancode::Right);
        Ok(true)
    }

    fn begin_frame(&mut self, frame: u32) -> Result<()> {
        self.ppu.begin_frame(frame)
    }

    fn draw_next_scanline(&mut self) -> Result<bool> {
        self.ppu.draw_next_scanline()
    }

    fn end_frame(&mut self) -> Result<()> {
        self.ppu.end_frame()?;
        self.blit_framebuffer()
    }

    fn set_background_color(&mut self, color: Color) {
        self.ppu.set_background_color(color);
    }

    fn layer_mut(&mut self, id: LayerId) -> &mut dyn Layer {
        self.ppu.layer_mut(id)
    }

    fn is_pressed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}
