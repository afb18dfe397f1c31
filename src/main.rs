mod color;
mod demo;
#[cfg(feature = "window")]
mod display;
mod error;
mod frame;
mod input;
mod lerp;
mod logger;
mod ppu;
mod raster;
mod scene;
mod scroll;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::input::Hold;
use crate::scene::SceneConfig;

/// 多條帶視差捲動與逐行光柵效果示範
#[derive(Parser, Debug)]
#[command(name = "parallax_scroller", version)]
struct Cli {
    /// 場景設定 JSON 檔
    #[arg(long)]
    scene: Option<PathBuf>,

    /// 畫完幾幀後結束
    #[arg(long)]
    frames: Option<u32>,

    /// 不開視窗，只跑軟體光柵器
    #[arg(long)]
    headless: bool,

    /// 視窗放大倍率
    #[arg(long)]
    scale: Option<u32>,

    /// 無視窗模式下固定按住的方向
    #[arg(long, value_enum)]
    hold: Option<Hold>,

    /// 未設定 RUST_LOG 時的 log 等級
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init(&cli.log_level) {
        eprintln!("log 初始化失敗: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("=== 啟動 Parallax Scroller ===");

    let mut scene = match &cli.scene {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if let Some(scale) = cli.scale {
        scene.scale = scale;
    }
    scene.validate()?;

    let mut controller = demo::build_controller(&scene)?;

    if cli.headless {
        let mut ppu = ppu::Ppu::new(&scene).with_hold(cli.hold);
        // 沒有視窗事件可以結束迴圈，預設只跑一秒
        let frames = cli.frames.unwrap_or(60);
        demo::run(&mut controller, &mut ppu, Some(frames), None)?;
        return Ok(());
    }

    if cli.hold.is_some() {
        warn!("--hold 只在 --headless 模式下有效");
    }
    run_window(&scene, &mut controller, cli.frames)
}

#[cfg(feature = "window")]
fn run_window(
    scene: &SceneConfig,
    controller: &mut frame::FrameController,
    frames: Option<u32>,
) -> Result<()> {
    let mut display = display::SdlDisplay::new(scene)?;
    demo::run(controller, &mut display, frames, Some(demo::FRAME_TIME))?;
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run_window(
    _scene: &SceneConfig,
    _controller: &mut frame::FrameController,
    _frames: Option<u32>,
) -> Result<()> {
    Err(crate::error::Error::Config(
        "built without the `window` feature, run with --headless".into(),
    ))
}
