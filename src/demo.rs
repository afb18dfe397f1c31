// 主迴圈 - 輸入、更新、逐行繪製

use std::time::Duration;

use tracing::info;

use crate::error::Result;
use crate::frame::{FrameController, LayerId, Rasterizer};
use crate::input::InputSnapshot;
use crate::raster::RasterEffectTable;
use crate::scene::SceneConfig;
use crate::scroll::ScrollModel;

/// 60 Hz
#[cfg(feature = "window")]
pub const FRAME_TIME: Duration = Duration::from_nanos(1_000_000_000 / 60);

pub fn build_controller(scene: &SceneConfig) -> Result<FrameController> {
    let model = ScrollModel::with_rates(
        &scene.strip_increments,
        scene.speed_step,
        scene.foreground_rate,
    );
    let table = RasterEffectTable::reference(scene)?;
    FrameController::new(model, table)
}

/// 執行到視窗關閉或達到 `frame_limit`，回傳畫了幾幀
pub fn run(
    controller: &mut FrameController,
    ctx: &mut dyn Rasterizer,
    frame_limit: Option<u32>,
    pacing: Option<Duration>,
) -> Result<u32> {
    ctx.layer_mut(LayerId::Foreground).set_position(0, 0);
    ctx.layer_mut(LayerId::Background).set_position(0, 0);

    let mut drawn = 0u32;
    while ctx.process()? {
        if frame_limit.is_some_and(|limit| drawn >= limit) {
            break;
        }

        let input = InputSnapshot::poll(|d| ctx.is_pressed(d));
        controller.update(input, ctx);
        controller.draw_frame(ctx)?;
        drawn += 1;

        if let Some(frame_time) = pacing {
            std::thread::sleep(frame_time);
        }
    }

    let model = controller.model();
    info!(
        frames = drawn,
        frame_index = controller.frame(),
        speed = model.speed(),
        foreground = model.foreground_position(),
        "demo loop finished"
    );
    Ok(drawn)
}
