// 線性內插 - 整數與顏色

use crate::color::Color;

/// 整數線性內插: `fx0 + (fx1 - fx0) * (x - x0) / (x1 - x0)`
///
/// 除法為截斷 (向零取整)，不夾住 `x`，超出 `[x0, x1]` 時照公式外插。
/// `x0 == x1` 是設定錯誤，直接 panic。
pub fn lerp_int(x: i32, x0: i32, x1: i32, fx0: i32, fx1: i32) -> i32 {
    assert!(x1 != x0, "lerp_int: 內插區間為空 (x0 == x1 == {})", x0);

    // 中間值用 i64，避免長時間捲動後位置相乘溢位
    let num = (fx1 as i64 - fx0 as i64) * (x as i64 - x0 as i64);
    (fx0 as i64 + num / (x1 as i64 - x0 as i64)) as i32
}

/// 顏色內插: 每個通道各自做 `lerp_int`，再截斷成 u8
///
/// 不做範圍夾制，`v` 超出 `[v1, v2]` 時通道值會環繞 (wrap)。
pub fn lerp_color(v: i32, v1: i32, v2: i32, c1: Color, c2: Color) -> Color {
    Color::new(
        lerp_int(v, v1, v2, c1.r as i32, c2.r as i32) as u8,
        lerp_int(v, v1, v2, c1.g as i32, c2.g as i32) as u8,
        lerp_int(v, v1, v2, c1.b as i32, c2.b as i32) as u8,
    )
}
