// ScrollModel - 前景與背景各條帶的捲動位置

use tracing::trace;

/// 速度每幀的加減量
pub const SPEED_STEP: f64 = 0.02;

/// 前景相對速度的倍率
pub const FOREGROUND_RATE: f64 = 3.0;

/// 背景中一條獨立捲動的帶
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStrip {
    pub position: f64,
    pub increment: f64, // 固定倍率，初始化後不變
}

#[derive(Debug, Clone)]
pub struct ScrollModel {
    speed: f64,
    step: f64,
    foreground_rate: f64,
    foreground_position: f64,
    strips: Vec<ScrollStrip>,
}

impl ScrollModel {
    #[cfg(test)]
    pub fn new(increments: &[f64]) -> Self {
        Self::with_rates(increments, SPEED_STEP, FOREGROUND_RATE)
    }

    pub fn with_rates(increments: &[f64], step: f64, foreground_rate: f64) -> Self {
        ScrollModel {
            speed: 0.0,
            step,
            foreground_rate,
            foreground_position: 0.0,
            strips: increments
                .iter()
                .map(|&increment| ScrollStrip {
                    position: 0.0,
                    increment,
                })
                .collect(),
        }
    }

    // 依本幀輸入更新速度
    //
    // 左右兩條鏈各自獨立計算再疊加: 同時按住時兩邊的增減都會生效。
    pub fn update_speed(&mut self, left_held: bool, right_held: bool) {
        // 右: 加速，否則往 0 減速
        if right_held {
            self.speed += self.step;
            if self.speed > 1.0 {
                self.speed = 1.0;
            }
        } else if self.speed > 0.0 {
            self.speed -= self.step;
            if self.speed < 0.0 {
                self.speed = 0.0;
            }
        }

        // 左: 鏡像
        if left_held {
            self.speed -= self.step;
            if self.speed < -1.0 {
                self.speed = -1.0;
            }
        } else if self.speed < 0.0 {
            self.speed += self.step;
            if self.speed > 0.0 {
                self.speed = 0.0;
            }
        }
    }

    // 以目前速度推進一幀
    pub fn advance(&mut self) {
        self.foreground_position += self.foreground_rate * self.speed;
        for strip in self.strips.iter_mut() {
            strip.position += strip.increment * self.speed;
        }
        trace!(
            speed = self.speed,
            foreground = self.foreground_position,
            "scroll advanced"
        );
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// 直接設定速度，夾在 [-1, 1]
    #[cfg(test)]
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.clamp(-1.0, 1.0);
    }

    pub fn foreground_position(&self) -> f64 {
        self.foreground_position
    }

    // 前景圖層要用的整數位移 (截斷)
    pub fn foreground_offset(&self) -> i32 {
        self.foreground_position as i32
    }

    pub fn strips(&self) -> &[ScrollStrip] {
        &self.strips
    }

    #[cfg(test)]
    pub fn strip_position(&self, index: usize) -> Option<f64> {
        self.strips.get(index).map(|s| s.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCREMENTS: [f64; 6] = [0.562, 0.437, 0.375, 0.625, 1.0, 2.0];

    #[test]
    fn test_right_reaches_exactly_one() {
        let mut model = ScrollModel::new(&INCREMENTS);
        for _ in 0..50 {
            model.update_speed(false, true);
            assert!(model.speed() <= 1.0);
        }
        assert_eq!(model.speed(), 1.0);

        // 繼續按住也不會超過
        model.update_speed(false, true);
        assert_eq!(model.speed(), 1.0);
    }

    #[test]
    fn test_release_returns_to_zero() {
        let mut model = ScrollModel::new(&INCREMENTS);
        for _ in 0..50 {
            model.update_speed(false, true);
        }
        for _ in 0..50 {
            model.update_speed(false, false);
            assert!(model.speed() >= 0.0);
        }
        assert_eq!(model.speed(), 0.0);
    }

    #[test]
    fn test_left_mirrors_right() {
        let mut model = ScrollModel::new(&INCREMENTS);
        for _ in 0..60 {
            model.update_speed(true, false);
            assert!(model.speed() >= -1.0);
        }
        assert_eq!(model.speed(), -1.0);
        for _ in 0..50 {
            model.update_speed(false, false);
            assert!(model.speed() <= 0.0);
        }
        assert_eq!(model.speed(), 0.0);
    }

    #[test]
    fn test_both_held_applies_both_chains() {
        // 靜止時同時按住: +step 再 -step，淨值為 0
        let mut model = ScrollModel::new(&INCREMENTS);
        model.update_speed(true, true);
        assert_eq!(model.speed(), 0.0);

        // 全速向右時同時按住: 右鏈夾在 1.0，左鏈再減一步
        model.set_speed(1.0);
        model.update_speed(true, true);
        assert_eq!(model.speed(), 0.98);
    }

    #[test]
    fn test_advance_ten_frames_at_full_speed() {
        let mut model = ScrollModel::new(&INCREMENTS);
        model.set_speed(1.0);
        for _ in 0..10 {
            model.advance();
        }
        assert_eq!(model.strip_position(5), Some(20.0));
        assert_eq!(model.strip_position(4), Some(10.0));
        assert_eq!(model.foreground_position(), 30.0);
        assert_eq!(model.foreground_offset(), 30);
    }

    #[test]
    fn test_advance_is_noop_at_rest() {
        let mut model = ScrollModel::new(&INCREMENTS);
        model.advance();
        assert!(model.strips().iter().all(|s| s.position == 0.0));
        assert_eq!(model.foreground_position(), 0.0);
    }

    #[test]
    fn test_set_speed_clamps() {
        let mut model = ScrollModel::new(&INCREMENTS);
        model.set_speed(3.0);
        assert_eq!(model.speed(), 1.0);
        model.set_speed(-7.5);
        assert_eq!(model.speed(), -1.0);
    }
}
