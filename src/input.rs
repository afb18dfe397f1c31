// 輸入 - 方向鍵與每幀的輸入快照

use clap::ValueEnum;

/// 捲動會讀取的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

/// 一幀開始時的按鍵狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
}

impl InputSnapshot {
    #[cfg(test)]
    pub fn new(left: bool, right: bool) -> Self {
        InputSnapshot { left, right }
    }

    // 從任何能回報方向鍵的來源讀取
    pub fn poll<F: Fn(Direction) -> bool>(is_pressed: F) -> Self {
        InputSnapshot {
            left: is_pressed(Direction::Left),
            right: is_pressed(Direction::Right),
        }
    }
}

/// 無視窗模式下的固定按鍵 (命令列 `--hold`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Hold {
    Left,
    Right,
    Both,
}

impl Hold {
    pub fn is_pressed(self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (Hold::Both, _) | (Hold::Left, Direction::Left) | (Hold::Right, Direction::Right)
        )
    }
}
