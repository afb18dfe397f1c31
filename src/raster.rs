// 光柵效果表 - 每條掃描線要套用的背景位移與背景色
//
// 兩條規則鏈 (位置、顏色) 各自依序比對，第一個符合的規則生效。

use crate::color::Color;
use crate::error::{Error, Result};
use crate::lerp::{lerp_color, lerp_int};
use crate::scene::{BACKGROUND_STRIPS, SceneConfig, WATER_START_LINE};
use crate::scroll::ScrollModel;

/// 掃描線條件
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineMatch {
    Exact(i32),
    AtLeast(i32),
    Below(i32),
}

impl LineMatch {
    pub fn matches(&self, line: i32) -> bool {
        match *self {
            LineMatch::Exact(n) => line == n,
            LineMatch::AtLeast(n) => line >= n,
            LineMatch::Below(n) => line < n,
        }
    }
}

/// 背景位移來源
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionSource {
    /// 直接取某條帶的位置
    Strip(usize),
    /// 在 `lines` 區間內於兩條帶之間內插，區間外照樣外插
    Between {
        lines: (i32, i32),
        from: usize,
        to: usize,
    },
}

/// 掃描線區間 [start_line, end_line) 上的兩色漸層
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    start_line: i32,
    end_line: i32,
    top: Color,
    bottom: Color,
}

impl Gradient {
    pub fn new(start_line: i32, end_line: i32, top: Color, bottom: Color) -> Result<Self> {
        if start_line >= end_line {
            return Err(Error::InvalidGradient {
                start: start_line,
                end: end_line,
            });
        }
        Ok(Gradient {
            start_line,
            end_line,
            top,
            bottom,
        })
    }

    pub fn color_at(&self, line: i32) -> Color {
        lerp_color(line, self.start_line, self.end_line, self.top, self.bottom)
    }
}

/// 一條規則: 條件 + 動作
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule<A> {
    pub when: LineMatch,
    pub action: A,
}

impl<A> Rule<A> {
    pub fn new(when: LineMatch, action: A) -> Self {
        Rule { when, action }
    }
}

/// 單條掃描線的求值結果，`None` 表示沿用光柵器上的舊值
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RasterEffect {
    pub offset: Option<i32>,
    pub color: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct RasterEffectTable {
    position_rules: Vec<Rule<PositionSource>>,
    color_rules: Vec<Rule<Gradient>>,
    strip_count: usize,
}

impl RasterEffectTable {
    pub fn new(
        position_rules: Vec<Rule<PositionSource>>,
        color_rules: Vec<Rule<Gradient>>,
        strip_count: usize,
    ) -> Result<Self> {
        let check = |index: usize| {
            if index < strip_count {
                Ok(())
            } else {
                Err(Error::UnknownStrip {
                    index,
                    count: strip_count,
                })
            }
        };

        for rule in &position_rules {
            match rule.action {
                PositionSource::Strip(i) => check(i)?,
                PositionSource::Between { lines, from, to } => {
                    check(from)?;
                    check(to)?;
                    if lines.0 >= lines.1 {
                        return Err(Error::Config(format!(
                            "empty interpolation range [{}, {})",
                            lines.0, lines.1
                        )));
                    }
                }
            }
        }

        Ok(RasterEffectTable {
            position_rules,
            color_rules,
            strip_count,
        })
    }

    /// 參考場景的規則表: 上方五條帶各自在固定掃描線切換，
    /// 152 以下在帶 4 和帶 5 之間內插 (超過 224 繼續外插)；
    /// 天空漸層到 112，水面漸層從 144 到畫面底部。
    pub fn reference(scene: &SceneConfig) -> Result<Self> {
        let position_rules = vec![
            Rule::new(LineMatch::Exact(1), PositionSource::Strip(0)),
            Rule::new(LineMatch::Exact(32), PositionSource::Strip(1)),
            Rule::new(LineMatch::Exact(48), PositionSource::Strip(2)),
            Rule::new(LineMatch::Exact(64), PositionSource::Strip(3)),
            Rule::new(LineMatch::Exact(112), PositionSource::Strip(4)),
            Rule::new(
                LineMatch::AtLeast(152),
                PositionSource::Between {
                    lines: (152, 224),
                    from: 4,
                    to: 5,
                },
            ),
        ];

        let color_rules = vec![
            Rule::new(
                LineMatch::Below(112),
                Gradient::new(0, 112, scene.sky.top, scene.sky.bottom)?,
            ),
            Rule::new(
                LineMatch::AtLeast(WATER_START_LINE),
                Gradient::new(
                    WATER_START_LINE,
                    scene.height as i32,
                    scene.water.top,
                    scene.water.bottom,
                )?,
            ),
        ];

        Self::new(position_rules, color_rules, BACKGROUND_STRIPS)
    }

    pub fn strip_count(&self) -> usize {
        self.strip_count
    }

    /// 求某條掃描線的效果，純讀取模型
    pub fn evaluate(&self, line: i32, model: &ScrollModel) -> RasterEffect {
        RasterEffect {
            offset: self.position_at(line, model),
            color: self.color_at(line),
        }
    }

    fn position_at(&self, line: i32, model: &ScrollModel) -> Option<i32> {
        let rule = self.position_rules.iter().find(|r| r.when.matches(line))?;
        // 條帶位置先截斷成整數
        let strip = |i: usize| model.strips()[i].position as i32;
        Some(match rule.action {
            PositionSource::Strip(i) => strip(i),
            PositionSource::Between { lines, from, to } => {
                lerp_int(line, lines.0, lines.1, strip(from), strip(to))
            }
        })
    }

    fn color_at(&self, line: i32) -> Option<Color> {
        self.color_rules
            .iter()
            .find(|r| r.when.matches(line))
            .map(|r| r.action.color_at(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving_model(frames: usize) -> ScrollModel {
        let scene = SceneConfig::default();
        let mut model = ScrollModel::new(&scene.strip_increments);
        model.set_speed(1.0);
        for _ in 0..frames {
            model.advance();
        }
        model
    }

    #[test]
    fn test_line_one_uses_first_strip() {
        let table = RasterEffectTable::reference(&SceneConfig::default()).unwrap();
        let model = moving_model(37);
        let effect = table.evaluate(1, &model);
        assert_eq!(effect.offset, Some(model.strips()[0].position as i32));
    }

    #[test]
    fn test_fixed_lines_select_their_strip() {
        let table = RasterEffectTable::reference(&SceneConfig::default()).unwrap();
        let model = moving_model(100);
        for (line, strip) in [(32, 1), (48, 2), (64, 3), (112, 4)] {
            assert_eq!(
                table.evaluate(line, &model).offset,
                Some(model.strips()[strip].position as i32),
                "line {}",
                line
            );
        }
    }

    #[test]
    fn test_lines_between_rules_have_no_offset() {
        let table = RasterEffectTable::reference(&SceneConfig::default()).unwrap();
        let model = moving_model(10);
        for line in [2, 31, 33, 100, 113, 151] {
            assert_eq!(table.evaluate(line, &model).offset, None, "line {}", line);
        }
    }

    #[test]
    fn test_lower_band_interpolates_and_extrapolates() {
        let table = RasterEffectTable::reference(&SceneConfig::default()).unwrap();
        let model = moving_model(50);
        let s4 = model.strips()[4].position as i32;
        let s5 = model.strips()[5].position as i32;

        assert_eq!(table.evaluate(152, &model).offset, Some(s4));
        assert_eq!(table.evaluate(224, &model).offset, Some(s5));
        assert_eq!(
            table.evaluate(200, &model).offset,
            Some(lerp_int(200, 152, 224, s4, s5))
        );
        // 224 以下沒有上限，繼續外插
        assert_eq!(
            table.evaluate(239, &model).offset,
            Some(lerp_int(239, 152, 224, s4, s5))
        );
        assert!(table.evaluate(239, &model).offset > Some(s5));
    }

    #[test]
    fn test_color_dead_zone() {
        let table = RasterEffectTable::reference(&SceneConfig::default()).unwrap();
        let model = moving_model(0);
        assert_eq!(table.evaluate(112, &model).color, None);
        assert_eq!(table.evaluate(143, &model).color, None);
        assert!(table.evaluate(111, &model).color.is_some());
        assert!(table.evaluate(144, &model).color.is_some());
    }

    #[test]
    fn test_gradients_hit_their_endpoints() {
        let scene = SceneConfig::default();
        let table = RasterEffectTable::reference(&scene).unwrap();
        let model = moving_model(0);
        assert_eq!(table.evaluate(0, &model).color, Some(scene.sky.top));
        assert_eq!(table.evaluate(144, &model).color, Some(scene.water.top));
        // 最後一條可見線 (239) 還沒到 water.bottom
        let last = table.evaluate(239, &model).color.unwrap();
        assert_eq!(last, lerp_color(239, 144, 240, scene.water.top, scene.water.bottom));
    }

    #[test]
    fn test_evaluate_does_not_touch_model() {
        let table = RasterEffectTable::reference(&SceneConfig::default()).unwrap();
        let model = moving_model(5);
        let before = model.strips().to_vec();
        for line in 1..=240 {
            table.evaluate(line, &model);
        }
        assert_eq!(model.strips(), before.as_slice());
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // 兩條規則都符合 line 10，取排在前面的
        let table = RasterEffectTable::new(
            vec![
                Rule::new(LineMatch::AtLeast(5), PositionSource::Strip(1)),
                Rule::new(LineMatch::Exact(10), PositionSource::Strip(0)),
            ],
            vec![],
            2,
        )
        .unwrap();
        let mut model = ScrollModel::new(&[1.0, 4.0]);
        model.set_speed(1.0);
        model.advance();
        assert_eq!(table.evaluate(10, &model).offset, Some(4));
        assert_eq!(table.evaluate(10, &model).color, None);
    }

    #[test]
    fn test_invalid_gradient_rejected() {
        let c = Color::new(1, 2, 3);
        assert!(matches!(
            Gradient::new(144, 144, c, c),
            Err(Error::InvalidGradient { start: 144, end: 144 })
        ));
    }

    #[test]
    fn test_unknown_strip_rejected() {
        let err = RasterEffectTable::new(
            vec![Rule::new(LineMatch::Exact(1), PositionSource::Strip(6))],
            vec![],
            6,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownStrip { index: 6, count: 6 }));
    }
}
