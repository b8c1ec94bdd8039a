//! # MagicLamp 动画
//!
//! 窗口被“吸入”图标（或从图标“吹出”）的网格形变。
//!
//! ## 形变模型
//!
//! 记 `q = 1 - p`。沿运动轴（源与目标中心相距较远的那一轴）：
//!
//! ```text
//! s     = 网格行到源一侧边缘的距离（0..1）
//! m     = clamp(q * (1 + stretch) - stretch * s, 0, 1)     沿轴混合
//! along = lerp(target(v), source(v), m)
//! d     = clamp(q * deform_speed, 0, 1)
//! σ     = 1 / (1 + exp(bend * (s - offset)))
//! c     = lerp(d * σ, 1, m)                                 横向收窄
//! cross = lerp(target(u), source(u), c)
//! ```
//!
//! 靠近源的行先被拉向源，形成一道沿运动轴传播的波；`σ` 让靠近源一侧的横截面
//! 先收窄成漏斗形。`q = 0` 时 `m = d = 0`，网格恰好覆盖目标矩形。

use super::{GridAnimation, MAX_RESOLUTION};
use crate::geometry::{AnimBox, Vector, Vector4};
use crate::param::Param;
use crate::query::BoxQuery;
use crate::stepper::Stepper;
use crate::transform::Timeline;

/// 默认参数
pub mod defaults {
    pub const BEND_FACTOR: f64 = 10.0;
    pub const OFFSET_FACTOR: f64 = 0.5;
    pub const STRETCH_FACTOR: f64 = 0.45;
    pub const DEFORM_SPEED_FACTOR: f64 = 2.3;
}

/// 形变参数（每帧重新读取）
#[derive(Debug, Clone)]
pub struct MagicLampParams {
    /// 漏斗曲率
    pub bend_factor: Param<f64>,
    /// 漏斗收窄处在运动轴上的位置
    pub offset_factor: Param<f64>,
    /// 沿运动轴的拉伸
    pub stretch_factor: Param<f64>,
    /// 横向收窄相对步进器的速度
    pub deform_speed_factor: Param<f64>,
}

impl Default for MagicLampParams {
    fn default() -> Self {
        Self {
            bend_factor: Param::fixed(defaults::BEND_FACTOR),
            offset_factor: Param::fixed(defaults::OFFSET_FACTOR),
            stretch_factor: Param::fixed(defaults::STRETCH_FACTOR),
            deform_speed_factor: Param::fixed(defaults::DEFORM_SPEED_FACTOR),
        }
    }
}

/// 神灯动画
pub struct MagicLampAnimation {
    params: MagicLampParams,
    source: Box<dyn BoxQuery>,
    target: Box<dyn BoxQuery>,
    resolution: Vector,
    timeline: Timeline,
}

impl MagicLampAnimation {
    /// `resolution` 每个轴钳制到 `[2, MAX_RESOLUTION]`，非有限值按 2 处理
    pub fn new(
        params: MagicLampParams,
        source: Box<dyn BoxQuery>,
        target: Box<dyn BoxQuery>,
        resolution: Vector,
        stepper: Box<dyn Stepper>,
    ) -> Self {
        Self {
            params,
            source,
            target,
            resolution: clamp_resolution(resolution),
            timeline: Timeline::new(stepper),
        }
    }

    pub fn params(&self) -> &MagicLampParams {
        &self.params
    }

    pub fn source(&self) -> AnimBox {
        self.source.current_box()
    }

    pub fn target(&self) -> AnimBox {
        self.target.current_box()
    }

    fn deform(&self, uv: Vector, source: AnimBox, target: AnimBox) -> Vector {
        let remaining = 1.0 - self.timeline.progress();

        let stretch = self.params.stretch_factor.get();
        let bend = self.params.bend_factor.get();
        let offset = self.params.offset_factor.get();
        let deform_speed = self.params.deform_speed_factor.get();

        let delta = source.center() - target.center();
        let vertical = delta.y.abs() >= delta.x.abs();

        // (沿轴, 横向) 分量
        let (along_uv, cross_uv, source_after) = if vertical {
            (uv.y, uv.x, delta.y > 0.0)
        } else {
            (uv.x, uv.y, delta.x > 0.0)
        };

        let from_source = if source_after {
            1.0 - along_uv
        } else {
            along_uv
        };

        let mix = (remaining * (1.0 + stretch) - stretch * from_source).clamp(0.0, 1.0);
        let deform = (remaining * deform_speed).clamp(0.0, 1.0);
        let sigmoid = 1.0 / (1.0 + (bend * (from_source - offset)).exp());
        let narrow = lerp(deform * sigmoid, 1.0, mix);

        let (source_along, source_cross, target_along, target_cross) = if vertical {
            (
                (source.top_left.y, source.bottom_right.y),
                (source.top_left.x, source.bottom_right.x),
                (target.top_left.y, target.bottom_right.y),
                (target.top_left.x, target.bottom_right.x),
            )
        } else {
            (
                (source.top_left.x, source.bottom_right.x),
                (source.top_left.y, source.bottom_right.y),
                (target.top_left.x, target.bottom_right.x),
                (target.top_left.y, target.bottom_right.y),
            )
        };

        let along = lerp(
            lerp(target_along.0, target_along.1, along_uv),
            lerp(source_along.0, source_along.1, along_uv),
            mix,
        );
        let cross = lerp(
            lerp(target_cross.0, target_cross.1, cross_uv),
            lerp(source_cross.0, source_cross.1, cross_uv),
            narrow,
        );

        if vertical {
            Vector::new(cross, along)
        } else {
            Vector::new(along, cross)
        }
    }
}

fn clamp_resolution(resolution: Vector) -> Vector {
    let clamp = |n: f64| {
        if n.is_finite() {
            n.clamp(2.0, MAX_RESOLUTION as f64)
        } else {
            2.0
        }
    };
    Vector::new(clamp(resolution.x), clamp(resolution.y))
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl GridAnimation for MagicLampAnimation {
    fn step(&mut self, elapsed: i64) -> bool {
        self.timeline.advance(elapsed)
    }

    fn progress(&self) -> f64 {
        self.timeline.progress()
    }

    fn resolution(&self) -> Vector {
        self.resolution
    }

    fn deform_uv_to_model_space(&self, uv: Vector) -> Vector {
        self.deform(uv, self.source(), self.target())
    }

    /// `corners` 为 actor 局部坐标，结果为合成器坐标
    fn extremes(&self, corners: &[Vector; 4]) -> [Vector4; 4] {
        let source = self.source();
        let target = self.target();

        corners.map(|corner| {
            let uv = target.normalize(target.top_left + corner);
            self.deform(uv, source, target).extend(0.0).extend(1.0)
        })
    }

    fn stepper(&self) -> &dyn Stepper {
        self.timeline.stepper()
    }
}

impl std::fmt::Debug for MagicLampAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagicLampAnimation")
            .field("params", &self.params)
            .field("source", &self.source())
            .field("target", &self.target())
            .field("resolution", &self.resolution)
            .field("timeline", &self.timeline)
            .finish()
    }
}
