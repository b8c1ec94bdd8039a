//! # Zoom 动画
//!
//! 在源矩形与目标矩形之间线性插值平移和 X/Y 独立缩放。
//!
//! 进度为 0 时 actor 恰好覆盖源矩形，进度为 1 时覆盖目标矩形
//! （目标即 actor 当前矩形时矩阵为单位阵）。

use glam::{DMat4, DVec3};

use super::{Timeline, TransformAnimation};
use crate::geometry::{AnimBox, Vector};
use crate::query::BoxQuery;
use crate::stepper::Stepper;

/// 缩放动画
pub struct ZoomAnimation {
    source: Box<dyn BoxQuery>,
    target: Box<dyn BoxQuery>,
    timeline: Timeline,
    transform: DMat4,
}

impl ZoomAnimation {
    pub fn new(
        source: Box<dyn BoxQuery>,
        target: Box<dyn BoxQuery>,
        stepper: Box<dyn Stepper>,
    ) -> Self {
        let timeline = Timeline::new(stepper);
        let transform = zoom_transform(
            timeline.progress(),
            source.current_box(),
            target.current_box(),
        );

        Self {
            source,
            target,
            timeline,
            transform,
        }
    }

    /// 源矩形
    pub fn source(&self) -> AnimBox {
        self.source.current_box()
    }

    /// 目标矩形
    pub fn target(&self) -> AnimBox {
        self.target.current_box()
    }
}

impl TransformAnimation for ZoomAnimation {
    fn step(&mut self, elapsed: i64) -> bool {
        let running = self.timeline.advance(elapsed);
        self.transform = zoom_transform(
            self.timeline.progress(),
            self.source.current_box(),
            self.target.current_box(),
        );
        running
    }

    fn progress(&self) -> f64 {
        self.timeline.progress()
    }

    fn matrix(&self) -> DMat4 {
        self.transform
    }

    fn stepper(&self) -> &dyn Stepper {
        self.timeline.stepper()
    }
}

impl std::fmt::Debug for ZoomAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomAnimation")
            .field("source", &self.source())
            .field("target", &self.target())
            .field("timeline", &self.timeline)
            .finish()
    }
}

/// 单轴缩放因子，目标尺寸为零时取 1
fn axis_scale(from: f64, to: f64, progress: f64) -> f64 {
    if to == 0.0 {
        return 1.0;
    }
    (to * progress + from * (1.0 - progress)) / to
}

/// 计算缩放矩阵
///
/// 变换顺序（右乘，从右往左）：移到目标中心、缩放、移回、沿路径平移。
fn zoom_transform(progress: f64, from: AnimBox, to: AnimBox) -> DMat4 {
    let from = from.ensure_non_zero_area();

    let translation = (from.center() - to.center()) * (1.0 - progress);
    let scale = Vector::new(
        axis_scale(from.width(), to.width(), progress),
        axis_scale(from.height(), to.height(), progress),
    );
    let center = to.center_offset();

    DMat4::from_translation(translation.extend(0.0))
        * DMat4::from_translation(center.extend(0.0))
        * DMat4::from_scale(DVec3::new(scale.x, scale.y, 1.0))
        * DMat4::from_translation(-center.extend(0.0))
}
