//! # Transform 模块
//!
//! 产生 4×4 仿射/透视矩阵的变换动画。
//!
//! ## 变体
//!
//! - [`ZoomAnimation`]：源矩形到目标矩形的平移与缩放
//! - [`BounceAnimation`]：以目标中心为锚点的缩放振荡
//! - [`GlideAnimation`]：绕窗口内轴线的三维透视旋转
//!
//! ## 坐标约定
//!
//! 矩阵作用于 actor 局部坐标（原点为 actor 左上角），是对调用方已有变换的补充。
//! 调用方需要先叠加自身位置才能得到世界坐标。进度为 1 时矩阵为单位阵。

pub mod bounce;
pub mod glide;
pub mod zoom;

pub use bounce::{BounceAnimation, BounceParams};
pub use glide::{GlideAnimation, GlideParams};
pub use zoom::ZoomAnimation;

use glam::DMat4;

use crate::geometry::{Vector, Vector4, project};
use crate::stepper::Stepper;

/// 变换动画接口
pub trait TransformAnimation {
    /// 推进到 `elapsed`，动画仍在进行返回 `true`
    fn step(&mut self, elapsed: i64) -> bool;

    /// 当前进度
    fn progress(&self) -> f64;

    /// 当前矩阵
    fn matrix(&self) -> DMat4;

    /// 使用的步进器
    fn stepper(&self) -> &dyn Stepper;

    /// 变换后的四个角点（已做透视除法）
    fn extremes(&self, corners: &[Vector; 4]) -> [Vector4; 4] {
        let matrix = self.matrix();
        corners.map(|corner| transform_point(&matrix, corner))
    }
}

/// 将平面点 `(x, y, 0, 1)` 变换并做透视除法
pub fn transform_point(matrix: &DMat4, point: Vector) -> Vector4 {
    project(*matrix * Vector4::new(point.x, point.y, 0.0, 1.0))
}

/// 步进器与进度
///
/// 各动画共用：构造时以 `step(0)` 初始化进度。
pub(crate) struct Timeline {
    stepper: Box<dyn Stepper>,
    progress: f64,
}

impl Timeline {
    pub(crate) fn new(stepper: Box<dyn Stepper>) -> Self {
        let progress = stepper.step(0).clamp(0.0, 1.0);
        Self { stepper, progress }
    }

    /// 更新进度，返回是否仍在进行
    pub(crate) fn advance(&mut self, elapsed: i64) -> bool {
        self.progress = self.stepper.step(elapsed).clamp(0.0, 1.0);
        self.is_running()
    }

    pub(crate) fn progress(&self) -> f64 {
        self.progress
    }

    pub(crate) fn is_running(&self) -> bool {
        self.progress != 0.0 && self.progress != 1.0
    }

    pub(crate) fn stepper(&self) -> &dyn Stepper {
        self.stepper.as_ref()
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("length", &self.stepper.length())
            .field("progress", &self.progress)
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::stepper::{LinearStepper, ReverseStepper};

    #[test]
    fn test_timeline_initial_progress() {
        let forward = Timeline::new(Box::new(LinearStepper::new(10u32)));
        assert_eq!(forward.progress(), 0.0);
        assert!(!forward.is_running());

        let reverse = Timeline::new(Box::new(ReverseStepper::new(Box::new(
            LinearStepper::new(10u32),
        ))));
        assert_eq!(reverse.progress(), 1.0);
    }

    #[test]
    fn test_timeline_running_window() {
        let mut timeline = Timeline::new(Box::new(LinearStepper::new(10u32)));
        assert!(timeline.advance(1));
        assert!(timeline.advance(9));
        assert!(!timeline.advance(10));
        // 乱序回退也只是钳制
        assert!(timeline.advance(5));
        assert_eq!(timeline.progress(), 0.5);
    }

    #[test]
    fn test_transform_point_identity() {
        let p = transform_point(&DMat4::IDENTITY, Vector::new(3.0, 4.0));
        assert_eq!(p, Vector4::new(3.0, 4.0, 0.0, 1.0));
    }
}
