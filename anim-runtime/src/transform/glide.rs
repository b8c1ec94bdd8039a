//! # Glide 动画
//!
//! 三维透视旋转：窗口绕自身内部的一条轴线旋转，同时沿 z 轴远离/靠近观察者，
//! 随进度回到原位。
//!
//! ## 矩阵构成
//!
//! 记 `q = 1 - p`，`axis` 为轴线在 actor 局部坐标中的位置：
//!
//! ```text
//! M = P(q) * T(axis) * Tz(distance * q * d / 2) * Rx(ax * q) * Ry(ay * q) * T(-axis)
//! ```
//!
//! `P(q)` 是以视口中心为消失点、强度随 `q` 衰减的透视矩阵，`d` 为相机距离
//! （视口较长边的两倍）。`q = 0` 时每一项都是单位阵。

use glam::{DMat4, DVec3, DVec4};

use super::{Timeline, TransformAnimation};
use crate::geometry::{AnimBox, Vector};
use crate::param::Param;
use crate::query::BoxQuery;
use crate::stepper::Stepper;

/// 默认参数
pub mod defaults {
    /// 初始距离（相对相机距离，负值远离观察者）
    pub const INITIAL_DISTANCE: f64 = -0.3;
    pub const X_ROTATION_ANGLE_DEGREES: f64 = 0.0;
    pub const Y_ROTATION_ANGLE_DEGREES: f64 = 0.0;
    /// 轴线横向位置（窗口宽度的比例）
    pub const X_AXIS_LOCATION_UNIT: f64 = 0.2;
    /// 轴线纵向位置（窗口高度的比例）
    pub const Y_AXIS_LOCATION_UNIT: f64 = 0.5;
}

/// 滑行参数（每帧重新读取）
#[derive(Debug, Clone)]
pub struct GlideParams {
    pub initial_distance: Param<f64>,
    pub x_rotation_angle_degrees: Param<f64>,
    pub y_rotation_angle_degrees: Param<f64>,
    pub x_axis_location_unit: Param<f64>,
    pub y_axis_location_unit: Param<f64>,
}

impl Default for GlideParams {
    fn default() -> Self {
        Self {
            initial_distance: Param::fixed(defaults::INITIAL_DISTANCE),
            x_rotation_angle_degrees: Param::fixed(defaults::X_ROTATION_ANGLE_DEGREES),
            y_rotation_angle_degrees: Param::fixed(defaults::Y_ROTATION_ANGLE_DEGREES),
            x_axis_location_unit: Param::fixed(defaults::X_AXIS_LOCATION_UNIT),
            y_axis_location_unit: Param::fixed(defaults::Y_AXIS_LOCATION_UNIT),
        }
    }
}

/// 滑行动画
pub struct GlideAnimation {
    params: GlideParams,
    viewport: Box<dyn BoxQuery>,
    target: Box<dyn BoxQuery>,
    timeline: Timeline,
    transform: DMat4,
}

impl GlideAnimation {
    pub fn new(
        params: GlideParams,
        viewport: Box<dyn BoxQuery>,
        target: Box<dyn BoxQuery>,
        stepper: Box<dyn Stepper>,
    ) -> Self {
        let mut anim = Self {
            params,
            viewport,
            target,
            timeline: Timeline::new(stepper),
            transform: DMat4::IDENTITY,
        };
        anim.transform = anim.compute_transform();
        anim
    }

    pub fn params(&self) -> &GlideParams {
        &self.params
    }

    pub fn viewport(&self) -> AnimBox {
        self.viewport.current_box()
    }

    pub fn target(&self) -> AnimBox {
        self.target.current_box()
    }

    fn compute_transform(&self) -> DMat4 {
        let remaining = 1.0 - self.timeline.progress();
        let viewport = self.viewport();
        let target = self.target();

        let camera_distance = 2.0 * viewport.width().abs().max(viewport.height().abs()).max(1.0);

        let axis = Vector::new(
            self.params.x_axis_location_unit.get() * target.width(),
            self.params.y_axis_location_unit.get() * target.height(),
        )
        .extend(0.0);

        let x_angle = self.params.x_rotation_angle_degrees.get().to_radians() * remaining;
        let y_angle = self.params.y_rotation_angle_degrees.get().to_radians() * remaining;
        let depth = self.params.initial_distance.get() * remaining * camera_distance * 0.5;

        // 消失点：视口中心在 actor 局部坐标中的位置
        let vanishing = viewport.center() - target.top_left;

        perspective(vanishing, remaining / camera_distance)
            * DMat4::from_translation(axis)
            * DMat4::from_translation(DVec3::new(0.0, 0.0, depth))
            * DMat4::from_rotation_x(x_angle)
            * DMat4::from_rotation_y(y_angle)
            * DMat4::from_translation(-axis)
    }
}

/// 以 `center` 为消失点的透视矩阵，`strength = 1 / 相机距离`
///
/// 对 z = 0 平面上的点是恒等变换；`strength` 为 0 时矩阵即单位阵。
fn perspective(center: Vector, strength: f64) -> DMat4 {
    DMat4::from_cols(
        DVec4::new(1.0, 0.0, 0.0, 0.0),
        DVec4::new(0.0, 1.0, 0.0, 0.0),
        DVec4::new(-center.x * strength, -center.y * strength, 1.0, -strength),
        DVec4::new(0.0, 0.0, 0.0, 1.0),
    )
}

impl TransformAnimation for GlideAnimation {
    fn step(&mut self, elapsed: i64) -> bool {
        let running = self.timeline.advance(elapsed);
        self.transform = self.compute_transform();
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

impl std::fmt::Debug for GlideAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlideAnimation")
            .field("params", &self.params)
            .field("viewport", &self.viewport())
            .field("target", &self.target())
            .field("timeline", &self.timeline)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vector4;
    use crate::query::StaticBoxQuery;
    use crate::stepper::LinearStepper;
    use crate::transform::test_util::{assert_near, is_identity};
    use crate::transform::transform_point;

    fn glide() -> GlideAnimation {
        GlideAnimation::new(
            GlideParams {
                initial_distance: Param::fixed(0.5),
                x_rotation_angle_degrees: Param::fixed(0.0),
                y_rotation_angle_degrees: Param::fixed(20.0),
                x_axis_location_unit: Param::fixed(0.5),
                y_axis_location_unit: Param::fixed(0.0),
            },
            Box::new(StaticBoxQuery::new(AnimBox::from_coords(0.0, 0.0, 1000.0, 100.0))),
            Box::new(StaticBoxQuery::new(AnimBox::from_coords(0.0, 0.0, 100.0, 100.0))),
            Box::new(LinearStepper::new(200u32)),
        )
    }

    #[test]
    fn test_identity_at_end() {
        let mut anim = glide();
        assert!(!anim.step(200));

        let p = transform_point(&anim.matrix(), Vector::new(100.0, 100.0));
        assert_near(p, Vector4::new(100.0, 100.0, 0.0, 1.0));
        assert!(is_identity(&anim.matrix()));
    }

    #[test]
    fn test_differs_from_identity_at_start() {
        let anim = glide();
        assert!(!is_identity(&anim.matrix()));

        let p = transform_point(&anim.matrix(), Vector::new(100.0, 100.0));
        assert!((p.x - 100.0).abs() > 1e-3 || (p.y - 100.0).abs() > 1e-3);
    }

    #[test]
    fn test_axis_point_stays_fixed_without_depth() {
        // 纯旋转时轴线上的点不动
        let anim = GlideAnimation::new(
            GlideParams {
                initial_distance: Param::fixed(0.0),
                x_rotation_angle_degrees: Param::fixed(0.0),
                y_rotation_angle_degrees: Param::fixed(45.0),
                x_axis_location_unit: Param::fixed(0.5),
                y_axis_location_unit: Param::fixed(0.5),
            },
            Box::new(StaticBoxQuery::new(AnimBox::from_coords(0.0, 0.0, 1000.0, 1000.0))),
            Box::new(StaticBoxQuery::new(AnimBox::from_coords(0.0, 0.0, 100.0, 100.0))),
            Box::new(LinearStepper::new(10u32)),
        );

        let p = transform_point(&anim.matrix(), Vector::new(50.0, 20.0));
        assert_near(p, Vector4::new(50.0, 20.0, 0.0, 1.0));
    }

    #[test]
    fn test_negative_distance_shrinks() {
        let anim = GlideAnimation::new(
            GlideParams::default(),
            Box::new(StaticBoxQuery::new(AnimBox::from_coords(0.0, 0.0, 1000.0, 1000.0))),
            Box::new(StaticBoxQuery::new(AnimBox::from_coords(450.0, 450.0, 550.0, 550.0))),
            Box::new(LinearStepper::new(10u32)),
        );

        let corners = AnimBox::from_coords(0.0, 0.0, 100.0, 100.0).corners();
        let [tl, tr, _, _] = anim.extremes(&corners);
        assert!(tr.x - tl.x < 100.0);
    }

    #[test]
    fn test_halfway_is_finite() {
        let mut anim = glide();
        assert!(anim.step(100));
        assert!(anim.matrix().is_finite());
        assert_eq!(anim.progress(), 0.5);
    }
}
