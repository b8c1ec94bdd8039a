//! # Bounce 动画
//!
//! 以目标矩形中心为锚点的缩放振荡。
//!
//! ```text
//! floor = initial + (1 - initial) * p
//! range = (maximum - initial) * (1 - p)
//! scale = floor + range * |sin(π * n * p)|
//! ```
//!
//! `p = 0` 时缩放为 `initial`，`p = 1` 时为 1。`|sin|` 在 `[0, 1]` 上恰好有
//! `n` 个峰，与步进方向无关。

use std::f64::consts::PI;

use glam::{DMat4, DVec3};

use super::{Timeline, TransformAnimation};
use crate::geometry::AnimBox;
use crate::param::Param;
use crate::query::BoxQuery;
use crate::stepper::Stepper;

/// 默认参数
pub mod defaults {
    /// 初始缩放
    pub const INITIAL_SCALE: f64 = 0.7;
    /// 最大缩放
    pub const MAXIMUM_SCALE: f64 = 1.2;
    /// 振荡次数
    pub const N_BOUNCE: u32 = 1;
}

/// 振荡参数（每帧重新读取）
#[derive(Debug, Clone)]
pub struct BounceParams {
    pub initial_scale: Param<f64>,
    pub maximum_scale: Param<f64>,
    pub n_bounce: Param<u32>,
}

impl Default for BounceParams {
    fn default() -> Self {
        Self {
            initial_scale: Param::fixed(defaults::INITIAL_SCALE),
            maximum_scale: Param::fixed(defaults::MAXIMUM_SCALE),
            n_bounce: Param::fixed(defaults::N_BOUNCE),
        }
    }
}

/// 弹跳动画
pub struct BounceAnimation {
    params: BounceParams,
    target: Box<dyn BoxQuery>,
    timeline: Timeline,
    transform: DMat4,
}

impl BounceAnimation {
    pub fn new(params: BounceParams, target: Box<dyn BoxQuery>, stepper: Box<dyn Stepper>) -> Self {
        let mut anim = Self {
            params,
            target,
            timeline: Timeline::new(stepper),
            transform: DMat4::IDENTITY,
        };
        anim.transform = anim.compute_transform();
        anim
    }

    pub fn initial_scale(&self) -> f64 {
        self.params.initial_scale.get()
    }

    pub fn maximum_scale(&self) -> f64 {
        self.params.maximum_scale.get()
    }

    /// 振荡次数，0 按 1 处理
    pub fn n_bounce(&self) -> u32 {
        self.params.n_bounce.get().max(1)
    }

    pub fn target(&self) -> AnimBox {
        self.target.current_box()
    }

    /// 当前进度对应的缩放
    pub fn scale(&self) -> f64 {
        bounce_scale(
            self.timeline.progress(),
            self.initial_scale(),
            self.maximum_scale(),
            self.n_bounce(),
        )
    }

    fn compute_transform(&self) -> DMat4 {
        let scale = self.scale();
        let center = self.target().center_offset().extend(0.0);

        DMat4::from_translation(center)
            * DMat4::from_scale(DVec3::new(scale, scale, 1.0))
            * DMat4::from_translation(-center)
    }
}

fn bounce_scale(progress: f64, initial: f64, maximum: f64, n_bounce: u32) -> f64 {
    let floor = initial + (1.0 - initial) * progress;
    let range = (maximum - initial) * (1.0 - progress);
    floor + range * (PI * n_bounce as f64 * progress).sin().abs()
}

impl TransformAnimation for BounceAnimation {
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

impl std::fmt::Debug for BounceAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BounceAnimation")
            .field("params", &self.params)
            .field("target", &self.target())
            .field("timeline", &self.timeline)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Vector, Vector4};
    use crate::param::SharedValue;
    use crate::query::StaticBoxQuery;
    use crate::stepper::{LinearStepper, ReverseStepper};
    use crate::transform::test_util::{assert_near, is_identity};
    use crate::transform::transform_point;

    fn params(initial: f64, maximum: f64, n: u32) -> BounceParams {
        BounceParams {
            initial_scale: Param::fixed(initial),
            maximum_scale: Param::fixed(maximum),
            n_bounce: Param::fixed(n),
        }
    }

    fn bounce(stepper: Box<dyn Stepper>) -> BounceAnimation {
        BounceAnimation::new(
            params(0.7, 1.5, 1),
            Box::new(StaticBoxQuery::new(AnimBox::from_coords(0.0, 0.0, 100.0, 100.0))),
            stepper,
        )
    }

    #[test]
    fn test_initial_scale_at_start() {
        let anim = bounce(Box::new(LinearStepper::new(200u32)));

        // 0.7 缩放时左上角相对中心 (50, 50) 收缩到 (15, 15)
        let p = transform_point(&anim.matrix(), Vector::ZERO);
        assert_near(p, Vector4::new(15.0, 15.0, 0.0, 1.0));
    }

    #[test]
    fn test_unscaled_at_end() {
        let mut anim = bounce(Box::new(LinearStepper::new(200u32)));
        assert!(anim.step(199));
        assert!(!anim.step(200));

        let p = transform_point(&anim.matrix(), Vector::ZERO);
        assert_near(p, Vector4::new(0.0, 0.0, 0.0, 1.0));
        assert!(is_identity(&anim.matrix()));
    }

    #[test]
    fn test_peak_count_matches_n_bounce() {
        for n in 1..=4 {
            let mut scales = Vec::new();
            for i in 0..=1000 {
                scales.push(bounce_scale(i as f64 / 1000.0, 0.7, 1.5, n));
            }
            let peaks = scales
                .windows(3)
                .filter(|w| w[1] > w[0] && w[1] > w[2])
                .count();
            assert_eq!(peaks, n as usize, "n_bounce = {}", n);
        }
    }

    #[test]
    fn test_reverse_direction_same_peaks() {
        let mut anim = BounceAnimation::new(
            params(0.7, 1.5, 3),
            Box::new(StaticBoxQuery::new(AnimBox::from_coords(0.0, 0.0, 100.0, 100.0))),
            Box::new(ReverseStepper::new(Box::new(LinearStepper::new(1000u32)))),
        );

        let mut scales = Vec::new();
        for elapsed in 0..=1000 {
            anim.step(elapsed);
            scales.push(anim.scale());
        }
        let peaks = scales
            .windows(3)
            .filter(|w| w[1] > w[0] && w[1] > w[2])
            .count();
        assert_eq!(peaks, 3);
        assert!((scales[1000] - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_zero_bounce_treated_as_one() {
        let anim = BounceAnimation::new(
            params(0.7, 1.5, 0),
            Box::new(StaticBoxQuery::new(AnimBox::default())),
            Box::new(LinearStepper::new(10u32)),
        );
        assert_eq!(anim.n_bounce(), 1);
    }

    #[test]
    fn test_params_are_read_per_frame() {
        let initial = SharedValue::new(0.7);
        let mut anim = BounceAnimation::new(
            BounceParams {
                initial_scale: initial.param(),
                ..BounceParams::default()
            },
            Box::new(StaticBoxQuery::new(AnimBox::from_coords(0.0, 0.0, 100.0, 100.0))),
            Box::new(LinearStepper::new(200u32)),
        );

        initial.set(0.5);
        anim.step(0);
        assert_eq!(anim.scale(), 0.5);
        assert_eq!(anim.initial_scale(), 0.5);
    }
}
