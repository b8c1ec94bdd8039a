//! 网格动画驱动与 magic lamp 的事件配置。

use tracing::debug;

use super::{Activation, Completion, Effect, EffectEvent, EffectTarget, EventDetail, PaintState};
use crate::error::{EffectError, EffectResult};
use crate::geometry::{AnimBox, Vector, Vector4};
use crate::grid::{GridAnimation, MagicLampAnimation, MagicLampParams};
use crate::paint::{enlarge_for_effects, expand_with_extremes};
use crate::param::Param;
use crate::query::StaticBoxQuery;
use crate::stepper::DEFAULT_LENGTH;

/// 为某个事件构建网格动画
pub trait GridSetup {
    /// 效果名称
    const NAME: &'static str;

    /// 构建动画；不支持的事件返回 [`EffectError::UnsupportedEvent`]
    fn build(
        &self,
        event: EffectEvent,
        detail: &EventDetail,
        target: &EffectTarget,
    ) -> EffectResult<Box<dyn GridAnimation>>;
}

/// 网格动画效果
pub struct GridEffect<S: GridSetup> {
    setup: S,
    target: EffectTarget,
    activation: Activation,
    animation: Option<Box<dyn GridAnimation>>,
    elapsed: i64,
}

impl<S: GridSetup> GridEffect<S> {
    pub fn new(setup: S, target: EffectTarget) -> Self {
        Self {
            setup,
            target,
            activation: Activation::new(),
            animation: None,
            elapsed: 0,
        }
    }

    pub fn setup(&self) -> &S {
        &self.setup
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    pub fn animation(&self) -> Option<&dyn GridAnimation> {
        self.animation.as_deref()
    }

    /// 纹理坐标形变后在 actor 局部坐标中的位置，未播放时不形变
    pub fn deform_vertex(&self, uv: Vector) -> Vector {
        let actor_box = self.target.actor_box();
        match &self.animation {
            Some(animation) if self.activation.is_enabled() => {
                animation.deform_uv_to_model_space(uv) - actor_box.top_left
            }
            _ => uv * actor_box.size(),
        }
    }

    /// 可见窗口四角形变后的位置（合成器坐标）
    pub fn extremes(&self) -> Option<[Vector4; 4]> {
        let animation = self.animation.as_ref()?;
        let visible = self.target.visible_box();
        let local = AnimBox::from_origin_size(Vector::ZERO, visible.size()).corners();
        Some(animation.extremes(&local))
    }
}

impl<S: GridSetup> Effect for GridEffect<S> {
    fn name(&self) -> &'static str {
        S::NAME
    }

    fn activate(&mut self, event: &str, detail: &EventDetail, done: Completion) -> bool {
        let built = event
            .parse::<EffectEvent>()
            .and_then(|event| self.setup.build(event, detail, &self.target));

        let animation = match built {
            Ok(animation) => animation,
            Err(e) => {
                debug!(effect = S::NAME, error = %e, "事件未处理");
                return false;
            }
        };

        self.elapsed = 0;
        self.animation = Some(animation);
        self.activation.begin(done);

        debug!(effect = S::NAME, event = %event, "网格动画已激活");
        true
    }

    fn remove(&mut self) {
        self.animation = None;
        self.activation.remove();
    }

    fn is_enabled(&self) -> bool {
        self.activation.is_enabled()
    }

    fn tick(&mut self, delta: i64) {
        assert!(
            self.activation.count() > 0,
            "效果 '{}' 从未激活就被推进",
            S::NAME
        );
        if delta <= 0 || !self.activation.is_enabled() {
            return;
        }
        let Some(animation) = self.animation.as_mut() else {
            return;
        };

        self.elapsed += delta;
        if !animation.step(self.elapsed) {
            debug!(effect = S::NAME, elapsed = self.elapsed, "网格动画结束");
            self.activation.set_enabled(false);
        }
    }

    fn paint_state(&self) -> PaintState {
        match &self.animation {
            Some(animation) if self.activation.is_enabled() => {
                let origin = self.target.actor_box().top_left;
                PaintState::Mesh(animation.mesh().translate(-origin))
            }
            _ => PaintState::Identity,
        }
    }

    fn paint_box(&self) -> Option<AnimBox> {
        if !self.activation.is_enabled() {
            return None;
        }
        let extremes = self.extremes()?;
        Some(expand_with_extremes(
            enlarge_for_effects(self.target.actor_box()),
            &extremes,
            Vector::ZERO,
        ))
    }
}

/// magic lamp 配置
#[derive(Debug, Clone)]
pub struct MagicLampSetup {
    pub length: Param<u32>,
    pub params: MagicLampParams,
    /// 网格分辨率（列, 行）
    pub resolution: Vector,
}

impl MagicLampSetup {
    /// 默认网格：横向 2 列，纵向 100 行
    pub const RESOLUTION: Vector = Vector::new(2.0, 100.0);
}

impl Default for MagicLampSetup {
    fn default() -> Self {
        Self {
            length: Param::fixed(DEFAULT_LENGTH),
            params: MagicLampParams::default(),
            resolution: Self::RESOLUTION,
        }
    }
}

impl GridSetup for MagicLampSetup {
    const NAME: &'static str = "magiclamp";

    fn build(
        &self,
        event: EffectEvent,
        detail: &EventDetail,
        target: &EffectTarget,
    ) -> EffectResult<Box<dyn GridAnimation>> {
        if !matches!(event, EffectEvent::Minimize | EffectEvent::Unminimize) {
            return Err(EffectError::UnsupportedEvent {
                effect: Self::NAME,
                event: event.as_str(),
            });
        }
        let icon = detail.icon.ok_or(EffectError::MissingDetail {
            event: event.as_str(),
            field: "icon",
        })?;

        Ok(Box::new(MagicLampAnimation::new(
            self.params.clone(),
            Box::new(StaticBoxQuery::new(icon)),
            target.visible_query(),
            self.resolution,
            event.direction().stepper(self.length.clone()),
        )))
    }
}

pub type MagicLampEffect = GridEffect<MagicLampSetup>;
