//! 矩阵动画驱动与 zoom / bounce / glide 的事件配置。

use glam::DMat4;
use tracing::debug;

use super::{Activation, Completion, Effect, EffectEvent, EffectTarget, EventDetail, PaintState};
use crate::error::{EffectError, EffectResult};
use crate::geometry::{AnimBox, Vector};
use crate::param::Param;
use crate::query::StaticBoxQuery;
use crate::stepper::DEFAULT_LENGTH;
use crate::transform::{
    BounceAnimation, BounceParams, GlideAnimation, GlideParams, TransformAnimation, ZoomAnimation,
};

/// 为某个事件构建矩阵动画
pub trait AffineSetup {
    /// 效果名称
    const NAME: &'static str;

    /// 构建动画；不支持的事件返回 [`EffectError::UnsupportedEvent`]
    fn build(
        &self,
        event: EffectEvent,
        detail: &EventDetail,
        target: &EffectTarget,
    ) -> EffectResult<Box<dyn TransformAnimation>>;
}

fn unsupported<S: AffineSetup>(event: EffectEvent) -> EffectError {
    EffectError::UnsupportedEvent {
        effect: S::NAME,
        event: event.as_str(),
    }
}

/// 矩阵动画效果
///
/// 每次推进累加经过时间并调用 `step`。播放期间不透明度为 `progress × 255`；
/// `step` 返回 `false` 后恢复单位矩阵与完全不透明，并清除 `enabled`。
pub struct AffineEffect<S: AffineSetup> {
    setup: S,
    target: EffectTarget,
    activation: Activation,
    animation: Option<Box<dyn TransformAnimation>>,
    elapsed: i64,
    matrix: DMat4,
    opacity: u8,
}

impl<S: AffineSetup> AffineEffect<S> {
    pub fn new(setup: S, target: EffectTarget) -> Self {
        Self {
            setup,
            target,
            activation: Activation::new(),
            animation: None,
            elapsed: 0,
            matrix: DMat4::IDENTITY,
            opacity: 255,
        }
    }

    pub fn setup(&self) -> &S {
        &self.setup
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// 当前（或最近一次）动画
    pub fn animation(&self) -> Option<&dyn TransformAnimation> {
        self.animation.as_deref()
    }

    pub fn matrix(&self) -> DMat4 {
        self.matrix
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    fn apply(&mut self, progress: f64, matrix: DMat4) {
        self.matrix = matrix;
        self.opacity = (progress.clamp(0.0, 1.0) * 255.0).round() as u8;
    }

    fn reset(&mut self) {
        self.matrix = DMat4::IDENTITY;
        self.opacity = 255;
    }
}

impl<S: AffineSetup> Effect for AffineEffect<S> {
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
        self.apply(animation.progress(), animation.matrix());
        self.animation = Some(animation);
        self.activation.begin(done);

        debug!(effect = S::NAME, event = %event, "动画已激活");
        true
    }

    fn remove(&mut self) {
        self.animation = None;
        self.reset();
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
        let running = animation.step(self.elapsed);
        let (progress, matrix) = (animation.progress(), animation.matrix());

        if running {
            self.apply(progress, matrix);
        } else {
            self.reset();
            debug!(effect = S::NAME, elapsed = self.elapsed, "动画结束");
            self.activation.set_enabled(false);
        }
    }

    fn paint_state(&self) -> PaintState {
        if !self.activation.is_enabled() {
            return PaintState::Identity;
        }
        PaintState::Affine {
            matrix: self.matrix,
            opacity: self.opacity,
        }
    }

    fn paint_box(&self) -> Option<AnimBox> {
        let animation = self.animation.as_ref()?;
        if !self.activation.is_enabled() {
            return None;
        }

        let actor_box = self.target.actor_box();
        let local = AnimBox::from_origin_size(Vector::ZERO, actor_box.size()).corners();
        Some(super::local_paint_box(actor_box, animation.extremes(&local)))
    }
}

/// 指针处的 1×1 矩形，缺省取 actor 中心
fn pointer_box(detail: &EventDetail, target: &EffectTarget) -> AnimBox {
    let pointer = detail.pointer.unwrap_or_else(|| target.actor_box().center());
    AnimBox::from_origin_size(pointer, Vector::ONE)
}

fn icon_box(event: EffectEvent, detail: &EventDetail) -> EffectResult<AnimBox> {
    detail.icon.ok_or(EffectError::MissingDetail {
        event: event.as_str(),
        field: "icon",
    })
}

/// zoom 配置
#[derive(Debug, Clone)]
pub struct ZoomSetup {
    pub length: Param<u32>,
}

impl Default for ZoomSetup {
    fn default() -> Self {
        Self {
            length: Param::fixed(DEFAULT_LENGTH),
        }
    }
}

impl AffineSetup for ZoomSetup {
    const NAME: &'static str = "zoom";

    fn build(
        &self,
        event: EffectEvent,
        detail: &EventDetail,
        target: &EffectTarget,
    ) -> EffectResult<Box<dyn TransformAnimation>> {
        let source = match event {
            EffectEvent::Open | EffectEvent::Close => pointer_box(detail, target),
            EffectEvent::Minimize | EffectEvent::Unminimize => icon_box(event, detail)?,
            EffectEvent::Move => return Err(unsupported::<Self>(event)),
        };

        Ok(Box::new(ZoomAnimation::new(
            Box::new(StaticBoxQuery::new(source)),
            target.actor_query(),
            event.direction().stepper(self.length.clone()),
        )))
    }
}

/// bounce 配置
#[derive(Debug, Clone)]
pub struct BounceSetup {
    pub length: Param<u32>,
    pub params: BounceParams,
}

impl Default for BounceSetup {
    fn default() -> Self {
        Self {
            length: Param::fixed(DEFAULT_LENGTH),
            params: BounceParams::default(),
        }
    }
}

impl AffineSetup for BounceSetup {
    const NAME: &'static str = "bounce";

    fn build(
        &self,
        event: EffectEvent,
        _detail: &EventDetail,
        target: &EffectTarget,
    ) -> EffectResult<Box<dyn TransformAnimation>> {
        if !matches!(event, EffectEvent::Open | EffectEvent::Close) {
            return Err(unsupported::<Self>(event));
        }

        Ok(Box::new(BounceAnimation::new(
            self.params.clone(),
            target.actor_query(),
            event.direction().stepper(self.length.clone()),
        )))
    }
}

/// glide 配置
#[derive(Debug, Clone)]
pub struct GlideSetup {
    pub length: Param<u32>,
    pub params: GlideParams,
}

impl Default for GlideSetup {
    fn default() -> Self {
        Self {
            length: Param::fixed(DEFAULT_LENGTH),
            params: GlideParams::default(),
        }
    }
}

impl AffineSetup for GlideSetup {
    const NAME: &'static str = "glide";

    fn build(
        &self,
        event: EffectEvent,
        _detail: &EventDetail,
        target: &EffectTarget,
    ) -> EffectResult<Box<dyn TransformAnimation>> {
        if !matches!(event, EffectEvent::Open | EffectEvent::Close) {
            return Err(unsupported::<Self>(event));
        }

        Ok(Box::new(GlideAnimation::new(
            self.params.clone(),
            target.stage_query(),
            target.actor_query(),
            event.direction().stepper(self.length.clone()),
        )))
    }
}

pub type ZoomEffect = AffineEffect<ZoomSetup>;
pub type BounceEffect = AffineEffect<BounceSetup>;
pub type GlideEffect = AffineEffect<GlideSetup>;
