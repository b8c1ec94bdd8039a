//! # Effect 模块
//!
//! 效果激活包装：把一个动画实例接到窗口事件上，并保证每次激活的完成回调
//! 恰好调用一次。
//!
//! ## 状态机
//!
//! ```text
//! idle ──activate()──▶ animating ──动画结束 / remove()──▶ idle
//!            ▲              │
//!            └──activate()──┘  （替换旧动画，旧回调永不调用）
//! ```
//!
//! ## 变体
//!
//! - [`AffineEffect`]：驱动矩阵动画（zoom / bounce / glide）
//! - [`GridEffect`]：驱动网格动画（magic lamp）
//! - `WobblyEffect`（见 [`crate::wobbly`]）：不依赖步进器的弹簧网格
//!
//! 不支持的事件、缺少附加信息的事件统一返回 `handled = false`，调用方可以
//! 退回到无动画路径。

mod activation;
mod affine;
mod grid;

pub use activation::Activation;
pub use affine::{
    AffineEffect, AffineSetup, BounceEffect, BounceSetup, GlideEffect, GlideSetup, ZoomEffect,
    ZoomSetup,
};
pub use grid::{GridEffect, GridSetup, MagicLampEffect, MagicLampSetup};

use std::rc::Rc;
use std::str::FromStr;

use glam::DMat4;

use crate::error::EffectError;
use crate::geometry::{AnimBox, Vector, Vector4};
use crate::grid::DeformedMesh;
use crate::paint::{enlarge_for_effects, expand_with_extremes};
use crate::provider::{ActorGeometry, WindowFrame};
use crate::query::{ActorBoxQuery, BoxQuery, StaticBoxQuery, WindowBoxQuery, visible_window_box};
use crate::stepper::Direction;

/// 窗口事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectEvent {
    Open,
    Close,
    Minimize,
    Unminimize,
    Move,
}

impl EffectEvent {
    /// 全部事件
    pub const ALL: [EffectEvent; 5] = [
        Self::Open,
        Self::Close,
        Self::Minimize,
        Self::Unminimize,
        Self::Move,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Minimize => "minimize",
            Self::Unminimize => "unminimize",
            Self::Move => "move",
        }
    }

    /// 该事件的动画方向
    ///
    /// 关闭与最小化倒放，窗口最终停在起点（源矩形）一侧。
    pub fn direction(&self) -> Direction {
        match self {
            Self::Close | Self::Minimize => Direction::Reverse,
            Self::Open | Self::Unminimize | Self::Move => Direction::Forward,
        }
    }
}

impl FromStr for EffectEvent {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| EffectError::UnknownEvent { name: s.to_string() })
    }
}

impl std::fmt::Display for EffectEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 事件附加信息
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EventDetail {
    /// 指针位置（open / close / move）
    pub pointer: Option<Vector>,
    /// 任务栏图标矩形（minimize / unminimize）
    pub icon: Option<AnimBox>,
    /// 是否处于抓取状态（move）
    pub grabbed: Option<bool>,
}

impl EventDetail {
    pub fn with_pointer(mut self, pointer: Vector) -> Self {
        self.pointer = Some(pointer);
        self
    }

    pub fn with_icon(mut self, icon: AnimBox) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_grabbed(mut self, grabbed: bool) -> Self {
        self.grabbed = Some(grabbed);
        self
    }
}

/// 完成回调，每次成功激活恰好调用一次
pub type Completion = Box<dyn FnOnce()>;

/// 宿主绘制所需的当前状态
#[derive(Debug, Clone, PartialEq)]
pub enum PaintState {
    /// 不做任何变换
    Identity,
    /// 作用于 actor 局部坐标的矩阵与不透明度
    Affine { matrix: DMat4, opacity: u8 },
    /// actor 局部坐标中的形变网格
    Mesh(DeformedMesh),
}

/// 效果作用的对象
///
/// `window` 存在时以扣除阴影后的可见窗口矩形为准；`stage` 为整个舞台，
/// 缺省时以 actor 自身矩形代替。
#[derive(Clone)]
pub struct EffectTarget {
    pub actor: Rc<dyn ActorGeometry>,
    pub window: Option<Rc<dyn WindowFrame>>,
    pub stage: Option<Rc<dyn ActorGeometry>>,
}

impl EffectTarget {
    pub fn new(actor: Rc<dyn ActorGeometry>) -> Self {
        Self {
            actor,
            window: None,
            stage: None,
        }
    }

    pub fn with_window(mut self, window: Rc<dyn WindowFrame>) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_stage(mut self, stage: Rc<dyn ActorGeometry>) -> Self {
        self.stage = Some(stage);
        self
    }

    /// actor 当前矩形
    pub fn actor_box(&self) -> AnimBox {
        self.actor.actor_box()
    }

    /// 可见窗口矩形
    pub fn visible_box(&self) -> AnimBox {
        match &self.window {
            Some(window) => visible_window_box(self.actor.as_ref(), window.as_ref()),
            None => self.actor_box(),
        }
    }

    /// 跟踪 actor 矩形
    pub fn actor_query(&self) -> Box<dyn BoxQuery> {
        Box::new(ActorBoxQuery::new(self.actor.clone()))
    }

    /// 跟踪可见窗口矩形
    pub fn visible_query(&self) -> Box<dyn BoxQuery> {
        match &self.window {
            Some(window) => Box::new(WindowBoxQuery::new(self.actor.clone(), window.clone())),
            None => self.actor_query(),
        }
    }

    /// 舞台矩形
    pub fn stage_query(&self) -> Box<dyn BoxQuery> {
        match &self.stage {
            Some(stage) => Box::new(ActorBoxQuery::new(stage.clone())),
            None => Box::new(StaticBoxQuery::new(self.actor_box())),
        }
    }
}

/// 效果接口
pub trait Effect {
    /// 效果名称
    fn name(&self) -> &'static str;

    /// 开始一次激活
    ///
    /// 返回 `true` 表示事件已处理，`done` 之后会被恰好调用一次；
    /// 返回 `false` 时 `done` 直接丢弃，永不调用。
    fn activate(&mut self, event: &str, detail: &EventDetail, done: Completion) -> bool;

    /// 强制结束并解除所有观察，可重复调用；当前激活的回调不再调用
    fn remove(&mut self);

    /// 是否正在播放
    fn is_enabled(&self) -> bool;

    /// 推进 `delta` 个时间单位
    ///
    /// # Panics
    ///
    /// 从未激活过的效果被推进时 panic。
    fn tick(&mut self, delta: i64);

    /// 当前绘制状态
    fn paint_state(&self) -> PaintState;

    /// 合成器坐标中需要重绘的区域，未播放时为 `None`
    fn paint_box(&self) -> Option<AnimBox>;
}

/// 以 actor 局部坐标的四个变换后角点扩展 actor 的绘制区域
pub(crate) fn local_paint_box(actor_box: AnimBox, local_extremes: [Vector4; 4]) -> AnimBox {
    let origin = actor_box.top_left.extend(0.0).extend(0.0);
    let world = local_extremes.map(|corner| corner + origin);
    expand_with_extremes(enlarge_for_effects(actor_box), &world, Vector::ZERO)
}

#[cfg(test)]
pub(crate) mod test_util {
    use std::cell::Cell;

    use super::*;

    /// 计数回调
    pub fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Completion) {
        let count = Rc::new(Cell::new(0));
        let handle = count.clone();
        let make = move || -> Completion {
            let count = handle.clone();
            Box::new(move || count.set(count.get() + 1))
        };
        (count, make)
    }
}
