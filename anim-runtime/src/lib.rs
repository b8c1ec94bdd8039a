//! # Anim Runtime
//!
//! 窗口动画变换引擎的核心库。
//!
//! ## 架构概述
//!
//! `anim-runtime` 只做几何计算，不依赖任何合成器或渲染后端。
//! 宿主通过 [`Effect`] 激活动画，并逐帧推进、读取绘制状态：
//!
//! ```text
//! Host                                  Runtime
//!   │                                      │
//!   │── activate(event, detail, done) ───►│  构建动画（stepper + box query）
//!   │                                      │
//!   │── tick(delta) ─────────────────────►│  step(elapsed)
//!   │◄── paint_state() / paint_box() ─────│  矩阵 / 网格 / 重绘区域
//!   │                                      │
//!   │◄── done() ──────────────────────────│  enabled → false 时恰好一次
//! ```
//!
//! ## 核心类型
//!
//! - [`Stepper`]：帧数到进度的映射
//! - [`BoxQuery`]：矩形来源（固定或跟踪）
//! - [`TransformAnimation`]：矩阵动画（zoom / bounce / glide）
//! - [`GridAnimation`]：网格动画（magic lamp）
//! - [`WobblyEffect`]：拖动时的弹簧网格
//! - [`Effect`]：激活协议
//!
//! ## 使用示例
//!
//! ```ignore
//! use anim_runtime::{EffectTarget, EventDetail, ZoomEffect, ZoomSetup};
//!
//! let mut effect = ZoomEffect::new(ZoomSetup::default(), EffectTarget::new(actor));
//! let handled = effect.activate("open", &EventDetail::default(), Box::new(|| {
//!     // 动画结束
//! }));
//!
//! while effect.is_enabled() {
//!     effect.tick(16);
//!     host.apply(effect.paint_state());
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`stepper`]：步进器
//! - [`query`]：矩形来源
//! - [`transform`]：矩阵动画
//! - [`grid`]：网格动画
//! - [`wobbly`]：弹簧网格
//! - [`effect`]：激活协议与各效果驱动
//! - [`param`] / [`signal`] / [`provider`]：参数、通知与几何提供者接口

pub mod effect;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod paint;
pub mod param;
pub mod provider;
pub mod query;
pub mod signal;
pub mod stepper;
pub mod transform;
pub mod wobbly;

// 重导出核心类型
pub use effect::{
    Activation, BounceEffect, BounceSetup, Completion, Effect, EffectEvent, EffectTarget,
    EventDetail, GlideEffect, GlideSetup, MagicLampEffect, MagicLampSetup, PaintState, ZoomEffect,
    ZoomSetup,
};
pub use error::{EffectError, EffectResult};
pub use geometry::{AnimBox, Vector, Vector4};
pub use grid::{DeformedMesh, GridAnimation, MagicLampAnimation, MagicLampParams};
pub use param::{Param, SettingsProvider, SharedValue};
pub use provider::{ActorGeometry, SimpleActor, SimpleWindow, WindowFrame};
pub use query::{ActorBoxQuery, BoxQuery, StaticBoxQuery, WindowBoxQuery};
pub use signal::{Connection, Signal};
pub use stepper::{Direction, LinearStepper, ReverseStepper, Stepper};
pub use transform::{
    BounceAnimation, BounceParams, GlideAnimation, GlideParams, TransformAnimation, ZoomAnimation,
};
pub use wobbly::{WobblyEffect, WobblyParams};
