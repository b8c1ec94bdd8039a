//! # Effects 模块
//!
//! 把"事件 → 效果实例"的选择收敛到一个统一单元。
//!
//! ## 核心组件
//!
//! - [`EffectKind`]：效果类型枚举
//! - [`create_effect`]：按类型创建实时绑定到设置存储的效果实例
//!
//! ## 使用流程
//!
//! ```text
//! WindowManagerEvents (map / destroy / minimize / unminimize / grab)
//!   → EffectKind::for_event(settings, event)
//!   → create_effect(kind, settings, target)
//!   → Effect::activate(event, detail, done)
//! ```
//!
//! ## 设计原则
//!
//! - **唯一来源**：效果名到 EffectKind 的映射、事件默认效果，只在本模块定义
//! - **参数实时绑定**：效果参数在每帧重新读取设置存储

mod registry;

pub use registry::{EffectKind, create_effect, defaults};
