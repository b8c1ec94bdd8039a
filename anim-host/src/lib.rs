//! # Anim Host
//!
//! 窗口动画的宿主层：设置存储、效果注册表与编排器。
//!
//! ## 模块结构
//!
//! - [`config`]：动画设置（JSON 文件）与实时设置存储
//! - [`effects`]：效果名称、事件默认映射与效果实例创建
//! - [`orchestrator`]：按窗口管理效果实例，转发窗口管理器事件与完成通知
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let settings = Rc::new(SettingsStore::new(AnimationSettings::load("settings.json")));
//! let orchestrator = Orchestrator::new(settings, sink);
//! orchestrator.attach(&events);
//! orchestrator.manage(window, EffectTarget::new(actor).with_window(frame));
//!
//! // 每帧
//! orchestrator.tick(16);
//! ```

pub mod config;
pub mod effects;
pub mod orchestrator;

pub use config::{AnimationSettings, ConfigError, SettingsStore};
pub use effects::{EffectKind, create_effect};
pub use orchestrator::{
    GrabEvent, GrabOp, Orchestrator, OrchestratorError, WindowEvent, WindowId,
    WindowManagerCompletion, WindowManagerEvents,
};
