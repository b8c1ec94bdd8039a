//! # Query 模块
//!
//! 矩形区域来源（box query）。
//!
//! ## 变体
//!
//! - [`StaticBoxQuery`]：构造时捕获的固定矩形
//! - [`ActorBoxQuery`]：跟踪 actor 的位置与尺寸
//! - [`WindowBoxQuery`]：跟踪 actor 与逻辑窗口，扣除阴影边距后得到可见窗口矩形
//!
//! 跟踪变体缓存最近一次计算结果，只在收到变化通知时重新计算，
//! `current_box()` 本身不读取提供者。

mod tracked;

pub use tracked::{ActorBoxQuery, WindowBoxQuery, visible_window_box};

use crate::geometry::AnimBox;

/// 矩形来源接口
pub trait BoxQuery {
    /// 当前矩形
    fn current_box(&self) -> AnimBox;
}

/// 固定矩形
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBoxQuery {
    area: AnimBox,
}

impl StaticBoxQuery {
    pub fn new(area: AnimBox) -> Self {
        Self { area }
    }
}

impl BoxQuery for StaticBoxQuery {
    fn current_box(&self) -> AnimBox {
        self.area
    }
}
