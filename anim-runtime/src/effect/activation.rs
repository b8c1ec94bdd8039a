//! 激活状态与一次性完成观察。

use std::cell::Cell;

use crate::signal::{Connection, Signal};

use super::Completion;

/// 激活状态
///
/// `enabled` 可观察。每次 [`begin`](Self::begin) 注册一个只响应
/// `enabled → false` 的一次性观察者，触发后调用完成回调并断开。
/// 新的 `begin` 会先断开旧观察者，旧回调因此永不调用。
pub struct Activation {
    enabled: bool,
    enabled_changed: Signal<bool>,
    pending: Option<Connection>,
    count: u32,
}

impl Activation {
    pub fn new() -> Self {
        Self {
            enabled: false,
            enabled_changed: Signal::new(),
            pending: None,
            count: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// `enabled` 变化通知
    pub fn enabled_changed(&self) -> &Signal<bool> {
        &self.enabled_changed
    }

    /// 累计激活次数
    pub fn count(&self) -> u32 {
        self.count
    }

    /// 是否有尚未触发的完成回调
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 开始新一次激活
    pub fn begin(&mut self, done: Completion) {
        // 先断开旧观察者
        self.pending = None;

        let slot = Cell::new(Some(done));
        self.pending = Some(self.enabled_changed.connect(move |enabled| {
            if !*enabled && let Some(done) = slot.take() {
                done();
            }
        }));

        self.count += 1;
        self.set_enabled(true);
    }

    /// 修改 `enabled`，变为 `false` 时触发并断开当前观察者
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.enabled_changed.emit(&enabled);

        if !enabled {
            self.pending = None;
        }
    }

    /// 丢弃观察者后清除 `enabled`，完成回调不会被调用
    pub fn remove(&mut self) {
        self.pending = None;
        self.set_enabled(false);
    }
}

impl Default for Activation {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activation")
            .field("enabled", &self.enabled)
            .field("pending", &self.pending.is_some())
            .field("count", &self.count)
            .finish()
    }
}
