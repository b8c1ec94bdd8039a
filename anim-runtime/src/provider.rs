//! # Provider 模块
//!
//! 外部几何提供者接口。
//!
//! 合成器中的可视 actor 与逻辑窗口由宿主实现这两个 trait，
//! 动画只通过它们读取几何信息并订阅变化通知。
//!
//! [`SimpleActor`] / [`SimpleWindow`] 是内存实现，setter 会发出变化通知，
//! 供无头模拟与测试使用。

use std::cell::Cell;

use crate::geometry::{AnimBox, Vector};
use crate::signal::Signal;

/// 可视 actor（含阴影等装饰的实际绘制对象）
pub trait ActorGeometry {
    /// 屏幕位置
    fn position(&self) -> Vector;

    /// 尺寸
    fn size(&self) -> Vector;

    /// 位置或尺寸变化通知
    fn geometry_changed(&self) -> &Signal<()>;

    /// actor 自身的矩形
    fn actor_box(&self) -> AnimBox {
        AnimBox::from_origin_size(self.position(), self.size())
    }
}

/// 逻辑窗口
pub trait WindowFrame {
    /// 不含阴影的窗口框矩形
    fn frame_rect(&self) -> AnimBox;

    /// 位置或尺寸变化通知
    fn geometry_changed(&self) -> &Signal<()>;
}

/// 内存中的 actor
#[derive(Debug, Default)]
pub struct SimpleActor {
    position: Cell<Vector>,
    size: Cell<Vector>,
    changed: Signal<()>,
}

impl SimpleActor {
    pub fn new(position: Vector, size: Vector) -> Self {
        Self {
            position: Cell::new(position),
            size: Cell::new(size),
            changed: Signal::new(),
        }
    }

    /// 由矩形创建
    pub fn from_box(area: AnimBox) -> Self {
        Self::new(area.top_left, area.size())
    }

    pub fn set_position(&self, position: Vector) {
        if self.position.replace(position) != position {
            self.changed.emit(&());
        }
    }

    pub fn set_size(&self, size: Vector) {
        if self.size.replace(size) != size {
            self.changed.emit(&());
        }
    }

    /// 相对移动
    pub fn move_by(&self, delta: Vector) {
        self.set_position(self.position.get() + delta);
    }
}

impl ActorGeometry for SimpleActor {
    fn position(&self) -> Vector {
        self.position.get()
    }

    fn size(&self) -> Vector {
        self.size.get()
    }

    fn geometry_changed(&self) -> &Signal<()> {
        &self.changed
    }
}

/// 内存中的逻辑窗口
#[derive(Debug, Default)]
pub struct SimpleWindow {
    frame: Cell<AnimBox>,
    changed: Signal<()>,
}

impl SimpleWindow {
    pub fn new(frame: AnimBox) -> Self {
        Self {
            frame: Cell::new(frame),
            changed: Signal::new(),
        }
    }

    pub fn set_frame_rect(&self, frame: AnimBox) {
        if self.frame.replace(frame) != frame {
            self.changed.emit(&());
        }
    }
}

impl WindowFrame for SimpleWindow {
    fn frame_rect(&self) -> AnimBox {
        self.frame.get()
    }

    fn geometry_changed(&self) -> &Signal<()> {
        &self.changed
    }
}
