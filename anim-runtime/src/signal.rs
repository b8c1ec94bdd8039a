//! # Signal 模块
//!
//! 单线程多播通知。
//!
//! [`Signal::connect`] 返回 [`Connection`] 作为取消句柄：句柄被 drop
//! （或显式调用 [`Connection::disconnect`]）时处理函数同步移除，
//! 之后不会再被调用。
//!
//! 发射过程中允许处理函数连接或断开其他处理函数：发射前先对处理函数列表做快照，
//! 调用每个处理函数前再确认它仍然处于连接状态。

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Handler<T> = Rc<dyn Fn(&T)>;

struct Slots<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
}

impl<T> Slots<T> {
    fn contains(&self, id: u64) -> bool {
        self.handlers.iter().any(|(slot, _)| *slot == id)
    }
}

/// 多播信号
pub struct Signal<T: 'static> {
    slots: Rc<RefCell<Slots<T>>>,
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(RefCell::new(Slots {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// 注册处理函数
    #[must_use = "Connection 被 drop 时会立即断开"]
    pub fn connect(&self, handler: impl Fn(&T) + 'static) -> Connection {
        let id = {
            let mut slots = self.slots.borrow_mut();
            let id = slots.next_id;
            slots.next_id += 1;
            slots.handlers.push((id, Rc::new(handler)));
            id
        };

        let slots: Weak<RefCell<Slots<T>>> = Rc::downgrade(&self.slots);
        Connection {
            release: Some(Box::new(move || {
                if let Some(slots) = slots.upgrade() {
                    slots.borrow_mut().handlers.retain(|(slot, _)| *slot != id);
                }
            })),
        }
    }

    /// 通知所有处理函数
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<(u64, Handler<T>)> = self.slots.borrow().handlers.clone();
        for (id, handler) in snapshot {
            if self.slots.borrow().contains(id) {
                handler(value);
            }
        }
    }

    /// 当前连接数
    pub fn handler_count(&self) -> usize {
        self.slots.borrow().handlers.len()
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// 取消句柄
pub struct Connection {
    release: Option<Box<dyn FnOnce()>>,
}

impl Connection {
    /// 立即断开
    pub fn disconnect(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("connected", &self.release.is_some())
            .finish()
    }
}
