//! 跟踪外部几何提供者的矩形来源。

use std::cell::Cell;
use std::rc::Rc;

use super::BoxQuery;
use crate::geometry::AnimBox;
use crate::provider::{ActorGeometry, WindowFrame};
use crate::signal::Connection;

/// 可见窗口矩形
///
/// actor 尺寸包含阴影边距，逻辑窗口框不包含。
/// `offset = ceil((actor_size - frame_size) / 2)`，actor 矩形各边向内收缩 `offset`。
/// 结果的尺寸即窗口框尺寸，而不是把 actor 矩形整体平移 `-offset` 后保留 actor 尺寸。
pub fn visible_window_box(actor: &dyn ActorGeometry, window: &dyn WindowFrame) -> AnimBox {
    let position = actor.position();
    let size = actor.size();
    let frame = window.frame_rect().size();

    let offset = ((size - frame) * 0.5).ceil();

    AnimBox::new(position + offset, position + size - offset)
}

/// 跟踪 actor 矩形
///
/// 查询持有 actor；变化监听只持有弱引用。
pub struct ActorBoxQuery {
    actor: Rc<dyn ActorGeometry>,
    cached: Rc<Cell<AnimBox>>,
    _changed: Connection,
}

impl ActorBoxQuery {
    /// 创建并立即计算一次
    pub fn new(actor: Rc<dyn ActorGeometry>) -> Self {
        let cached = Rc::new(Cell::new(actor.actor_box()));

        let cache = Rc::downgrade(&cached);
        let source = Rc::downgrade(&actor);
        let changed = actor.geometry_changed().connect(move |_| {
            if let (Some(cache), Some(actor)) = (cache.upgrade(), source.upgrade()) {
                cache.set(actor.actor_box());
            }
        });

        Self {
            actor,
            cached,
            _changed: changed,
        }
    }

    pub fn actor(&self) -> &Rc<dyn ActorGeometry> {
        &self.actor
    }
}

impl BoxQuery for ActorBoxQuery {
    fn current_box(&self) -> AnimBox {
        self.cached.get()
    }
}

impl std::fmt::Debug for ActorBoxQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorBoxQuery")
            .field("box", &self.cached.get())
            .finish()
    }
}

/// 跟踪可见窗口矩形
///
/// actor 的位置/尺寸变化以及窗口的位置/尺寸变化都会触发重新计算。
/// 查询持有 actor 与窗口；变化监听只持有弱引用。
pub struct WindowBoxQuery {
    actor: Rc<dyn ActorGeometry>,
    window: Rc<dyn WindowFrame>,
    cached: Rc<Cell<AnimBox>>,
    _connections: [Connection; 2],
}

impl WindowBoxQuery {
    /// 创建并立即计算一次
    pub fn new(actor: Rc<dyn ActorGeometry>, window: Rc<dyn WindowFrame>) -> Self {
        let cached = Rc::new(Cell::new(visible_window_box(actor.as_ref(), window.as_ref())));

        let recompute: Rc<dyn Fn()> = {
            let cache = Rc::downgrade(&cached);
            let source = Rc::downgrade(&actor);
            let frame = Rc::downgrade(&window);
            Rc::new(move || {
                if let (Some(cache), Some(actor), Some(window)) =
                    (cache.upgrade(), source.upgrade(), frame.upgrade())
                {
                    cache.set(visible_window_box(actor.as_ref(), window.as_ref()));
                }
            })
        };

        let on_actor = recompute.clone();
        let actor_changed = actor.geometry_changed().connect(move |_| on_actor());
        let window_changed = window.geometry_changed().connect(move |_| recompute());

        Self {
            actor,
            window,
            cached,
            _connections: [actor_changed, window_changed],
        }
    }

    pub fn actor(&self) -> &Rc<dyn ActorGeometry> {
        &self.actor
    }

    pub fn window(&self) -> &Rc<dyn WindowFrame> {
        &self.window
    }
}

impl BoxQuery for WindowBoxQuery {
    fn current_box(&self) -> AnimBox {
        self.cached.get()
    }
}

impl std::fmt::Debug for WindowBoxQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowBoxQuery")
            .field("box", &self.cached.get())
            .finish()
    }
}
