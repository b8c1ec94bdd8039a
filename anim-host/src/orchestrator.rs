//! # Orchestrator 模块
//!
//! 把窗口管理器的生命周期事件接到各窗口的效果实例上。
//!
//! ## 事件流
//!
//! ```text
//! WindowManagerEvents ──attach()──▶ Orchestrator
//!   map / destroy / minimize / unminimize
//!     → EffectKind::for_event() → 创建或复用效果 → activate(event, detail, done)
//!   grab-begin / grab-end（仅移动类抓取）
//!     → move 事件，grabbed = true / false
//!
//! tick(delta) → 推进所有播放中的效果 → 处理完成队列 → WindowManagerCompletion
//! ```
//!
//! ## 完成语义
//!
//! - 每个生命周期事件恰好向 [`WindowManagerCompletion`] 报告一次完成
//! - 未处理的事件（无效果、效果不支持、缺少附加信息、窗口未管理）立即完成
//! - 同一效果被新事件替换时，旧事件立即报告完成
//! - 窗口记录被丢弃（关闭完成、`unmanage()`、`manage()` 替换、`detach()`）时，
//!   仍在播放的事件立即报告完成
//! - 抓取结束交给正在处理 move 的效果，不重新读取设置
//! - 完成回调只入队，统一在 `tick()` / 事件处理末尾、不持有任何借用时报告

use std::cell::{Cell, RefCell};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use anim_runtime::paint::union;
use anim_runtime::{
    AnimBox, Completion, Connection, Effect, EffectEvent, EffectTarget, EventDetail, PaintState,
    Signal, Vector,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SettingsStore;
use crate::effects::{EffectKind, create_effect};

/// 窗口标识
pub type WindowId = u64;

/// 抓取操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabOp {
    /// 鼠标拖动
    Moving,
    /// 键盘移动
    KeyboardMoving,
    /// 调整大小
    Resizing,
    /// 其他
    Other,
}

impl GrabOp {
    /// 是否为移动类抓取
    pub fn is_move(&self) -> bool {
        matches!(self, Self::Moving | Self::KeyboardMoving)
    }
}

/// 窗口生命周期事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowEvent {
    pub window: WindowId,
    pub detail: EventDetail,
}

/// 抓取事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabEvent {
    pub window: WindowId,
    pub op: GrabOp,
    pub pointer: Vector,
}

/// 窗口管理器事件源
#[derive(Debug, Default)]
pub struct WindowManagerEvents {
    pub map: Signal<WindowEvent>,
    pub destroy: Signal<WindowEvent>,
    pub minimize: Signal<WindowEvent>,
    pub unminimize: Signal<WindowEvent>,
    pub grab_begin: Signal<GrabEvent>,
    pub grab_end: Signal<GrabEvent>,
}

impl WindowManagerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前连接总数
    pub fn handler_count(&self) -> usize {
        self.map.handler_count()
            + self.destroy.handler_count()
            + self.minimize.handler_count()
            + self.unminimize.handler_count()
            + self.grab_begin.handler_count()
            + self.grab_end.handler_count()
    }
}

/// 窗口管理器完成通知
pub trait WindowManagerCompletion {
    fn completed_map(&self, window: WindowId);
    fn completed_destroy(&self, window: WindowId);
    fn completed_minimize(&self, window: WindowId);
    fn completed_unminimize(&self, window: WindowId);
}

/// 编排错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    /// 未知效果名
    #[error("未知效果 '{name}'")]
    UnknownEffect { name: String },

    /// 窗口未被管理
    #[error("窗口 {window} 未被管理")]
    UnknownWindow { window: WindowId },

    /// 尚未挂接事件源
    #[error("编排器尚未挂接")]
    NotAttached,
}

/// 编排器
pub struct Orchestrator {
    shared: Rc<Shared>,
    registry: RefCell<Vec<Connection>>,
}

struct Shared {
    settings: Rc<SettingsStore>,
    sink: Rc<dyn WindowManagerCompletion>,
    windows: RefCell<BTreeMap<WindowId, ManagedWindow>>,
    pending: Rc<RefCell<VecDeque<Pending>>>,
    next_serial: Cell<u64>,
    attached: Cell<bool>,
}

struct ManagedWindow {
    target: EffectTarget,
    effects: BTreeMap<EffectKind, EffectSlot>,
}

struct EffectSlot {
    effect: Box<dyn Effect>,
    /// 当前激活的事件与序号
    active: Option<(EffectEvent, u64)>,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    window: WindowId,
    event: EffectEvent,
    /// 效果自然结束时携带（类型, 序号），用于移除对应效果
    finished: Option<(EffectKind, u64)>,
}

impl Orchestrator {
    pub fn new(settings: Rc<SettingsStore>, sink: Rc<dyn WindowManagerCompletion>) -> Self {
        Self {
            shared: Rc::new(Shared {
                settings,
                sink,
                windows: RefCell::new(BTreeMap::new()),
                pending: Rc::new(RefCell::new(VecDeque::new())),
                next_serial: Cell::new(0),
                attached: Cell::new(false),
            }),
            registry: RefCell::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> &Rc<SettingsStore> {
        &self.shared.settings
    }

    pub fn is_attached(&self) -> bool {
        self.shared.attached.get()
    }

    /// 订阅事件源；已挂接时不做任何事
    pub fn attach(&self, events: &WindowManagerEvents) {
        if self.shared.attached.replace(true) {
            debug!("编排器已挂接，忽略");
            return;
        }

        let mut registry = self.registry.borrow_mut();
        registry.push(connect_window(&events.map, &self.shared, EffectEvent::Open));
        registry.push(connect_window(&events.destroy, &self.shared, EffectEvent::Close));
        registry.push(connect_window(&events.minimize, &self.shared, EffectEvent::Minimize));
        registry.push(connect_window(
            &events.unminimize,
            &self.shared,
            EffectEvent::Unminimize,
        ));
        registry.push(connect_grab(&events.grab_begin, &self.shared, true));
        registry.push(connect_grab(&events.grab_end, &self.shared, false));

        info!(connections = registry.len(), "编排器已挂接");
    }

    /// 断开事件源并移除所有效果；已断开时不做任何事
    ///
    /// 仍在播放的事件立即报告完成。
    pub fn detach(&self) {
        if !self.shared.attached.replace(false) {
            return;
        }

        let connections = std::mem::take(&mut *self.registry.borrow_mut());
        drop(connections);

        let mut removed = Vec::new();
        {
            let mut windows = self.shared.windows.borrow_mut();
            for (window, managed) in windows.iter_mut() {
                let effects = std::mem::take(&mut managed.effects);
                for event in retire(effects, &mut removed) {
                    self.shared.queue(*window, event, None);
                }
            }
        }
        remove_all(removed);
        self.shared.flush();

        info!("编排器已断开");
    }

    /// 开始管理窗口；已管理时替换目标并移除旧效果
    ///
    /// 旧效果上仍在播放的事件立即报告完成。
    pub fn manage(&self, window: WindowId, target: EffectTarget) {
        let previous = self.shared.windows.borrow_mut().insert(
            window,
            ManagedWindow {
                target,
                effects: BTreeMap::new(),
            },
        );
        if let Some(previous) = previous {
            debug!(window, "替换已管理窗口");
            self.shared.discard(window, previous);
        }
    }

    /// 停止管理窗口，移除其全部效果
    ///
    /// 仍在播放的事件立即报告完成。
    pub fn unmanage(&self, window: WindowId) -> Result<(), OrchestratorError> {
        let managed = self
            .shared
            .windows
            .borrow_mut()
            .remove(&window)
            .ok_or(OrchestratorError::UnknownWindow { window })?;
        self.shared.discard(window, managed);
        Ok(())
    }

    pub fn is_managed(&self, window: WindowId) -> bool {
        self.shared.windows.borrow().contains_key(&window)
    }

    pub fn window_count(&self) -> usize {
        self.shared.windows.borrow().len()
    }

    /// 直接投递一个生命周期事件，返回是否产生了动画
    pub fn dispatch(
        &self,
        window: WindowId,
        event: EffectEvent,
        detail: &EventDetail,
    ) -> Result<bool, OrchestratorError> {
        if !self.is_attached() {
            return Err(OrchestratorError::NotAttached);
        }
        Ok(self.shared.dispatch(window, event, detail))
    }

    /// 抓取开始；非移动类抓取不产生动画
    pub fn grab_begin(
        &self,
        window: WindowId,
        op: GrabOp,
        pointer: Vector,
    ) -> Result<bool, OrchestratorError> {
        if !self.is_attached() {
            return Err(OrchestratorError::NotAttached);
        }
        Ok(self.shared.grab(window, op, pointer, true))
    }

    /// 抓取结束
    pub fn grab_end(
        &self,
        window: WindowId,
        op: GrabOp,
        pointer: Vector,
    ) -> Result<bool, OrchestratorError> {
        if !self.is_attached() {
            return Err(OrchestratorError::NotAttached);
        }
        Ok(self.shared.grab(window, op, pointer, false))
    }

    /// 推进所有播放中的效果，然后报告本帧完成的事件
    pub fn tick(&self, delta: i64) {
        {
            let mut windows = self.shared.windows.borrow_mut();
            for managed in windows.values_mut() {
                for slot in managed.effects.values_mut() {
                    if slot.effect.is_enabled() {
                        slot.effect.tick(delta);
                    }
                }
            }
        }
        self.shared.flush();
    }

    /// 是否有任何效果在播放
    pub fn is_animating(&self) -> bool {
        self.shared
            .windows
            .borrow()
            .values()
            .any(|managed| managed.effects.values().any(|slot| slot.effect.is_enabled()))
    }

    /// 窗口上正在播放的效果
    pub fn active_effects(&self, window: WindowId) -> Vec<EffectKind> {
        self.shared
            .windows
            .borrow()
            .get(&window)
            .map(|managed| {
                managed
                    .effects
                    .iter()
                    .filter(|(_, slot)| slot.effect.is_enabled())
                    .map(|(kind, _)| *kind)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 窗口上各播放中效果的绘制状态
    pub fn paint_states(
        &self,
        window: WindowId,
    ) -> Result<Vec<(EffectKind, PaintState)>, OrchestratorError> {
        let windows = self.shared.windows.borrow();
        let managed = windows
            .get(&window)
            .ok_or(OrchestratorError::UnknownWindow { window })?;
        Ok(managed
            .effects
            .iter()
            .filter(|(_, slot)| slot.effect.is_enabled())
            .map(|(kind, slot)| (*kind, slot.effect.paint_state()))
            .collect())
    }

    /// 窗口所有播放中效果绘制区域的并集
    pub fn paint_box(&self, window: WindowId) -> Result<Option<AnimBox>, OrchestratorError> {
        let windows = self.shared.windows.borrow();
        let managed = windows
            .get(&window)
            .ok_or(OrchestratorError::UnknownWindow { window })?;
        Ok(managed
            .effects
            .values()
            .filter_map(|slot| slot.effect.paint_box())
            .reduce(union))
    }
}

impl Shared {
    fn dispatch(&self, window: WindowId, event: EffectEvent, detail: &EventDetail) -> bool {
        let handled = self.activate(window, event, detail);
        self.flush();
        handled
    }

    fn grab(&self, window: WindowId, op: GrabOp, pointer: Vector, grabbed: bool) -> bool {
        if !op.is_move() {
            debug!(window, op = ?op, "非移动抓取，忽略");
            return false;
        }
        let detail = EventDetail::default()
            .with_pointer(pointer)
            .with_grabbed(grabbed);

        // 释放交给正在处理 move 的效果，与当前设置无关
        let kind = if grabbed { None } else { self.moving_kind(window) };
        let kind =
            kind.unwrap_or_else(|| EffectKind::for_event(&self.settings, EffectEvent::Move));

        let handled = self.activate_kind(window, EffectEvent::Move, kind, &detail);
        self.flush();
        handled
    }

    /// 窗口上正在处理 move 的效果
    fn moving_kind(&self, window: WindowId) -> Option<EffectKind> {
        let windows = self.windows.borrow();
        let managed = windows.get(&window)?;
        managed
            .effects
            .iter()
            .find(|(_, slot)| slot.in_flight() == Some(EffectEvent::Move))
            .map(|(kind, _)| *kind)
    }

    fn activate(&self, window: WindowId, event: EffectEvent, detail: &EventDetail) -> bool {
        let kind = EffectKind::for_event(&self.settings, event);
        self.activate_kind(window, event, kind, detail)
    }

    fn activate_kind(
        &self,
        window: WindowId,
        event: EffectEvent,
        kind: EffectKind,
        detail: &EventDetail,
    ) -> bool {
        let mut windows = self.windows.borrow_mut();
        let Some(managed) = windows.get_mut(&window) else {
            debug!(window, event = %event, "窗口未管理，立即完成");
            self.queue(window, event, None);
            return false;
        };

        let slot = match managed.effects.entry(kind) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let Some(effect) = create_effect(kind, &self.settings, managed.target.clone())
                else {
                    debug!(window, event = %event, "无效果，立即完成");
                    self.queue(window, event, None);
                    return false;
                };
                entry.insert(EffectSlot {
                    effect,
                    active: None,
                })
            }
        };

        let serial = self.next_serial.get();
        self.next_serial.set(serial + 1);

        let superseded = slot.in_flight();
        let handled = slot
            .effect
            .activate(event.as_str(), detail, self.completion(window, event, kind, serial));

        if handled {
            slot.active = Some((event, serial));
            if let Some(previous) = superseded {
                debug!(window, effect = %kind, previous = %previous, event = %event, "效果被新事件替换");
                self.queue(window, previous, None);
            }
            debug!(window, effect = %kind, event = %event, "效果已激活");
            return true;
        }

        debug!(window, effect = %kind, event = %event, "效果未处理，立即完成");
        self.queue(window, event, None);
        if !slot.effect.is_enabled()
            && let Some(mut slot) = managed.effects.remove(&kind)
        {
            slot.effect.remove();
        }
        false
    }

    fn completion(
        &self,
        window: WindowId,
        event: EffectEvent,
        kind: EffectKind,
        serial: u64,
    ) -> Completion {
        let pending: Weak<RefCell<VecDeque<Pending>>> = Rc::downgrade(&self.pending);
        Box::new(move || {
            if let Some(pending) = pending.upgrade() {
                pending.borrow_mut().push_back(Pending {
                    window,
                    event,
                    finished: Some((kind, serial)),
                });
            }
        })
    }

    fn queue(&self, window: WindowId, event: EffectEvent, finished: Option<(EffectKind, u64)>) {
        self.pending.borrow_mut().push_back(Pending {
            window,
            event,
            finished,
        });
    }

    /// 丢弃窗口记录：仍在播放的事件入队后移除全部效果并报告
    fn discard(&self, window: WindowId, managed: ManagedWindow) {
        let mut removed = Vec::new();
        for event in retire(managed.effects, &mut removed) {
            self.queue(window, event, None);
        }
        remove_all(removed);
        self.flush();
    }

    fn pop_pending(&self) -> Option<Pending> {
        self.pending.borrow_mut().pop_front()
    }

    fn flush(&self) {
        while let Some(pending) = self.pop_pending() {
            self.complete(pending);
        }
    }

    fn complete(&self, pending: Pending) {
        let mut removed = Vec::new();
        let mut interrupted = Vec::new();
        {
            let mut windows = self.windows.borrow_mut();

            if let Some((kind, serial)) = pending.finished
                && let Some(managed) = windows.get_mut(&pending.window)
                && managed
                    .effects
                    .get(&kind)
                    .is_some_and(|slot| slot.active.map(|(_, s)| s) == Some(serial))
                && let Some(slot) = managed.effects.remove(&kind)
            {
                removed.push(slot.effect);
            }

            // 窗口关闭完成后丢弃记录，除非另一个 close 动画仍在播放
            let closing = windows.get(&pending.window).is_some_and(|managed| {
                managed.effects.values().any(|slot| {
                    slot.effect.is_enabled() && matches!(slot.active, Some((EffectEvent::Close, _)))
                })
            });
            if pending.event == EffectEvent::Close
                && !closing
                && let Some(managed) = windows.remove(&pending.window)
            {
                debug!(window = pending.window, "窗口已关闭，丢弃记录");
                interrupted = retire(managed.effects, &mut removed);
            }
        }

        remove_all(removed);
        // 被关闭打断的事件先于关闭本身报告
        for event in interrupted {
            report(self.sink.as_ref(), pending.window, event);
        }
        report(self.sink.as_ref(), pending.window, pending.event);
    }
}

impl EffectSlot {
    /// 仍在播放的事件
    fn in_flight(&self) -> Option<EffectEvent> {
        self.active
            .filter(|_| self.effect.is_enabled())
            .map(|(event, _)| event)
    }
}

/// 收回一组效果，返回其中仍在播放的事件
///
/// 效果实例放入 `removed`，由调用方在释放借用后移除。
fn retire(
    effects: BTreeMap<EffectKind, EffectSlot>,
    removed: &mut Vec<Box<dyn Effect>>,
) -> Vec<EffectEvent> {
    let mut interrupted = Vec::new();
    for slot in effects.into_values() {
        if let Some(event) = slot.in_flight() {
            interrupted.push(event);
        }
        removed.push(slot.effect);
    }
    interrupted
}

fn remove_all(removed: Vec<Box<dyn Effect>>) {
    for mut effect in removed {
        effect.remove();
    }
}

fn report(sink: &dyn WindowManagerCompletion, window: WindowId, event: EffectEvent) {
    debug!(window, event = %event, "事件完成");
    match event {
        EffectEvent::Open => sink.completed_map(window),
        EffectEvent::Close => sink.completed_destroy(window),
        EffectEvent::Minimize => sink.completed_minimize(window),
        EffectEvent::Unminimize => sink.completed_unminimize(window),
        EffectEvent::Move => {}
    }
}

fn connect_window(
    signal: &Signal<WindowEvent>,
    shared: &Rc<Shared>,
    event: EffectEvent,
) -> Connection {
    let shared = Rc::downgrade(shared);
    signal.connect(move |e: &WindowEvent| {
        if let Some(shared) = shared.upgrade() {
            shared.dispatch(e.window, event, &e.detail);
        }
    })
}

fn connect_grab(signal: &Signal<GrabEvent>, shared: &Rc<Shared>, grabbed: bool) -> Connection {
    let shared = Rc::downgrade(shared);
    signal.connect(move |e: &GrabEvent| {
        if let Some(shared) = shared.upgrade() {
            shared.grab(e.window, e.op, e.pointer, grabbed);
        }
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anim_runtime::{SimpleActor, Vector};

    use super::*;
    use crate::config::keys;

    #[derive(Default)]
    struct Log(RefCell<Vec<(&'static str, WindowId)>>);

    impl WindowManagerCompletion for Log {
        fn completed_map(&self, window: WindowId) {
            self.0.borrow_mut().push(("map", window));
        }
        fn completed_destroy(&self, window: WindowId) {
            self.0.borrow_mut().push(("destroy", window));
        }
        fn completed_minimize(&self, window: WindowId) {
            self.0.borrow_mut().push(("minimize", window));
        }
        fn completed_unminimize(&self, window: WindowId) {
            self.0.borrow_mut().push(("unminimize", window));
        }
    }

    fn setup() -> (Orchestrator, Rc<Log>) {
        let settings = Rc::new(SettingsStore::default());
        settings.set_number(keys::GLIDE_LENGTH, 10.0).unwrap();
        let log = Rc::new(Log::default());
        let orchestrator = Orchestrator::new(settings, log.clone());
        let actor = Rc::new(SimpleActor::new(Vector::ZERO, Vector::new(100.0, 100.0)));
        orchestrator.manage(1, EffectTarget::new(actor));
        (orchestrator, log)
    }

    #[test]
    fn test_dispatch_requires_attach() {
        let (orchestrator, _) = setup();
        assert_eq!(
            orchestrator.dispatch(1, EffectEvent::Open, &EventDetail::default()),
            Err(OrchestratorError::NotAttached)
        );
    }

    #[test]
    fn test_attach_is_idempotent() {
        let (orchestrator, _) = setup();
        let events = WindowManagerEvents::new();
        orchestrator.attach(&events);
        orchestrator.attach(&events);
        assert_eq!(events.handler_count(), 6);

        orchestrator.detach();
        orchestrator.detach();
        assert_eq!(events.handler_count(), 0);
        assert!(!orchestrator.is_attached());
    }

    #[test]
    fn test_open_completes_after_animation() {
        let (orchestrator, log) = setup();
        orchestrator.attach(&WindowManagerEvents::new());

        assert_eq!(
            orchestrator.dispatch(1, EffectEvent::Open, &EventDetail::default()),
            Ok(true)
        );
        assert_eq!(orchestrator.active_effects(1), vec![EffectKind::Glide]);

        orchestrator.tick(9);
        assert!(log.0.borrow().is_empty());
        orchestrator.tick(1);
        assert_eq!(*log.0.borrow(), vec![("map", 1)]);
        assert!(orchestrator.active_effects(1).is_empty());
        assert!(!orchestrator.is_animating());
    }

    #[test]
    fn test_unknown_window_completes_immediately() {
        let (orchestrator, log) = setup();
        orchestrator.attach(&WindowManagerEvents::new());

        assert_eq!(
            orchestrator.dispatch(42, EffectEvent::Minimize, &EventDetail::default()),
            Ok(false)
        );
        assert_eq!(*log.0.borrow(), vec![("minimize", 42)]);
    }

    #[test]
    fn test_superseded_event_is_reported() {
        let (orchestrator, log) = setup();
        orchestrator.attach(&WindowManagerEvents::new());

        orchestrator
            .dispatch(1, EffectEvent::Open, &EventDetail::default())
            .unwrap();
        orchestrator.tick(3);
        orchestrator
            .dispatch(1, EffectEvent::Close, &EventDetail::default())
            .unwrap();
        assert_eq!(*log.0.borrow(), vec![("map", 1)]);

        orchestrator.tick(10);
        assert_eq!(*log.0.borrow(), vec![("map", 1), ("destroy", 1)]);
        assert!(!orchestrator.is_managed(1));
    }

    #[test]
    fn test_unmanage_reports_in_flight_event() {
        let (orchestrator, log) = setup();
        orchestrator.attach(&WindowManagerEvents::new());

        orchestrator
            .dispatch(1, EffectEvent::Open, &EventDetail::default())
            .unwrap();
        orchestrator.tick(2);
        orchestrator.unmanage(1).unwrap();

        assert_eq!(*log.0.borrow(), vec![("map", 1)]);
        assert!(!orchestrator.is_animating());
    }

    #[test]
    fn test_manage_replacement_reports_in_flight_event() {
        let (orchestrator, log) = setup();
        orchestrator.attach(&WindowManagerEvents::new());

        orchestrator
            .dispatch(1, EffectEvent::Open, &EventDetail::default())
            .unwrap();
        orchestrator.tick(2);

        let actor = Rc::new(SimpleActor::new(Vector::ZERO, Vector::new(50.0, 50.0)));
        orchestrator.manage(1, EffectTarget::new(actor));

        assert_eq!(*log.0.borrow(), vec![("map", 1)]);
        assert!(orchestrator.is_managed(1));
        assert!(orchestrator.active_effects(1).is_empty());

        // 之后不会再次报告
        orchestrator.tick(20);
        assert_eq!(*log.0.borrow(), vec![("map", 1)]);
    }

    #[test]
    fn test_non_move_grab_ignored() {
        let (orchestrator, _) = setup();
        orchestrator
            .settings()
            .set_effect_name(EffectEvent::Move, "wobbly");
        orchestrator.attach(&WindowManagerEvents::new());

        assert_eq!(
            orchestrator.grab_begin(1, GrabOp::Resizing, Vector::ZERO),
            Ok(false)
        );
        assert_eq!(
            orchestrator.grab_begin(1, GrabOp::Moving, Vector::new(10.0, 10.0)),
            Ok(true)
        );
        assert_eq!(orchestrator.active_effects(1), vec![EffectKind::Wobbly]);
    }

    #[test]
    fn test_paint_queries_unknown_window() {
        let (orchestrator, _) = setup();
        assert_eq!(
            orchestrator.paint_box(7),
            Err(OrchestratorError::UnknownWindow { window: 7 })
        );
        assert_eq!(orchestrator.paint_box(1), Ok(None));
        assert!(orchestrator.unmanage(1).is_ok());
        assert!(orchestrator.unmanage(1).is_err());
    }
}
