//! # 编排器集成测试
//!
//! 测试 WindowManagerEvents → Orchestrator → Effect → WindowManagerCompletion 的完整链路。
//! 这些测试只使用内存中的 actor / 窗口，不依赖合成器。

use std::cell::RefCell;
use std::rc::Rc;

use anim_host::config::keys;
use anim_host::{
    AnimationSettings, EffectKind, GrabEvent, GrabOp, Orchestrator, SettingsStore, WindowEvent,
    WindowId, WindowManagerCompletion, WindowManagerEvents,
};
use anim_runtime::{
    ActorGeometry, AnimBox, EffectEvent, EffectTarget, EventDetail, PaintState, SimpleActor,
    SimpleWindow, Vector, WindowFrame,
};

/// 记录完成通知
#[derive(Default)]
struct RecordingSink {
    calls: RefCell<Vec<(&'static str, WindowId)>>,
}

impl RecordingSink {
    fn calls(&self) -> Vec<(&'static str, WindowId)> {
        self.calls.borrow().clone()
    }
}

impl WindowManagerCompletion for RecordingSink {
    fn completed_map(&self, window: WindowId) {
        self.calls.borrow_mut().push(("map", window));
    }

    fn completed_destroy(&self, window: WindowId) {
        self.calls.borrow_mut().push(("destroy", window));
    }

    fn completed_minimize(&self, window: WindowId) {
        self.calls.borrow_mut().push(("minimize", window));
    }

    fn completed_unminimize(&self, window: WindowId) {
        self.calls.borrow_mut().push(("unminimize", window));
    }
}

struct Harness {
    events: WindowManagerEvents,
    orchestrator: Orchestrator,
    sink: Rc<RecordingSink>,
    actor: Rc<SimpleActor>,
    frame: Rc<SimpleWindow>,
}

const WINDOW: WindowId = 7;

fn harness(settings: AnimationSettings) -> Harness {
    let sink = Rc::new(RecordingSink::default());
    let orchestrator = Orchestrator::new(Rc::new(SettingsStore::new(settings)), sink.clone());
    let events = WindowManagerEvents::new();
    orchestrator.attach(&events);

    let actor = Rc::new(SimpleActor::new(
        Vector::new(90.0, 90.0),
        Vector::new(220.0, 170.0),
    ));
    let frame = Rc::new(SimpleWindow::new(AnimBox::from_coords(
        100.0, 100.0, 300.0, 250.0,
    )));
    orchestrator.manage(
        WINDOW,
        EffectTarget::new(actor.clone()).with_window(frame.clone()),
    );

    Harness {
        events,
        orchestrator,
        sink,
        actor,
        frame,
    }
}

/// 所有效果时长缩短为 10
fn short_settings() -> AnimationSettings {
    let mut settings = AnimationSettings::default();
    for key in [
        keys::ZOOM_LENGTH,
        keys::BOUNCE_LENGTH,
        keys::GLIDE_LENGTH,
        keys::MAGICLAMP_LENGTH,
    ] {
        settings.set_number(key, 10.0).unwrap();
    }
    settings
}

fn icon() -> EventDetail {
    EventDetail::default().with_icon(AnimBox::from_coords(20.0, 700.0, 52.0, 732.0))
}

fn window_event(detail: EventDetail) -> WindowEvent {
    WindowEvent {
        window: WINDOW,
        detail,
    }
}

fn run_until_idle(orchestrator: &Orchestrator) -> u32 {
    run_until_idle_with(orchestrator, 16)
}

fn run_until_idle_with(orchestrator: &Orchestrator, delta: i64) -> u32 {
    let mut frames = 0;
    while orchestrator.is_animating() {
        orchestrator.tick(delta);
        frames += 1;
        assert!(frames < 10_000, "动画没有结束");
    }
    frames
}

/// 测试完整的窗口生命周期
#[test]
fn test_window_lifecycle_through_signals() {
    let h = harness(short_settings());

    // 1. 打开：默认 glide
    h.events.map.emit(&window_event(EventDetail::default()));
    assert_eq!(h.orchestrator.active_effects(WINDOW), vec![EffectKind::Glide]);
    h.orchestrator.tick(5);
    assert!(h.sink.calls().is_empty());
    h.orchestrator.tick(5);
    assert_eq!(h.sink.calls(), vec![("map", WINDOW)]);

    // 2. 最小化：默认 zoom 到图标
    h.events.minimize.emit(&window_event(icon()));
    assert_eq!(h.orchestrator.active_effects(WINDOW), vec![EffectKind::Zoom]);
    run_until_idle(&h.orchestrator);

    // 3. 恢复
    h.events.unminimize.emit(&window_event(icon()));
    run_until_idle(&h.orchestrator);

    // 4. 关闭：完成后丢弃窗口记录
    h.events.destroy.emit(&window_event(EventDetail::default()));
    assert!(h.orchestrator.is_managed(WINDOW));
    run_until_idle(&h.orchestrator);

    assert_eq!(
        h.sink.calls(),
        vec![
            ("map", WINDOW),
            ("minimize", WINDOW),
            ("unminimize", WINDOW),
            ("destroy", WINDOW),
        ]
    );
    assert!(!h.orchestrator.is_managed(WINDOW));
}

/// 缺少图标的最小化立即完成
#[test]
fn test_minimize_without_icon_completes_immediately() {
    let h = harness(short_settings());

    let handled = h
        .orchestrator
        .dispatch(WINDOW, EffectEvent::Minimize, &EventDetail::default())
        .unwrap();

    assert!(!handled);
    assert_eq!(h.sink.calls(), vec![("minimize", WINDOW)]);
    assert!(h.orchestrator.active_effects(WINDOW).is_empty());
}

/// 未知效果名按无效果处理
#[test]
fn test_unknown_effect_name_means_no_animation() {
    let mut settings = short_settings();
    settings.open_effect = "genie".to_string();
    let h = harness(settings);

    h.events.map.emit(&window_event(EventDetail::default()));
    assert_eq!(h.sink.calls(), vec![("map", WINDOW)]);
    assert!(!h.orchestrator.is_animating());
}

/// magic lamp 产生网格绘制状态
#[test]
fn test_magiclamp_minimize_paints_mesh() {
    let mut settings = short_settings();
    settings.minimize_effect = "magiclamp".to_string();
    let h = harness(settings);

    h.events.minimize.emit(&window_event(icon()));
    h.orchestrator.tick(3);

    let states = h.orchestrator.paint_states(WINDOW).unwrap();
    assert_eq!(states.len(), 1);
    let (kind, state) = &states[0];
    assert_eq!(*kind, EffectKind::MagicLamp);
    let PaintState::Mesh(mesh) = state else {
        panic!("应为网格: {:?}", state);
    };
    assert_eq!((mesh.columns, mesh.rows), (2, 100));

    let area = h.orchestrator.paint_box(WINDOW).unwrap().expect("播放中");
    // 下边缘已被拉向图标
    assert!(area.bottom_right.y > 400.0);

    run_until_idle(&h.orchestrator);
    assert_eq!(h.sink.calls(), vec![("minimize", WINDOW)]);
    assert_eq!(h.orchestrator.paint_box(WINDOW).unwrap(), None);
}

/// 拖动窗口：抓取期间持续产生网格，释放后静止并移除
#[test]
fn test_wobbly_drag() {
    let mut settings = short_settings();
    settings.move_effect = "wobbly".to_string();
    let h = harness(settings);

    let pointer = Vector::new(150.0, 120.0);
    h.events.grab_begin.emit(&GrabEvent {
        window: WINDOW,
        op: GrabOp::Moving,
        pointer,
    });
    assert_eq!(h.orchestrator.active_effects(WINDOW), vec![EffectKind::Wobbly]);

    for _ in 0..10 {
        let delta = Vector::new(8.0, 4.0);
        h.actor.move_by(delta);
        h.frame.set_frame_rect(h.frame.frame_rect().translate(delta));
        h.orchestrator.tick(16);
    }

    let states = h.orchestrator.paint_states(WINDOW).unwrap();
    assert!(matches!(states.as_slice(), [(EffectKind::Wobbly, PaintState::Mesh(_))]));

    // 抓取期间不会自行结束
    for _ in 0..200 {
        h.orchestrator.tick(16);
    }
    assert!(h.orchestrator.is_animating());

    h.events.grab_end.emit(&GrabEvent {
        window: WINDOW,
        op: GrabOp::Moving,
        pointer,
    });
    run_until_idle(&h.orchestrator);

    assert!(h.orchestrator.active_effects(WINDOW).is_empty());
    // move 没有窗口管理器完成通知
    assert!(h.sink.calls().is_empty());
}

/// 调整大小类抓取不产生动画
#[test]
fn test_resize_grab_ignored() {
    let mut settings = short_settings();
    settings.move_effect = "wobbly".to_string();
    let h = harness(settings);

    h.events.grab_begin.emit(&GrabEvent {
        window: WINDOW,
        op: GrabOp::Resizing,
        pointer: Vector::new(150.0, 120.0),
    });
    assert!(!h.orchestrator.is_animating());
}

/// 断开时报告播放中的事件，并且不再接收事件
#[test]
fn test_detach_mid_animation() {
    let h = harness(short_settings());

    h.events.map.emit(&window_event(EventDetail::default()));
    h.orchestrator.tick(2);
    assert!(h.orchestrator.is_animating());

    h.orchestrator.detach();
    assert_eq!(h.sink.calls(), vec![("map", WINDOW)]);
    assert!(!h.orchestrator.is_animating());
    assert_eq!(h.events.handler_count(), 0);

    h.events.minimize.emit(&window_event(icon()));
    assert_eq!(h.sink.calls(), vec![("map", WINDOW)]);

    // 重新挂接后恢复工作
    h.orchestrator.attach(&h.events);
    h.events.minimize.emit(&window_event(icon()));
    run_until_idle(&h.orchestrator);
    assert_eq!(h.sink.calls(), vec![("map", WINDOW), ("minimize", WINDOW)]);
}

/// 关闭打断另一种效果的打开动画：两个事件都报告完成
#[test]
fn test_close_during_open_of_other_effect() {
    let mut settings = AnimationSettings::default();
    settings.open_effect = "glide".to_string();
    settings.close_effect = "bounce".to_string();
    settings.set_number(keys::GLIDE_LENGTH, 100.0).unwrap();
    settings.set_number(keys::BOUNCE_LENGTH, 10.0).unwrap();
    let h = harness(settings);

    h.events.map.emit(&window_event(EventDetail::default()));
    h.orchestrator.tick(2);
    h.events.destroy.emit(&window_event(EventDetail::default()));
    assert_eq!(
        h.orchestrator.active_effects(WINDOW),
        vec![EffectKind::Bounce, EffectKind::Glide]
    );

    run_until_idle(&h.orchestrator);

    assert_eq!(h.sink.calls(), vec![("map", WINDOW), ("destroy", WINDOW)]);
    assert!(!h.orchestrator.is_managed(WINDOW));
}

/// 播放中停止管理窗口：事件立即报告完成
#[test]
fn test_unmanage_mid_animation() {
    let h = harness(short_settings());

    h.events.minimize.emit(&window_event(icon()));
    h.orchestrator.tick(2);
    h.orchestrator.unmanage(WINDOW).unwrap();

    assert_eq!(h.sink.calls(), vec![("minimize", WINDOW)]);
    assert!(!h.orchestrator.is_animating());

    // 窗口已不受管理，后续事件立即完成
    h.events.minimize.emit(&window_event(icon()));
    assert_eq!(
        h.sink.calls(),
        vec![("minimize", WINDOW), ("minimize", WINDOW)]
    );
}

/// 抓取期间改掉 move 效果：释放仍交给原来的 wobbly
#[test]
fn test_release_after_move_effect_changed() {
    let mut settings = short_settings();
    settings.move_effect = "wobbly".to_string();
    let h = harness(settings);

    let pointer = Vector::new(150.0, 120.0);
    let grab = GrabEvent {
        window: WINDOW,
        op: GrabOp::Moving,
        pointer,
    };
    h.events.grab_begin.emit(&grab);
    for _ in 0..5 {
        h.actor.move_by(Vector::new(8.0, 4.0));
        h.orchestrator.tick(16);
    }
    assert_eq!(h.actor.geometry_changed().handler_count(), 1);

    h.orchestrator
        .settings()
        .set_effect_name(EffectEvent::Move, "none");
    h.events.grab_end.emit(&grab);
    run_until_idle(&h.orchestrator);

    assert!(h.orchestrator.active_effects(WINDOW).is_empty());
    assert_eq!(h.actor.geometry_changed().handler_count(), 0);

    // 新的抓取按新设置处理
    h.events.grab_begin.emit(&grab);
    assert!(!h.orchestrator.is_animating());
}

/// 设置修改在下一帧生效
#[test]
fn test_live_settings_update() {
    let mut settings = AnimationSettings::default();
    settings.open_effect = "bounce".to_string();
    let h = harness(settings);

    h.events.map.emit(&window_event(EventDetail::default()));
    h.orchestrator.tick(50);
    assert!(h.orchestrator.is_animating());

    h.orchestrator
        .settings()
        .set_number(keys::BOUNCE_LENGTH, 40.0)
        .unwrap();
    h.orchestrator.tick(1);
    assert!(!h.orchestrator.is_animating());
    assert_eq!(h.sink.calls(), vec![("map", WINDOW)]);
}

/// 从磁盘加载设置并驱动动画
#[test]
fn test_settings_file_drives_orchestrator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "open-effect": "zoom", "zoom-length": 4 }"#,
    )
    .unwrap();

    let h = harness(AnimationSettings::load(&path));
    let detail = EventDetail::default().with_pointer(Vector::new(10.0, 10.0));
    assert!(
        h.orchestrator
            .dispatch(WINDOW, EffectEvent::Open, &detail)
            .unwrap()
    );
    assert_eq!(run_until_idle_with(&h.orchestrator, 1), 4);
    assert_eq!(h.sink.calls(), vec![("map", WINDOW)]);
}
