//! # Wobbly 模块
//!
//! 拖动窗口时的弹簧网格效果。不使用步进器：抓取期间 actor 的每次位移直接
//! 作用在被抓住的质点上，其余质点按弹簧模型逐帧回弹。
//!
//! ## 状态
//!
//! ```text
//! idle ──move{grabbed: true}──▶ grabbed ──move{grabbed: false}──▶ settling ──静止──▶ idle
//!                                  ▲                                  │
//!                                  └──────move{grabbed: true}─────────┘
//! ```
//!
//! 重复抓取、未抓取就释放都不处理（返回 `false`），不会注册第二个位移监听。

pub mod model;

pub use model::{Anchor, Model, ModelSettings};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::effect::{
    Activation, Completion, Effect, EffectEvent, EffectTarget, EventDetail, PaintState,
};
use crate::error::{EffectError, EffectResult};
use crate::geometry::{AnimBox, Vector, Vector4};
use crate::grid::DeformedMesh;
use crate::paint::{enlarge_for_effects, expand_with_extremes};
use crate::param::Param;
use crate::provider::ActorGeometry;
use crate::signal::Connection;

/// 默认参数
pub mod defaults {
    pub const OBJECT_MOVEMENT_RANGE: f64 = 100.0;
    pub const SPRING_K: f64 = 8.0;
    pub const FRICTION: f64 = 3.0;
    pub const SLOWDOWN_FACTOR: f64 = 1.0;
}

/// 绘制网格的采样密度（每轴顶点数）
const MESH_SAMPLES: usize = 8;

/// 弹簧参数（每帧重新读取）
#[derive(Debug, Clone)]
pub struct WobblyParams {
    pub object_movement_range: Param<f64>,
    pub spring_k: Param<f64>,
    pub friction: Param<f64>,
    pub slowdown_factor: Param<f64>,
}

impl WobblyParams {
    /// 当前值对应的模型参数
    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            spring_k: self.spring_k.get(),
            friction: self.friction.get(),
            maximum_range: self.object_movement_range.get(),
        }
    }
}

impl Default for WobblyParams {
    fn default() -> Self {
        Self {
            object_movement_range: Param::fixed(defaults::OBJECT_MOVEMENT_RANGE),
            spring_k: Param::fixed(defaults::SPRING_K),
            friction: Param::fixed(defaults::FRICTION),
            slowdown_factor: Param::fixed(defaults::SLOWDOWN_FACTOR),
        }
    }
}

/// 模型与抓取状态
///
/// 模型坐标为 actor 局部坐标。
#[derive(Debug, Default)]
struct Simulation {
    model: Option<Model>,
    anchor: Option<Anchor>,
    last_position: Vector,
    last_size: Vector,
}

impl Simulation {
    fn grab(&mut self, actor: &dyn ActorGeometry, pointer: Vector, settings: ModelSettings) {
        assert!(self.anchor.is_none(), "弹簧网格仍有被抓住的质点");

        let position = actor.position();
        let model = self.model.get_or_insert_with(|| {
            let area = enlarge_for_effects(actor.actor_box()).translate(-position);
            Model::new(area.top_left, area.size(), settings)
        });

        self.anchor = Some(model.grab_anchor(pointer - position));
        self.last_position = position;
        self.last_size = actor.size();
    }

    fn release(&mut self) {
        if let (Some(model), Some(anchor)) = (self.model.as_mut(), self.anchor.take()) {
            model.release_anchor(anchor);
        }
    }

    /// actor 移动 `delta`：被抓住的质点跟随指针，其余质点相对 actor 落后
    fn move_by(&mut self, delta: Vector) {
        let (Some(model), Some(anchor)) = (self.model.as_mut(), self.anchor.as_ref()) else {
            return;
        };
        model.move_by(-delta);
        model.move_anchor(anchor, delta);
    }

    fn geometry_changed(&mut self, actor: &dyn ActorGeometry) {
        let position = actor.position();
        let size = actor.size();

        let delta = position - self.last_position;
        self.last_position = position;
        if delta != Vector::ZERO {
            self.move_by(delta);
        }

        if size != self.last_size {
            self.last_size = size;
            if let Some(model) = self.model.as_mut() {
                model.resize(enlarge_for_effects(actor.actor_box()).size());
            }
        }
    }
}

/// 弹簧网格效果
pub struct WobblyEffect {
    params: WobblyParams,
    target: EffectTarget,
    activation: Activation,
    simulation: Rc<RefCell<Simulation>>,
    moved: Option<Connection>,
}

impl WobblyEffect {
    pub const NAME: &'static str = "wobbly";

    pub fn new(params: WobblyParams, target: EffectTarget) -> Self {
        Self {
            params,
            target,
            activation: Activation::new(),
            simulation: Rc::new(RefCell::new(Simulation::default())),
            moved: None,
        }
    }

    pub fn params(&self) -> &WobblyParams {
        &self.params
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    /// 是否处于抓取状态（已注册位移监听）
    pub fn is_grabbed(&self) -> bool {
        self.moved.is_some()
    }

    /// 位移监听数量
    pub fn listener_count(&self) -> usize {
        self.target.actor.geometry_changed().handler_count()
    }

    /// 模型四角（合成器坐标）
    pub fn extremes(&self) -> Option<[Vector4; 4]> {
        let simulation = self.simulation.borrow();
        let model = simulation.model.as_ref()?;
        let origin = self.target.actor.position().extend(0.0).extend(0.0);
        Some(model.extremes().map(|corner| corner + origin))
    }

    fn grab(&mut self, detail: &EventDetail) -> bool {
        if self.moved.is_some() {
            warn!(effect = Self::NAME, "重复抓取，忽略");
            return false;
        }

        let actor = self.target.actor.clone();
        let pointer = detail
            .pointer
            .unwrap_or_else(|| actor.actor_box().center());
        self.simulation
            .borrow_mut()
            .grab(actor.as_ref(), pointer, self.params.model_settings());

        let simulation = Rc::downgrade(&self.simulation);
        let source: Weak<dyn ActorGeometry> = Rc::downgrade(&actor);
        self.moved = Some(actor.geometry_changed().connect(move |_| {
            if let (Some(simulation), Some(actor)) = (simulation.upgrade(), source.upgrade()) {
                simulation.borrow_mut().geometry_changed(actor.as_ref());
            }
        }));

        debug!(effect = Self::NAME, pointer = ?pointer, "抓取");
        true
    }

    fn ungrab(&mut self) -> bool {
        let Some(moved) = self.moved.take() else {
            debug!(effect = Self::NAME, "未抓取，忽略释放");
            return false;
        };
        moved.disconnect();
        self.simulation.borrow_mut().release();

        debug!(effect = Self::NAME, "释放");
        true
    }

    fn handle(&mut self, event: &str, detail: &EventDetail) -> EffectResult<bool> {
        let event = event.parse::<EffectEvent>()?;
        if event != EffectEvent::Move {
            return Err(EffectError::UnsupportedEvent {
                effect: Self::NAME,
                event: event.as_str(),
            });
        }
        let grabbed = detail.grabbed.ok_or(EffectError::MissingDetail {
            event: event.as_str(),
            field: "grabbed",
        })?;

        Ok(if grabbed { self.grab(detail) } else { self.ungrab() })
    }
}

impl Effect for WobblyEffect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn activate(&mut self, event: &str, detail: &EventDetail, done: Completion) -> bool {
        match self.handle(event, detail) {
            Ok(true) => {
                self.activation.begin(done);
                true
            }
            Ok(false) => false,
            Err(e) => {
                debug!(effect = Self::NAME, error = %e, "事件未处理");
                false
            }
        }
    }

    fn remove(&mut self) {
        self.moved = None;
        *self.simulation.borrow_mut() = Simulation::default();
        self.activation.remove();
    }

    fn is_enabled(&self) -> bool {
        self.activation.is_enabled()
    }

    fn tick(&mut self, delta: i64) {
        assert!(
            self.activation.count() > 0,
            "效果 '{}' 从未激活就被推进",
            Self::NAME
        );
        if delta <= 0 || !self.activation.is_enabled() {
            return;
        }

        let slowdown = self.params.slowdown_factor.get().max(f64::EPSILON);
        let settled = {
            let mut simulation = self.simulation.borrow_mut();
            let grabbed = simulation.anchor.is_some();
            let Some(model) = simulation.model.as_mut() else {
                return;
            };
            model.set_settings(self.params.model_settings());
            let moving = model.step(delta as f64 / slowdown);

            let settled = !moving && !grabbed;
            if settled {
                simulation.model = None;
            }
            settled
        };

        if settled {
            debug!(effect = Self::NAME, "网格静止");
            self.activation.set_enabled(false);
        }
    }

    fn paint_state(&self) -> PaintState {
        if !self.activation.is_enabled() {
            return PaintState::Identity;
        }
        let simulation = self.simulation.borrow();
        match simulation.model.as_ref() {
            Some(model) => PaintState::Mesh(DeformedMesh::sample(
                MESH_SAMPLES,
                MESH_SAMPLES,
                |uv| model.deform_texcoords(uv),
            )),
            None => PaintState::Identity,
        }
    }

    fn paint_box(&self) -> Option<AnimBox> {
        if !self.activation.is_enabled() {
            return None;
        }
        let extremes = self.extremes()?;
        Some(expand_with_extremes(
            enlarge_for_effects(self.target.actor_box()),
            &extremes,
            Vector::ZERO,
        ))
    }
}

impl std::fmt::Debug for WobblyEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WobblyEffect")
            .field("params", &self.params)
            .field("activation", &self.activation)
            .field("grabbed", &self.is_grabbed())
            .finish()
    }
}
