//! # Effect Registry
//!
//! 效果名称与事件默认映射。
//! 这是所有效果名称、默认效果的**唯一来源**。

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use anim_runtime::{
    BounceEffect, BounceParams, BounceSetup, Effect, EffectEvent, EffectTarget, GlideEffect,
    GlideParams, GlideSetup, MagicLampEffect, MagicLampParams, MagicLampSetup, Param,
    SettingsProvider, WobblyEffect, WobblyParams, ZoomEffect, ZoomSetup,
};
use tracing::warn;

use crate::config::{DEFAULT_EFFECT_NAME, SettingsStore, keys};
use crate::orchestrator::OrchestratorError;

/// 效果类型
///
/// ## 语义说明
///
/// - `None`：无动画，事件立即完成
/// - `Zoom`：从指针或任务栏图标缩放到窗口
/// - `Bounce`：原地缩放并振荡
/// - `Glide`：绕轴旋转并沿深度滑入
/// - `MagicLamp`：窗口沿漏斗形网格吸入任务栏图标
/// - `Wobbly`：拖动时的弹簧网格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    /// 无效果
    None,
    /// 缩放
    ///
    /// 适用于：open / close / minimize / unminimize
    Zoom,
    /// 弹跳
    ///
    /// 适用于：open / close
    Bounce,
    /// 滑行
    ///
    /// 适用于：open / close
    Glide,
    /// 神灯
    ///
    /// 适用于：minimize / unminimize
    MagicLamp,
    /// 果冻窗口
    ///
    /// 适用于：move
    Wobbly,
}

impl EffectKind {
    /// 全部效果
    pub const ALL: [EffectKind; 6] = [
        Self::None,
        Self::Zoom,
        Self::Bounce,
        Self::Glide,
        Self::MagicLamp,
        Self::Wobbly,
    ];

    /// 设置文件中使用的名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Zoom => "zoom",
            Self::Bounce => "bounce",
            Self::Glide => "glide",
            Self::MagicLamp => "magiclamp",
            Self::Wobbly => "wobbly",
        }
    }

    /// 是否支持该事件；`None` 对任何事件都不产生动画
    pub fn supports(&self, event: EffectEvent) -> bool {
        use EffectEvent::*;
        match self {
            Self::None => false,
            Self::Zoom => matches!(event, Open | Close | Minimize | Unminimize),
            Self::Bounce | Self::Glide => matches!(event, Open | Close),
            Self::MagicLamp => matches!(event, Minimize | Unminimize),
            Self::Wobbly => matches!(event, Move),
        }
    }

    /// 由名称解析效果（大小写不敏感）
    ///
    /// 未知名称退回到 [`EffectKind::None`] 并记录警告。
    pub fn resolve(name: &str) -> Self {
        match name.parse() {
            Ok(kind) => kind,
            Err(e) => {
                warn!(error = %e, "未知效果，按无效果处理");
                Self::None
            }
        }
    }

    /// 事件在设置中对应的效果
    ///
    /// 名称为 `"default"` 时查默认表；效果不支持该事件时按无效果处理。
    pub fn for_event(settings: &SettingsStore, event: EffectEvent) -> Self {
        let name = settings.effect_name(event);
        let kind = if name.eq_ignore_ascii_case(DEFAULT_EFFECT_NAME) {
            defaults::for_event(event)
        } else {
            Self::resolve(&name)
        };

        if kind != Self::None && !kind.supports(event) {
            warn!(effect = kind.name(), event = %event, "效果不支持该事件，按无效果处理");
            return Self::None;
        }
        kind
    }
}

impl FromStr for EffectKind {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| OrchestratorError::UnknownEffect {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// 各事件的默认效果
///
/// 设置项取值为 `"default"` 时使用这里的映射。
pub mod defaults {
    use super::{EffectEvent, EffectKind};

    pub const OPEN: EffectKind = EffectKind::Glide;
    pub const CLOSE: EffectKind = EffectKind::Glide;
    pub const MINIMIZE: EffectKind = EffectKind::Zoom;
    pub const UNMINIMIZE: EffectKind = EffectKind::Zoom;
    pub const MOVE: EffectKind = EffectKind::None;

    pub fn for_event(event: EffectEvent) -> EffectKind {
        match event {
            EffectEvent::Open => OPEN,
            EffectEvent::Close => CLOSE,
            EffectEvent::Minimize => MINIMIZE,
            EffectEvent::Unminimize => UNMINIMIZE,
            EffectEvent::Move => MOVE,
        }
    }
}

/// 创建绑定到设置存储的效果实例
///
/// 所有参数都实时绑定，设置修改在下一帧生效。`None` 返回 `None`。
pub fn create_effect(
    kind: EffectKind,
    settings: &Rc<SettingsStore>,
    target: EffectTarget,
) -> Option<Box<dyn Effect>> {
    let provider: Rc<dyn SettingsProvider> = settings.clone();
    let number = |key: &'static str, fallback: f64| Param::<f64>::bound(provider.clone(), key, fallback);
    let whole = |key: &'static str, fallback: u32| Param::<u32>::bound(provider.clone(), key, fallback);

    let effect: Box<dyn Effect> = match kind {
        EffectKind::None => return None,
        EffectKind::Zoom => {
            let defaults = ZoomSetup::default();
            let setup = ZoomSetup {
                length: whole(keys::ZOOM_LENGTH, defaults.length.get()),
            };
            Box::new(ZoomEffect::new(setup, target))
        }
        EffectKind::Bounce => {
            let defaults = BounceParams::default();
            let setup = BounceSetup {
                length: whole(keys::BOUNCE_LENGTH, BounceSetup::default().length.get()),
                params: BounceParams {
                    initial_scale: number(keys::BOUNCE_INITIAL_SCALE, defaults.initial_scale.get()),
                    maximum_scale: number(keys::BOUNCE_MAXIMUM_SCALE, defaults.maximum_scale.get()),
                    n_bounce: whole(keys::BOUNCE_N_BOUNCE, defaults.n_bounce.get()),
                },
            };
            Box::new(BounceEffect::new(setup, target))
        }
        EffectKind::Glide => {
            let defaults = GlideParams::default();
            let setup = GlideSetup {
                length: whole(keys::GLIDE_LENGTH, GlideSetup::default().length.get()),
                params: GlideParams {
                    initial_distance: number(
                        keys::GLIDE_INITIAL_DISTANCE,
                        defaults.initial_distance.get(),
                    ),
                    x_rotation_angle_degrees: number(
                        keys::GLIDE_X_ROTATION_ANGLE_DEGREES,
                        defaults.x_rotation_angle_degrees.get(),
                    ),
                    y_rotation_angle_degrees: number(
                        keys::GLIDE_Y_ROTATION_ANGLE_DEGREES,
                        defaults.y_rotation_angle_degrees.get(),
                    ),
                    x_axis_location_unit: number(
                        keys::GLIDE_X_AXIS_LOCATION_UNIT,
                        defaults.x_axis_location_unit.get(),
                    ),
                    y_axis_location_unit: number(
                        keys::GLIDE_Y_AXIS_LOCATION_UNIT,
                        defaults.y_axis_location_unit.get(),
                    ),
                },
            };
            Box::new(GlideEffect::new(setup, target))
        }
        EffectKind::MagicLamp => {
            let defaults = MagicLampParams::default();
            let setup = MagicLampSetup {
                length: whole(keys::MAGICLAMP_LENGTH, MagicLampSetup::default().length.get()),
                params: MagicLampParams {
                    bend_factor: number(keys::MAGICLAMP_BEND_FACTOR, defaults.bend_factor.get()),
                    offset_factor: number(
                        keys::MAGICLAMP_OFFSET_FACTOR,
                        defaults.offset_factor.get(),
                    ),
                    stretch_factor: number(
                        keys::MAGICLAMP_STRETCH_FACTOR,
                        defaults.stretch_factor.get(),
                    ),
                    deform_speed_factor: number(
                        keys::MAGICLAMP_DEFORM_SPEED_FACTOR,
                        defaults.deform_speed_factor.get(),
                    ),
                },
                resolution: MagicLampSetup::RESOLUTION,
            };
            Box::new(MagicLampEffect::new(setup, target))
        }
        EffectKind::Wobbly => {
            let defaults = WobblyParams::default();
            let params = WobblyParams {
                object_movement_range: number(
                    keys::WOBBLY_OBJECT_MOVEMENT_RANGE,
                    defaults.object_movement_range.get(),
                ),
                spring_k: number(keys::WOBBLY_SPRING_K, defaults.spring_k.get()),
                friction: number(keys::WOBBLY_FRICTION, defaults.friction.get()),
                slowdown_factor: number(
                    keys::WOBBLY_SLOWDOWN_FACTOR,
                    defaults.slowdown_factor.get(),
                ),
            };
            Box::new(WobblyEffect::new(params, target))
        }
    };
    Some(effect)
}
