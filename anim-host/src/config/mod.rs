//! # Config 模块
//!
//! 动画设置的存储、校验与持久化。
//!
//! ## 配置优先级
//!
//! 1. 运行时通过 [`SettingsStore`] 修改的值（最高）
//! 2. 设置文件 (settings.json)
//! 3. 默认值（最低）
//!
//! 设置文件使用 kebab-case 键名，缺失的键取默认值：
//!
//! ```json
//! {
//!   "open-effect": "bounce",
//!   "bounce-length": 250,
//!   "bounce-n-bounce": 2
//! }
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use anim_runtime::{EffectEvent, SettingsProvider, Signal};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// 设置键名
pub mod keys {
    pub const OPEN_EFFECT: &str = "open-effect";
    pub const CLOSE_EFFECT: &str = "close-effect";
    pub const MINIMIZE_EFFECT: &str = "minimize-effect";
    pub const UNMINIMIZE_EFFECT: &str = "unminimize-effect";
    pub const MOVE_EFFECT: &str = "move-effect";

    pub const ZOOM_LENGTH: &str = "zoom-length";

    pub const BOUNCE_LENGTH: &str = "bounce-length";
    pub const BOUNCE_INITIAL_SCALE: &str = "bounce-initial-scale";
    pub const BOUNCE_MAXIMUM_SCALE: &str = "bounce-maximum-scale";
    pub const BOUNCE_N_BOUNCE: &str = "bounce-n-bounce";

    pub const GLIDE_LENGTH: &str = "glide-length";
    pub const GLIDE_INITIAL_DISTANCE: &str = "glide-initial-distance";
    pub const GLIDE_X_ROTATION_ANGLE_DEGREES: &str = "glide-x-rotation-angle-degrees";
    pub const GLIDE_Y_ROTATION_ANGLE_DEGREES: &str = "glide-y-rotation-angle-degrees";
    pub const GLIDE_X_AXIS_LOCATION_UNIT: &str = "glide-x-axis-location-unit";
    pub const GLIDE_Y_AXIS_LOCATION_UNIT: &str = "glide-y-axis-location-unit";

    pub const MAGICLAMP_LENGTH: &str = "magiclamp-length";
    pub const MAGICLAMP_BEND_FACTOR: &str = "magiclamp-bend-factor";
    pub const MAGICLAMP_OFFSET_FACTOR: &str = "magiclamp-offset-factor";
    pub const MAGICLAMP_STRETCH_FACTOR: &str = "magiclamp-stretch-factor";
    pub const MAGICLAMP_DEFORM_SPEED_FACTOR: &str = "magiclamp-deform-speed-factor";

    pub const WOBBLY_OBJECT_MOVEMENT_RANGE: &str = "wobbly-object-movement-range";
    pub const WOBBLY_SPRING_K: &str = "wobbly-spring-k";
    pub const WOBBLY_FRICTION: &str = "wobbly-friction";
    pub const WOBBLY_SLOWDOWN_FACTOR: &str = "wobbly-slowdown-factor";
}

/// 效果名取此值时按事件使用默认效果
pub const DEFAULT_EFFECT_NAME: &str = "default";

/// 动画设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnimationSettings {
    // ── 事件 → 效果 ──
    #[serde(default = "default_effect_name")]
    pub open_effect: String,
    #[serde(default = "default_effect_name")]
    pub close_effect: String,
    #[serde(default = "default_effect_name")]
    pub minimize_effect: String,
    #[serde(default = "default_effect_name")]
    pub unminimize_effect: String,
    #[serde(default = "default_effect_name")]
    pub move_effect: String,

    // ── zoom ──
    #[serde(default = "default_length")]
    pub zoom_length: u32,

    // ── bounce ──
    #[serde(default = "default_length")]
    pub bounce_length: u32,
    #[serde(default = "default_bounce_initial_scale")]
    pub bounce_initial_scale: f64,
    #[serde(default = "default_bounce_maximum_scale")]
    pub bounce_maximum_scale: f64,
    #[serde(default = "default_bounce_n_bounce")]
    pub bounce_n_bounce: u32,

    // ── glide ──
    #[serde(default = "default_length")]
    pub glide_length: u32,
    #[serde(default = "default_glide_initial_distance")]
    pub glide_initial_distance: f64,
    #[serde(default)]
    pub glide_x_rotation_angle_degrees: f64,
    #[serde(default)]
    pub glide_y_rotation_angle_degrees: f64,
    #[serde(default = "default_glide_x_axis_location_unit")]
    pub glide_x_axis_location_unit: f64,
    #[serde(default = "default_glide_y_axis_location_unit")]
    pub glide_y_axis_location_unit: f64,

    // ── magic lamp ──
    #[serde(default = "default_length")]
    pub magiclamp_length: u32,
    #[serde(default = "default_magiclamp_bend_factor")]
    pub magiclamp_bend_factor: f64,
    #[serde(default = "default_magiclamp_offset_factor")]
    pub magiclamp_offset_factor: f64,
    #[serde(default = "default_magiclamp_stretch_factor")]
    pub magiclamp_stretch_factor: f64,
    #[serde(default = "default_magiclamp_deform_speed_factor")]
    pub magiclamp_deform_speed_factor: f64,

    // ── wobbly ──
    #[serde(default = "default_wobbly_object_movement_range")]
    pub wobbly_object_movement_range: f64,
    #[serde(default = "default_wobbly_spring_k")]
    pub wobbly_spring_k: f64,
    #[serde(default = "default_wobbly_friction")]
    pub wobbly_friction: f64,
    #[serde(default = "default_wobbly_slowdown_factor")]
    pub wobbly_slowdown_factor: f64,
}

// 默认值函数
fn default_effect_name() -> String {
    DEFAULT_EFFECT_NAME.to_string()
}

fn default_length() -> u32 {
    anim_runtime::stepper::DEFAULT_LENGTH
}

fn default_bounce_initial_scale() -> f64 {
    anim_runtime::transform::bounce::defaults::INITIAL_SCALE
}

fn default_bounce_maximum_scale() -> f64 {
    anim_runtime::transform::bounce::defaults::MAXIMUM_SCALE
}

fn default_bounce_n_bounce() -> u32 {
    anim_runtime::transform::bounce::defaults::N_BOUNCE
}

fn default_glide_initial_distance() -> f64 {
    anim_runtime::transform::glide::defaults::INITIAL_DISTANCE
}

fn default_glide_x_axis_location_unit() -> f64 {
    anim_runtime::transform::glide::defaults::X_AXIS_LOCATION_UNIT
}

fn default_glide_y_axis_location_unit() -> f64 {
    anim_runtime::transform::glide::defaults::Y_AXIS_LOCATION_UNIT
}

fn default_magiclamp_bend_factor() -> f64 {
    anim_runtime::grid::magiclamp::defaults::BEND_FACTOR
}

fn default_magiclamp_offset_factor() -> f64 {
    anim_runtime::grid::magiclamp::defaults::OFFSET_FACTOR
}

fn default_magiclamp_stretch_factor() -> f64 {
    anim_runtime::grid::magiclamp::defaults::STRETCH_FACTOR
}

fn default_magiclamp_deform_speed_factor() -> f64 {
    anim_runtime::grid::magiclamp::defaults::DEFORM_SPEED_FACTOR
}

fn default_wobbly_object_movement_range() -> f64 {
    anim_runtime::wobbly::defaults::OBJECT_MOVEMENT_RANGE
}

fn default_wobbly_spring_k() -> f64 {
    anim_runtime::wobbly::defaults::SPRING_K
}

fn default_wobbly_friction() -> f64 {
    anim_runtime::wobbly::defaults::FRICTION
}

fn default_wobbly_slowdown_factor() -> f64 {
    anim_runtime::wobbly::defaults::SLOWDOWN_FACTOR
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            open_effect: default_effect_name(),
            close_effect: default_effect_name(),
            minimize_effect: default_effect_name(),
            unminimize_effect: default_effect_name(),
            move_effect: default_effect_name(),
            zoom_length: default_length(),
            bounce_length: default_length(),
            bounce_initial_scale: default_bounce_initial_scale(),
            bounce_maximum_scale: default_bounce_maximum_scale(),
            bounce_n_bounce: default_bounce_n_bounce(),
            glide_length: default_length(),
            glide_initial_distance: default_glide_initial_distance(),
            glide_x_rotation_angle_degrees: 0.0,
            glide_y_rotation_angle_degrees: 0.0,
            glide_x_axis_location_unit: default_glide_x_axis_location_unit(),
            glide_y_axis_location_unit: default_glide_y_axis_location_unit(),
            magiclamp_length: default_length(),
            magiclamp_bend_factor: default_magiclamp_bend_factor(),
            magiclamp_offset_factor: default_magiclamp_offset_factor(),
            magiclamp_stretch_factor: default_magiclamp_stretch_factor(),
            magiclamp_deform_speed_factor: default_magiclamp_deform_speed_factor(),
            wobbly_object_movement_range: default_wobbly_object_movement_range(),
            wobbly_spring_k: default_wobbly_spring_k(),
            wobbly_friction: default_wobbly_friction(),
            wobbly_slowdown_factor: default_wobbly_slowdown_factor(),
        }
    }
}

/// 数值设置的取值范围
///
/// 每个数值键恰好出现一次。
pub const NUMBER_RANGES: &[(&str, f64, f64)] = &[
    (keys::ZOOM_LENGTH, 1.0, 5000.0),
    (keys::BOUNCE_LENGTH, 1.0, 5000.0),
    (keys::BOUNCE_INITIAL_SCALE, 0.1, 1.0),
    (keys::BOUNCE_MAXIMUM_SCALE, 1.0, 3.0),
    (keys::BOUNCE_N_BOUNCE, 1.0, 10.0),
    (keys::GLIDE_LENGTH, 1.0, 5000.0),
    (keys::GLIDE_INITIAL_DISTANCE, -1.0, 1.0),
    (keys::GLIDE_X_ROTATION_ANGLE_DEGREES, -360.0, 360.0),
    (keys::GLIDE_Y_ROTATION_ANGLE_DEGREES, -360.0, 360.0),
    (keys::GLIDE_X_AXIS_LOCATION_UNIT, 0.0, 1.0),
    (keys::GLIDE_Y_AXIS_LOCATION_UNIT, 0.0, 1.0),
    (keys::MAGICLAMP_LENGTH, 1.0, 5000.0),
    (keys::MAGICLAMP_BEND_FACTOR, 1.0, 20.0),
    (keys::MAGICLAMP_OFFSET_FACTOR, 0.1, 1.0),
    (keys::MAGICLAMP_STRETCH_FACTOR, 0.2, 1.0),
    (keys::MAGICLAMP_DEFORM_SPEED_FACTOR, 1.0, 4.0),
    (keys::WOBBLY_OBJECT_MOVEMENT_RANGE, 10.0, 500.0),
    (keys::WOBBLY_SPRING_K, 2.0, 10.0),
    (keys::WOBBLY_FRICTION, 2.0, 10.0),
    (keys::WOBBLY_SLOWDOWN_FACTOR, 1.0, 5.0),
];

fn range_of(key: &str) -> Option<(f64, f64)> {
    NUMBER_RANGES
        .iter()
        .find(|(name, _, _)| *name == key)
        .map(|(_, min, max)| (*min, *max))
}

impl AnimationSettings {
    /// 加载设置文件
    ///
    /// 文件不存在、解析失败或校验失败时返回默认设置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "设置文件不存在，使用默认设置");
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(settings) => {
                info!(path = ?path, "设置文件加载成功");
                settings
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "设置文件无效，使用默认设置");
                Self::default()
            }
        }
    }

    /// 加载并校验设置文件
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// 保存为格式化的 JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 校验所有数值范围
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &(key, min, max) in NUMBER_RANGES {
            let value = self
                .number(key)
                .ok_or_else(|| ConfigError::UnknownKey { key: key.to_string() })?;

            if !value.is_finite() || value < min || value > max {
                return Err(ConfigError::Validation {
                    key: key.to_string(),
                    message: format!("{} 不在 {} - {} 之间", value, min, max),
                });
            }
        }

        for event in EffectEvent::ALL {
            if self.effect_name(event).trim().is_empty() {
                return Err(ConfigError::Validation {
                    key: effect_key(event).to_string(),
                    message: "效果名不能为空".to_string(),
                });
            }
        }

        Ok(())
    }

    /// 读取数值设置
    pub fn number(&self, key: &str) -> Option<f64> {
        let value = match key {
            keys::ZOOM_LENGTH => self.zoom_length as f64,
            keys::BOUNCE_LENGTH => self.bounce_length as f64,
            keys::BOUNCE_INITIAL_SCALE => self.bounce_initial_scale,
            keys::BOUNCE_MAXIMUM_SCALE => self.bounce_maximum_scale,
            keys::BOUNCE_N_BOUNCE => self.bounce_n_bounce as f64,
            keys::GLIDE_LENGTH => self.glide_length as f64,
            keys::GLIDE_INITIAL_DISTANCE => self.glide_initial_distance,
            keys::GLIDE_X_ROTATION_ANGLE_DEGREES => self.glide_x_rotation_angle_degrees,
            keys::GLIDE_Y_ROTATION_ANGLE_DEGREES => self.glide_y_rotation_angle_degrees,
            keys::GLIDE_X_AXIS_LOCATION_UNIT => self.glide_x_axis_location_unit,
            keys::GLIDE_Y_AXIS_LOCATION_UNIT => self.glide_y_axis_location_unit,
            keys::MAGICLAMP_LENGTH => self.magiclamp_length as f64,
            keys::MAGICLAMP_BEND_FACTOR => self.magiclamp_bend_factor,
            keys::MAGICLAMP_OFFSET_FACTOR => self.magiclamp_offset_factor,
            keys::MAGICLAMP_STRETCH_FACTOR => self.magiclamp_stretch_factor,
            keys::MAGICLAMP_DEFORM_SPEED_FACTOR => self.magiclamp_deform_speed_factor,
            keys::WOBBLY_OBJECT_MOVEMENT_RANGE => self.wobbly_object_movement_range,
            keys::WOBBLY_SPRING_K => self.wobbly_spring_k,
            keys::WOBBLY_FRICTION => self.wobbly_friction,
            keys::WOBBLY_SLOWDOWN_FACTOR => self.wobbly_slowdown_factor,
            _ => return None,
        };
        Some(value)
    }

    /// 修改数值设置
    ///
    /// 键不存在返回 [`ConfigError::UnknownKey`]，超出范围返回 [`ConfigError::Validation`]，
    /// 失败时不做任何修改。整数设置四舍五入。
    pub fn set_number(&mut self, key: &str, value: f64) -> Result<(), ConfigError> {
        let (min, max) =
            range_of(key).ok_or_else(|| ConfigError::UnknownKey { key: key.to_string() })?;
        if !value.is_finite() || value < min || value > max {
            return Err(ConfigError::Validation {
                key: key.to_string(),
                message: format!("{} 不在 {} - {} 之间", value, min, max),
            });
        }

        let whole = value.round() as u32;
        match key {
            keys::ZOOM_LENGTH => self.zoom_length = whole,
            keys::BOUNCE_LENGTH => self.bounce_length = whole,
            keys::BOUNCE_INITIAL_SCALE => self.bounce_initial_scale = value,
            keys::BOUNCE_MAXIMUM_SCALE => self.bounce_maximum_scale = value,
            keys::BOUNCE_N_BOUNCE => self.bounce_n_bounce = whole,
            keys::GLIDE_LENGTH => self.glide_length = whole,
            keys::GLIDE_INITIAL_DISTANCE => self.glide_initial_distance = value,
            keys::GLIDE_X_ROTATION_ANGLE_DEGREES => self.glide_x_rotation_angle_degrees = value,
            keys::GLIDE_Y_ROTATION_ANGLE_DEGREES => self.glide_y_rotation_angle_degrees = value,
            keys::GLIDE_X_AXIS_LOCATION_UNIT => self.glide_x_axis_location_unit = value,
            keys::GLIDE_Y_AXIS_LOCATION_UNIT => self.glide_y_axis_location_unit = value,
            keys::MAGICLAMP_LENGTH => self.magiclamp_length = whole,
            keys::MAGICLAMP_BEND_FACTOR => self.magiclamp_bend_factor = value,
            keys::MAGICLAMP_OFFSET_FACTOR => self.magiclamp_offset_factor = value,
            keys::MAGICLAMP_STRETCH_FACTOR => self.magiclamp_stretch_factor = value,
            keys::MAGICLAMP_DEFORM_SPEED_FACTOR => self.magiclamp_deform_speed_factor = value,
            keys::WOBBLY_OBJECT_MOVEMENT_RANGE => self.wobbly_object_movement_range = value,
            keys::WOBBLY_SPRING_K => self.wobbly_spring_k = value,
            keys::WOBBLY_FRICTION => self.wobbly_friction = value,
            keys::WOBBLY_SLOWDOWN_FACTOR => self.wobbly_slowdown_factor = value,
            _ => return Err(ConfigError::UnknownKey { key: key.to_string() }),
        }
        Ok(())
    }

    /// 事件对应的效果名（可能为 `"default"`）
    pub fn effect_name(&self, event: EffectEvent) -> &str {
        match event {
            EffectEvent::Open => &self.open_effect,
            EffectEvent::Close => &self.close_effect,
            EffectEvent::Minimize => &self.minimize_effect,
            EffectEvent::Unminimize => &self.unminimize_effect,
            EffectEvent::Move => &self.move_effect,
        }
    }

    /// 设置事件对应的效果名
    pub fn set_effect_name(&mut self, event: EffectEvent, name: impl Into<String>) {
        let name = name.into();
        match event {
            EffectEvent::Open => self.open_effect = name,
            EffectEvent::Close => self.close_effect = name,
            EffectEvent::Minimize => self.minimize_effect = name,
            EffectEvent::Unminimize => self.unminimize_effect = name,
            EffectEvent::Move => self.move_effect = name,
        }
    }
}

/// 事件对应的效果设置键
pub fn effect_key(event: EffectEvent) -> &'static str {
    match event {
        EffectEvent::Open => keys::OPEN_EFFECT,
        EffectEvent::Close => keys::CLOSE_EFFECT,
        EffectEvent::Minimize => keys::MINIMIZE_EFFECT,
        EffectEvent::Unminimize => keys::UNMINIMIZE_EFFECT,
        EffectEvent::Move => keys::MOVE_EFFECT,
    }
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析或序列化失败
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    /// 数值超出范围
    #[error("配置项 '{key}' 无效: {message}")]
    Validation { key: String, message: String },

    /// 未知键名
    #[error("未知配置项 '{key}'")]
    UnknownKey { key: String },
}

/// 共享设置存储
///
/// 绑定到这里的动画参数每帧读取最新值；任何修改都会发出 `changed` 通知。
pub struct SettingsStore {
    settings: RefCell<AnimationSettings>,
    changed: Signal<()>,
}

impl SettingsStore {
    pub fn new(settings: AnimationSettings) -> Self {
        Self {
            settings: RefCell::new(settings),
            changed: Signal::new(),
        }
    }

    /// 当前设置的快照
    pub fn snapshot(&self) -> AnimationSettings {
        self.settings.borrow().clone()
    }

    /// 事件对应的效果名
    pub fn effect_name(&self, event: EffectEvent) -> String {
        self.settings.borrow().effect_name(event).to_string()
    }

    /// 修改数值设置
    pub fn set_number(&self, key: &str, value: f64) -> Result<(), ConfigError> {
        self.settings.borrow_mut().set_number(key, value)?;
        self.changed.emit(&());
        Ok(())
    }

    /// 修改事件对应的效果名
    pub fn set_effect_name(&self, event: EffectEvent, name: impl Into<String>) {
        self.settings.borrow_mut().set_effect_name(event, name);
        self.changed.emit(&());
    }

    /// 整体替换（例如重新加载设置文件后）
    pub fn replace(&self, settings: AnimationSettings) -> Result<(), ConfigError> {
        settings.validate()?;
        *self.settings.borrow_mut() = settings;
        self.changed.emit(&());
        Ok(())
    }

    /// 修改通知
    pub fn changed(&self) -> &Signal<()> {
        &self.changed
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(AnimationSettings::default())
    }
}

impl SettingsProvider for SettingsStore {
    fn number(&self, key: &str) -> Option<f64> {
        self.settings.borrow().number(key)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AnimationSettings::default();
        assert_eq!(settings.zoom_length, 300);
        assert_eq!(settings.bounce_initial_scale, 0.7);
        assert_eq!(settings.bounce_maximum_scale, 1.2);
        assert_eq!(settings.bounce_n_bounce, 1);
        assert_eq!(settings.glide_initial_distance, -0.3);
        assert_eq!(settings.magiclamp_deform_speed_factor, 2.3);
        assert_eq!(settings.wobbly_spring_k, 8.0);
        assert_eq!(settings.effect_name(EffectEvent::Open), DEFAULT_EFFECT_NAME);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_kebab_case_keys_and_partial_file() {
        let json = r#"{ "open-effect": "bounce", "bounce-n-bounce": 3 }"#;
        let settings: AnimationSettings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.open_effect, "bounce");
        assert_eq!(settings.bounce_n_bounce, 3);
        // 缺失键取默认值
        assert_eq!(settings.glide_length, 300);

        let json = serde_json::to_string(&AnimationSettings::default()).unwrap();
        assert!(json.contains("\"glide-x-rotation-angle-degrees\""));
        assert!(json.contains("\"magiclamp-bend-factor\""));
    }

    #[test]
    fn test_every_range_key_is_readable() {
        let settings = AnimationSettings::default();
        for (key, min, max) in NUMBER_RANGES {
            let value = settings.number(key).unwrap();
            assert!(value >= *min && value <= *max, "{} = {}", key, value);
        }
        assert_eq!(settings.number("no-such-key"), None);
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let mut settings = AnimationSettings::default();
        settings.bounce_maximum_scale = 5.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Validation { key, .. }) if key == keys::BOUNCE_MAXIMUM_SCALE
        ));

        let mut settings = AnimationSettings::default();
        settings.zoom_length = 0;
        assert!(settings.validate().is_err());

        let mut settings = AnimationSettings::default();
        settings.close_effect = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_set_number() {
        let mut settings = AnimationSettings::default();
        settings.set_number(keys::BOUNCE_N_BOUNCE, 2.6).unwrap();
        assert_eq!(settings.bounce_n_bounce, 3);

        assert!(matches!(
            settings.set_number(keys::WOBBLY_FRICTION, 50.0),
            Err(ConfigError::Validation { .. })
        ));
        assert_eq!(settings.wobbly_friction, 3.0);

        assert!(matches!(
            settings.set_number("zoom-speed", 1.0),
            Err(ConfigError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_store_notifies_and_provides() {
        let store = SettingsStore::default();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let _connection = store.changed().connect(move |_| seen.set(seen.get() + 1));

        store.set_number(keys::GLIDE_LENGTH, 120.0).unwrap();
        assert_eq!(store.number(keys::GLIDE_LENGTH), Some(120.0));

        store.set_effect_name(EffectEvent::Minimize, "magiclamp");
        assert_eq!(store.effect_name(EffectEvent::Minimize), "magiclamp");

        // 失败的修改不通知
        assert!(store.set_number(keys::GLIDE_LENGTH, -1.0).is_err());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AnimationSettings::load(dir.path().join("missing.json"));
        assert_eq!(settings, AnimationSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = AnimationSettings::default();
        settings.open_effect = "zoom".to_string();
        settings.magiclamp_bend_factor = 12.5;
        settings.save(&path).unwrap();

        let loaded = AnimationSettings::try_load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "wobbly-spring-k": 99 }"#).unwrap();

        assert!(matches!(
            AnimationSettings::try_load(&path),
            Err(ConfigError::Validation { .. })
        ));
        assert_eq!(AnimationSettings::load(&path), AnimationSettings::default());

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            AnimationSettings::try_load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
