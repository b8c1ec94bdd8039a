//! # Param 模块
//!
//! 动画参数的实时读取接口。
//!
//! ## 核心概念
//!
//! - [`SettingsProvider`]：外部设置源，按名称提供标量值
//! - [`Param`]：参数槽，可以是固定值，也可以是每次读取都重新求值的访问器
//! - [`SharedValue`]：基于 `Rc<Cell<T>>` 的简单共享值，宿主与测试可直接修改
//!
//! 动画在每帧调用 [`Param::get`]，因此外部设置在两帧之间的修改会在下一帧生效。

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// 外部设置源接口
///
/// 只读：动画从不写回设置。
pub trait SettingsProvider {
    /// 读取数值设置，键不存在时返回 `None`
    fn number(&self, key: &str) -> Option<f64>;
}

/// 参数槽
///
/// ## 使用示例
///
/// ```rust,ignore
/// let length = SharedValue::new(300u32);
/// let stepper = LinearStepper::new(length.param());
///
/// length.set(600);
/// // 下一次 step() 读取到 600
/// ```
#[derive(Clone)]
pub enum Param<T> {
    /// 构造时固定的值
    Fixed(T),
    /// 每次读取都重新求值
    Live(Rc<dyn Fn() -> T>),
}

impl<T: Copy + 'static> Param<T> {
    /// 固定值
    pub fn fixed(value: T) -> Self {
        Self::Fixed(value)
    }

    /// 由读取函数创建
    pub fn from_fn(read: impl Fn() -> T + 'static) -> Self {
        Self::Live(Rc::new(read))
    }

    /// 读取当前值
    pub fn get(&self) -> T {
        match self {
            Self::Fixed(value) => *value,
            Self::Live(read) => read(),
        }
    }

    /// 是否为实时绑定
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

impl Param<f64> {
    /// 绑定到命名设置，缺失时使用 `fallback`
    pub fn bound(provider: Rc<dyn SettingsProvider>, key: &'static str, fallback: f64) -> Self {
        Self::from_fn(move || provider.number(key).unwrap_or(fallback))
    }
}

impl Param<u32> {
    /// 绑定到命名设置，数值四舍五入并截断到非负
    pub fn bound(provider: Rc<dyn SettingsProvider>, key: &'static str, fallback: u32) -> Self {
        Self::from_fn(move || {
            provider
                .number(key)
                .filter(|v| v.is_finite())
                .map(|v| v.round().clamp(0.0, u32::MAX as f64) as u32)
                .unwrap_or(fallback)
        })
    }
}

impl<T: Copy + 'static> From<T> for Param<T> {
    fn from(value: T) -> Self {
        Self::Fixed(value)
    }
}

impl<T: fmt::Debug + Copy + 'static> fmt::Debug for Param<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Live(_) => f.debug_tuple("Live").field(&self.get()).finish(),
        }
    }
}

/// 简单共享值
///
/// 克隆共享同一份存储。
#[derive(Debug, Clone)]
pub struct SharedValue<T: Copy> {
    value: Rc<Cell<T>>,
}

impl<T: Copy + 'static> SharedValue<T> {
    pub fn new(initial_value: T) -> Self {
        Self {
            value: Rc::new(Cell::new(initial_value)),
        }
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn set(&self, value: T) {
        self.value.set(value);
    }

    /// 生成实时读取该值的参数槽
    pub fn param(&self) -> Param<T> {
        let value = self.value.clone();
        Param::from_fn(move || value.get())
    }
}
