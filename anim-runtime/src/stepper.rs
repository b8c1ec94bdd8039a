//! # Stepper 模块
//!
//! 将已经过的帧数映射到 `[0, 1]` 区间内的进度。
//!
//! 步进器是纯函数：不持有时钟，也没有副作用。长度通过 [`Param`] 读取，
//! 外部设置修改后下一次 `step` 即可生效。
//!
//! ## 组合
//!
//! ```rust,ignore
//! let forward = LinearStepper::new(200u32);
//! let backward = ReverseStepper::new(Box::new(LinearStepper::new(200u32)));
//!
//! assert_eq!(forward.step(100), 0.5);
//! assert_eq!(backward.step(50), 0.75);
//! ```

use crate::param::Param;

/// 默认长度（帧）
pub const DEFAULT_LENGTH: u32 = 300;

/// 步进器接口
pub trait Stepper {
    /// 返回 `elapsed` 对应的进度，负值按 0 处理
    fn step(&self, elapsed: i64) -> f64;

    /// 总长度（帧）
    fn length(&self) -> u32;
}

/// 播放方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 进度 0 → 1
    Forward,
    /// 进度 1 → 0
    Reverse,
}

impl Direction {
    /// 按方向创建线性步进器
    pub fn stepper(self, length: Param<u32>) -> Box<dyn Stepper> {
        let linear = Box::new(LinearStepper::new(length));
        match self {
            Self::Forward => linear,
            Self::Reverse => Box::new(ReverseStepper::new(linear)),
        }
    }
}

/// 线性步进器
///
/// `progress = clamp(elapsed / length, 0, 1)`，长度为 0 时直接返回 1。
#[derive(Debug, Clone)]
pub struct LinearStepper {
    length: Param<u32>,
}

impl LinearStepper {
    pub fn new(length: impl Into<Param<u32>>) -> Self {
        Self {
            length: length.into(),
        }
    }
}

impl Default for LinearStepper {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl Stepper for LinearStepper {
    fn step(&self, elapsed: i64) -> f64 {
        let length = self.length.get();
        if length == 0 {
            return 1.0;
        }

        (elapsed.max(0) as f64 / length as f64).clamp(0.0, 1.0)
    }

    fn length(&self) -> u32 {
        self.length.get()
    }
}

/// 反向步进器
///
/// 返回 `1 - base.step(elapsed)`，长度读取直接转发给被包装的步进器。
pub struct ReverseStepper {
    base: Box<dyn Stepper>,
}

impl ReverseStepper {
    pub fn new(base: Box<dyn Stepper>) -> Self {
        Self { base }
    }

    /// 被包装的步进器
    pub fn base(&self) -> &dyn Stepper {
        self.base.as_ref()
    }
}

impl Stepper for ReverseStepper {
    fn step(&self, elapsed: i64) -> f64 {
        1.0 - self.base.step(elapsed)
    }

    fn length(&self) -> u32 {
        self.base.length()
    }
}

impl std::fmt::Debug for ReverseStepper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReverseStepper")
            .field("length", &self.base.length())
            .finish()
    }
}
