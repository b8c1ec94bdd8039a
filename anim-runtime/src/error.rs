//! # Error 模块
//!
//! 定义 anim-runtime 中可报告的错误类型。
//!
//! 数值上的边界情况（零长度步进器、零尺寸矩形、零网格分辨率）一律通过钳制处理，
//! 不会出现在这里。状态机误用（未激活就推进、重复抓取）属于调用方的编程错误，
//! 直接 panic。

use thiserror::Error;

/// 效果激活错误
///
/// 由各效果的动画构建过程产生，最终在 `activate()` 中统一转换为
/// `handled = false`，不会越过公共接口。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    /// 事件名称不在已知集合内
    #[error("未知事件 '{name}'")]
    UnknownEvent { name: String },

    /// 具体效果不处理该事件
    #[error("效果 '{effect}' 不支持事件 '{event}'")]
    UnsupportedEvent {
        effect: &'static str,
        event: &'static str,
    },

    /// 事件缺少构建动画所需的附加信息
    #[error("事件 '{event}' 缺少字段 '{field}'")]
    MissingDetail {
        event: &'static str,
        field: &'static str,
    },
}

/// Result 类型别名
pub type EffectResult<T> = Result<T, EffectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EffectError::UnsupportedEvent {
            effect: "bounce",
            event: "minimize",
        };
        assert_eq!(err.to_string(), "效果 'bounce' 不支持事件 'minimize'");

        let err = EffectError::MissingDetail {
            event: "minimize",
            field: "icon",
        };
        assert!(err.to_string().contains("icon"));
    }
}
