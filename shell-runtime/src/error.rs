//! # Error 模块
//!
//! 定义 shell-runtime 中使用的错误类型。

use thiserror::Error;

/// 路由错误
///
/// 所有错误都不会修改状态：返回 `Err` 时 `ShellState` 与调用前完全一致。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShellError {
    /// 会话已经初始化过
    #[error("会话已启动，不能重复初始化")]
    AlreadyLaunched,

    /// 内容尚未就绪，界面操作无效
    #[error("内容尚未就绪（当前阶段：{phase}），忽略界面操作")]
    NotReady { phase: String },

    /// 当前界面不允许此操作
    #[error("当前界面不允许此操作：期望 {expected}，实际 {actual}")]
    StateMismatch { expected: String, actual: String },

    /// 启动阶段不匹配（宿主回传了过期的完成信号）
    #[error("启动阶段不匹配：期望 {expected}，实际 {actual}")]
    PhaseMismatch { expected: String, actual: String },

    /// 没有正在展示的欢迎优惠弹窗
    #[error("当前没有展示中的欢迎优惠弹窗")]
    NoOfferPresented,
}

/// Result 类型别名
pub type ShellResult<T> = Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ShellError::StateMismatch {
            expected: "lobby".to_string(),
            actual: "landing".to_string(),
        };
        assert_eq!(err.to_string(), "当前界面不允许此操作：期望 lobby，实际 landing");

        let err = ShellError::NotReady {
            phase: "registering".to_string(),
        };
        assert!(err.to_string().contains("registering"));
    }
}
