//! # Effect 模块
//!
//! 路由向 Host 发出的副作用指令。Effect 是路由与内容服务之间的**唯一通信方式**。
//!
//! ## 设计原则
//!
//! - **声明式**：Effect 描述"做什么"，由 Host 决定怎么调用内容服务
//! - **无副作用**：Effect 本身不执行任何操作
//! - 需要等待结果的 Effect，Host 必须把结果以 [`ShellInput`](crate::ShellInput) 回传

use serde::{Deserialize, Serialize};

use crate::event::AnalyticsEvent;
use crate::session::Session;

/// 路由发出的副作用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// 注册初始会话
    ///
    /// Host 必须等待完成，并回传 `UserRegistered` 或 `RegistrationFailed`。
    RegisterUser { session: Session },

    /// 批量加载全部内容包
    ///
    /// Host 必须等待完成，并回传 `ContentLoaded` 或 `ContentLoadFailed`。
    LoadAllContent,

    /// 以英雄身份重新注册会话
    ///
    /// **不等待**：路由在发出此指令的同一次 `handle` 中已经切换到大厅，
    /// 注册可能晚于界面切换完成。结果只影响分析数据，失败时 Host 记录日志即可。
    /// 不要为了"修复"这个竞态而串行等待它，那会推迟界面切换。
    AdoptIdentity { session: Session },

    /// 上报埋点事件（fire-and-forget）
    TrackEvent(AnalyticsEvent),
}

impl Effect {
    /// Host 是否需要等待结果并回传输入
    pub fn is_awaited(&self) -> bool {
        matches!(self, Self::RegisterUser { .. } | Self::LoadAllContent)
    }

    /// 如果是埋点事件，返回事件
    pub fn as_event(&self) -> Option<&AnalyticsEvent> {
        match self {
            Self::TrackEvent(event) => Some(event),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_awaited_effects() {
        assert!(Effect::LoadAllContent.is_awaited());
        assert!(!Effect::TrackEvent(AnalyticsEvent::new("x")).is_awaited());

        let session = Session {
            user_id: "user_1".to_string(),
            user_profile: Default::default(),
        };
        assert!(Effect::RegisterUser {
            session: session.clone()
        }
        .is_awaited());
        assert!(!Effect::AdoptIdentity { session }.is_awaited());
    }
}
