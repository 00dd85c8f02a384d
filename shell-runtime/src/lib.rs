//! # Shell Runtime
//!
//! 游戏外壳（落地页 / 大厅 / 商店）的纯逻辑核心。
//!
//! ## 架构概述
//!
//! `shell-runtime` 不依赖任何 IO、异步运行时或渲染后端。
//! 它通过 **指令驱动模式** 与宿主层（Host）通信：
//!
//! ```text
//! Host                                Runtime
//!   │                                    │
//!   │──── ShellInput ──────────────────►│
//!   │                                    │ handle()
//!   │◄─── Vec<Effect> ──────────────────│
//!   │                                    │
//!   │──── render(state) ───────────────►│ View
//! ```
//!
//! Host 负责调用内容服务（注册用户、加载内容、上报埋点），
//! 并把需要等待的结果作为新的 [`ShellInput`] 回传。
//!
//! ## 核心类型
//!
//! - [`ShellRouter`]：界面路由状态机
//! - [`SessionBootstrapper`]：用户 ID 生成与档案组装
//! - [`ShellInput`] / [`ShellAction`]：Host 传入的输入
//! - [`Effect`]：Runtime 向 Host 发出的副作用
//! - [`View`]：从状态计算出的视图描述
//! - [`ContentStore`]：外部内容及默认值查找
//!
//! ## 模块结构
//!
//! - [`session`]：会话与来源归因
//! - [`state`]：启动阶段与界面状态
//! - [`router`]：状态机
//! - [`content`]：内容数据与各界面的默认值
//! - [`view`]：视图描述
//! - [`event`]：埋点事件
//! - [`diagnostic`]：内容目录检查

pub mod content;
pub mod diagnostic;
pub mod effect;
pub mod error;
pub mod event;
pub mod input;
pub mod router;
pub mod session;
pub mod state;
pub mod view;

// 重导出核心类型
pub use content::{ContentBundle, ContentKey, ContentStore, FieldRecord, FieldValue, Product};
pub use diagnostic::{Diagnostic, DiagnosticLevel, DiagnosticResult, analyze_content};
pub use effect::Effect;
pub use error::{ShellError, ShellResult};
pub use event::AnalyticsEvent;
pub use input::{ShellAction, ShellInput};
pub use router::ShellRouter;
pub use session::{Attribution, Session, SessionBootstrapper, UserProfile};
pub use state::{BootPhase, BootStage, Screen, ScreenState, ShellState};
pub use view::{View, render};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_accessible() {
        let _input = ShellInput::Action(ShellAction::EnterStore);
        let _effect = Effect::LoadAllContent;
        let _state = ShellState::new();

        let router = ShellRouter::new(SessionBootstrapper::seeded(0));
        assert!(router.view().is_loading());
    }
}
