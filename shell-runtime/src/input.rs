//! # Input 模块
//!
//! 定义 Host 向路由传递的输入。
//!
//! ## 设计说明
//!
//! - [`ShellAction`] 是玩家在界面上的语义化操作，不包含任何点击/键盘细节
//! - 其余变体是宿主执行完 [`Effect`](crate::Effect) 后回传的完成信号
//! - 路由只通过 `handle(input)` 改变状态

use serde::{Deserialize, Serialize};

use crate::content::ContentStore;
use crate::session::Attribution;

/// 玩家操作
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShellAction {
    /// 在落地页提交英雄名
    SubmitHero { name: String },
    /// 从大厅进入商店
    EnterStore,
    /// 从商店返回大厅
    BackToLobby,
    /// 关闭欢迎优惠弹窗（留在大厅）
    DismissOffer,
    /// 领取欢迎优惠（关闭弹窗并进入商店）
    ClaimOffer,
}

impl ShellAction {
    pub fn submit_hero(name: impl Into<String>) -> Self {
        Self::SubmitHero { name: name.into() }
    }
}

/// Host 向路由传递的输入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShellInput {
    /// 应用启动，携带启动 URL 中的来源归因
    Launch { attribution: Attribution },

    /// 初始会话注册完成
    UserRegistered,

    /// 初始会话注册失败（含超时）
    RegistrationFailed { reason: String },

    /// 批量内容加载完成
    ContentLoaded { store: ContentStore },

    /// 批量内容加载失败（含超时）
    ContentLoadFailed { reason: String },

    /// 玩家在不可用界面上请求重试
    Retry,

    /// 玩家操作
    Action(ShellAction),
}

impl From<ShellAction> for ShellInput {
    fn from(action: ShellAction) -> Self {
        Self::Action(action)
    }
}
