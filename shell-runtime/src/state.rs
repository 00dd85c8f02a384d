//! # State 模块
//!
//! 定义路由的显式状态：启动阶段、当前界面、会话与已加载内容。
//!
//! ## 设计原则
//!
//! - 所有状态必须**显式建模**
//! - 状态只由路由的 `handle` 修改
//! - 不允许隐式全局状态

use serde::{Deserialize, Serialize};

use crate::content::ContentStore;
use crate::error::{ShellError, ShellResult};
use crate::session::Session;

/// 界面
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// 落地页（初始界面）
    #[default]
    Landing,
    /// 主大厅
    Lobby,
    /// 商店
    Store,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Lobby => "lobby",
            Self::Store => "store",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 界面状态
///
/// # 状态转换
///
/// ```text
/// landing ──enter_lobby(hero)──► lobby ──enter_store()──► store
///                                  ▲                        │
///                                  └─────back_to_lobby()────┘
/// ```
///
/// 不变量：`hero_name` 只在 `landing` 时为空，设置后不会被清空。
/// 只能由转换方法构造，因此只实现 `Serialize`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScreenState {
    screen: Screen,
    hero_name: String,
    /// 本次大厅停留中欢迎优惠弹窗是否已被关闭（领取或关闭）
    offer_dismissed: bool,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn hero_name(&self) -> &str {
        &self.hero_name
    }

    pub fn offer_dismissed(&self) -> bool {
        self.offer_dismissed
    }

    fn expect(&self, expected: Screen) -> ShellResult<()> {
        if self.screen == expected {
            Ok(())
        } else {
            Err(ShellError::StateMismatch {
                expected: expected.to_string(),
                actual: self.screen.to_string(),
            })
        }
    }

    /// landing → lobby
    ///
    /// `hero_name` 必须已经过 trim 且非空，由路由负责校验。
    pub fn enter_lobby(&mut self, hero_name: &str) -> ShellResult<()> {
        self.expect(Screen::Landing)?;
        debug_assert!(!hero_name.trim().is_empty());
        self.hero_name = hero_name.to_string();
        self.screen = Screen::Lobby;
        Ok(())
    }

    /// lobby → store
    pub fn enter_store(&mut self) -> ShellResult<()> {
        self.expect(Screen::Lobby)?;
        self.offer_dismissed = true;
        self.screen = Screen::Store;
        Ok(())
    }

    /// store → lobby
    ///
    /// 每次进入大厅都重新评估欢迎优惠。
    pub fn back_to_lobby(&mut self) -> ShellResult<()> {
        self.expect(Screen::Store)?;
        self.offer_dismissed = false;
        self.screen = Screen::Lobby;
        Ok(())
    }

    /// 关闭欢迎优惠弹窗
    pub fn dismiss_offer(&mut self) -> ShellResult<()> {
        self.expect(Screen::Lobby)?;
        self.offer_dismissed = true;
        Ok(())
    }
}

/// 启动步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootStage {
    /// 会话注册
    Registration,
    /// 批量内容加载
    ContentLoad,
}

impl std::fmt::Display for BootStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registration => write!(f, "会话注册"),
            Self::ContentLoad => write!(f, "内容加载"),
        }
    }
}

/// 启动阶段
///
/// ```text
/// Idle ─Launch─► Registering ─UserRegistered─► LoadingContent ─ContentLoaded─► Ready
///                    │                              │
///                    └──────────► Failed ◄──────────┘
///                                   │ Retry：重新执行失败的那一步
/// ```
///
/// `Ready` 只写入一次，之后不会再回到加载状态。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootPhase {
    /// 尚未启动
    #[default]
    Idle,
    /// 等待会话注册
    Registering,
    /// 等待批量内容加载
    LoadingContent,
    /// 内容就绪，可以渲染界面
    Ready,
    /// 启动失败，等待玩家重试
    Failed { stage: BootStage, reason: String },
}

impl BootPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Registering => "registering",
            Self::LoadingContent => "loading_content",
            Self::Ready => "ready",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// 路由的完整状态（可导出用于调试，不可导入）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShellState {
    /// 启动阶段
    pub phase: BootPhase,
    /// 当前会话（启动后始终存在）
    pub session: Option<Session>,
    /// 界面状态
    pub screen: ScreenState,
    /// 已加载的内容（就绪前为空）
    pub content: ContentStore,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前用户 ID
    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_transitions() {
        let mut state = ScreenState::new();
        assert_eq!(state.screen(), Screen::Landing);
        assert_eq!(state.hero_name(), "");

        state.enter_lobby("Aria").unwrap();
        assert_eq!(state.screen(), Screen::Lobby);

        state.enter_store().unwrap();
        assert_eq!(state.screen(), Screen::Store);

        state.back_to_lobby().unwrap();
        assert_eq!(state.screen(), Screen::Lobby);
        assert_eq!(state.hero_name(), "Aria");
    }

    #[test]
    fn test_invalid_transitions() {
        let mut state = ScreenState::new();
        assert!(state.enter_store().is_err());
        assert!(state.back_to_lobby().is_err());
        assert!(state.dismiss_offer().is_err());

        state.enter_lobby("Aria").unwrap();
        assert_eq!(
            state.enter_lobby("Kai"),
            Err(ShellError::StateMismatch {
                expected: "landing".to_string(),
                actual: "lobby".to_string(),
            })
        );
        assert_eq!(state.hero_name(), "Aria");
    }

    #[test]
    fn test_offer_dismissal_lasts_one_lobby_visit() {
        let mut state = ScreenState::new();
        state.enter_lobby("Aria").unwrap();
        assert!(!state.offer_dismissed());

        state.dismiss_offer().unwrap();
        assert!(state.offer_dismissed());

        state.enter_store().unwrap();
        assert!(state.offer_dismissed());
        state.back_to_lobby().unwrap();
        assert!(!state.offer_dismissed());
    }

    #[test]
    fn test_screen_state_serializes() {
        let mut state = ScreenState::new();
        state.enter_lobby("Aria").unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"screen": "lobby", "hero_name": "Aria", "offer_dismissed": false})
        );
    }

    #[test]
    fn test_boot_phase_names() {
        assert_eq!(BootPhase::default().name(), "idle");
        assert!(BootPhase::Ready.is_ready());
        let failed = BootPhase::Failed {
            stage: BootStage::Registration,
            reason: "offline".to_string(),
        };
        assert_eq!(failed.name(), "failed");
        assert!(!failed.is_ready());
    }
}
