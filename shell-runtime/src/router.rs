//! # Router 模块
//!
//! 游戏外壳的核心状态机。
//!
//! ## 执行模型
//!
//! ```text
//! handle(input) -> Result<Vec<Effect>, ShellError>
//! ```
//!
//! 1. 检查当前启动阶段与界面是否接受该输入
//! 2. 同步修改状态（不会在中途失败：所有校验在修改前完成）
//! 3. 返回 Host 需要执行的 Effect
//!
//! 渲染是纯函数 [`render`](crate::view::render)，Host 在每次 `handle` 之后重新计算即可。

use crate::content::{ContentStore, LobbyContent};
use crate::effect::Effect;
use crate::error::{ShellError, ShellResult};
use crate::event::AnalyticsEvent;
use crate::input::{ShellAction, ShellInput};
use crate::session::{Attribution, Session, SessionBootstrapper};
use crate::state::{BootPhase, BootStage, Screen, ShellState};
use crate::view::{self, View};

/// 界面路由
///
/// # 使用示例
///
/// ```ignore
/// let mut router = ShellRouter::new(SessionBootstrapper::from_entropy());
///
/// let effects = router.handle(ShellInput::Launch { attribution })?;
/// // Host 执行 effects，把完成信号回传...
/// let effects = router.handle(ShellInput::UserRegistered)?;
///
/// let view = router.view();
/// ```
#[derive(Debug, Clone)]
pub struct ShellRouter {
    bootstrapper: SessionBootstrapper,
    state: ShellState,
}

impl Default for ShellRouter {
    fn default() -> Self {
        Self::new(SessionBootstrapper::from_entropy())
    }
}

impl ShellRouter {
    pub fn new(bootstrapper: SessionBootstrapper) -> Self {
        Self {
            bootstrapper,
            state: ShellState::new(),
        }
    }

    /// 当前状态（只读）
    pub fn state(&self) -> &ShellState {
        &self.state
    }

    /// 当前视图
    pub fn view(&self) -> View {
        view::render(&self.state)
    }

    /// 欢迎优惠弹窗当前是否展示
    pub fn offer_presented(&self) -> bool {
        offer_presented(&self.state)
    }

    /// 核心驱动函数
    pub fn handle(&mut self, input: ShellInput) -> ShellResult<Vec<Effect>> {
        match input {
            ShellInput::Launch { attribution } => self.launch(&attribution),
            ShellInput::UserRegistered => self.user_registered(),
            ShellInput::RegistrationFailed { reason } => {
                self.fail(BootPhase::Registering, BootStage::Registration, reason)
            }
            ShellInput::ContentLoaded { store } => self.content_loaded(store),
            ShellInput::ContentLoadFailed { reason } => {
                self.fail(BootPhase::LoadingContent, BootStage::ContentLoad, reason)
            }
            ShellInput::Retry => self.retry(),
            ShellInput::Action(action) => self.handle_action(action),
        }
    }

    fn expect_phase(&self, expected: &BootPhase) -> ShellResult<()> {
        if &self.state.phase == expected {
            Ok(())
        } else {
            Err(ShellError::PhaseMismatch {
                expected: expected.name().to_string(),
                actual: self.state.phase.name().to_string(),
            })
        }
    }

    fn launch(&mut self, attribution: &Attribution) -> ShellResult<Vec<Effect>> {
        if self.state.phase != BootPhase::Idle {
            return Err(ShellError::AlreadyLaunched);
        }

        let session = self.bootstrapper.initialize(attribution);
        self.state.session = Some(session.clone());
        self.state.phase = BootPhase::Registering;

        Ok(vec![Effect::RegisterUser { session }])
    }

    fn user_registered(&mut self) -> ShellResult<Vec<Effect>> {
        self.expect_phase(&BootPhase::Registering)?;
        self.state.phase = BootPhase::LoadingContent;

        let mut effects = Vec::with_capacity(2);
        if let Some(session) = &self.state.session {
            effects.push(Effect::TrackEvent(AnalyticsEvent::app_loaded(
                &session.user_id,
                session.profile_value("utm_source"),
            )));
        }
        effects.push(Effect::LoadAllContent);
        Ok(effects)
    }

    fn content_loaded(&mut self, store: ContentStore) -> ShellResult<Vec<Effect>> {
        self.expect_phase(&BootPhase::LoadingContent)?;
        self.state.content = store;
        self.state.phase = BootPhase::Ready;
        Ok(Vec::new())
    }

    fn fail(
        &mut self,
        expected: BootPhase,
        stage: BootStage,
        reason: String,
    ) -> ShellResult<Vec<Effect>> {
        self.expect_phase(&expected)?;
        self.state.phase = BootPhase::Failed { stage, reason };
        Ok(Vec::new())
    }

    /// 只重新执行失败的那一步
    fn retry(&mut self) -> ShellResult<Vec<Effect>> {
        let stage = match &self.state.phase {
            BootPhase::Failed { stage, .. } => *stage,
            other => {
                return Err(ShellError::PhaseMismatch {
                    expected: "failed".to_string(),
                    actual: other.name().to_string(),
                });
            }
        };

        match (stage, &self.state.session) {
            (BootStage::Registration, Some(session)) => {
                let session = session.clone();
                self.state.phase = BootPhase::Registering;
                Ok(vec![Effect::RegisterUser { session }])
            }
            (BootStage::ContentLoad, Some(_)) => {
                self.state.phase = BootPhase::LoadingContent;
                Ok(vec![Effect::LoadAllContent])
            }
            (_, None) => Err(ShellError::NotReady {
                phase: self.state.phase.name().to_string(),
            }),
        }
    }

    fn handle_action(&mut self, action: ShellAction) -> ShellResult<Vec<Effect>> {
        if !self.state.phase.is_ready() {
            return Err(ShellError::NotReady {
                phase: self.state.phase.name().to_string(),
            });
        }

        match action {
            ShellAction::SubmitHero { name } => self.submit_hero(&name),
            ShellAction::EnterStore => self.enter_store(),
            ShellAction::BackToLobby => {
                self.state.screen.back_to_lobby()?;
                Ok(Vec::new())
            }
            ShellAction::DismissOffer => {
                if !self.offer_presented() {
                    return Err(ShellError::NoOfferPresented);
                }
                self.state.screen.dismiss_offer()?;
                Ok(Vec::new())
            }
            ShellAction::ClaimOffer => {
                if !self.offer_presented() {
                    return Err(ShellError::NoOfferPresented);
                }
                self.enter_store()
            }
        }
    }

    /// landing → lobby
    ///
    /// 空白英雄名被静默忽略：不切换界面、不上报、不重新注册。
    fn submit_hero(&mut self, raw_name: &str) -> ShellResult<Vec<Effect>> {
        if self.state.screen.screen() != Screen::Landing {
            return Err(ShellError::StateMismatch {
                expected: Screen::Landing.to_string(),
                actual: self.state.screen.screen().to_string(),
            });
        }

        let hero_name = raw_name.trim();
        if hero_name.is_empty() {
            return Ok(Vec::new());
        }

        let Some(current) = self.state.session.as_ref() else {
            return Err(ShellError::NotReady {
                phase: self.state.phase.name().to_string(),
            });
        };

        let adopted: Session = self.bootstrapper.adopt_hero(current, hero_name);
        self.state.screen.enter_lobby(hero_name)?;
        self.state.session = Some(adopted.clone());

        let event = AnalyticsEvent::hero_created(hero_name, &adopted.user_id);
        Ok(vec![
            Effect::AdoptIdentity { session: adopted },
            Effect::TrackEvent(event),
        ])
    }

    /// lobby → store
    fn enter_store(&mut self) -> ShellResult<Vec<Effect>> {
        self.state.screen.enter_store()?;

        let event = AnalyticsEvent::store_visited(
            self.state.screen.hero_name(),
            self.state.user_id().unwrap_or_default(),
        );
        Ok(vec![Effect::TrackEvent(event)])
    }
}

/// 欢迎优惠弹窗是否展示：在大厅、内容标记了弹窗、且尚未关闭
pub(crate) fn offer_presented(state: &ShellState) -> bool {
    state.phase.is_ready()
        && state.screen.screen() == Screen::Lobby
        && !state.screen.offer_dismissed()
        && LobbyContent::resolve(&state.content).show_popup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentBundle, FieldRecord, LOBBY};
    use crate::event::{APP_LOADED, HERO_CREATED, STORE_VISITED};

    fn events(effects: &[Effect]) -> Vec<&AnalyticsEvent> {
        effects.iter().filter_map(Effect::as_event).collect()
    }

    fn popup_store() -> ContentStore {
        ContentStore::new().with(
            LOBBY.bundle,
            ContentBundle::new().with(LOBBY.object, FieldRecord::new().with("show_popup", true)),
        )
    }

    fn ready_router(store: ContentStore) -> ShellRouter {
        let mut router = ShellRouter::new(SessionBootstrapper::seeded(3));
        router
            .handle(ShellInput::Launch {
                attribution: Attribution::default(),
            })
            .unwrap();
        router.handle(ShellInput::UserRegistered).unwrap();
        router.handle(ShellInput::ContentLoaded { store }).unwrap();
        router
    }

    #[test]
    fn test_boot_sequence() {
        let mut router = ShellRouter::new(SessionBootstrapper::seeded(3));
        assert_eq!(router.state().phase, BootPhase::Idle);

        let effects = router
            .handle(ShellInput::Launch {
                attribution: Attribution::from_query("utm_source=ads"),
            })
            .unwrap();
        assert!(matches!(effects.as_slice(), [Effect::RegisterUser { .. }]));
        assert_eq!(router.state().phase, BootPhase::Registering);

        let effects = router.handle(ShellInput::UserRegistered).unwrap();
        let loaded = events(&effects);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, APP_LOADED);
        assert_eq!(loaded[0].property("utm_source"), Some("ads"));
        assert_eq!(effects.last(), Some(&Effect::LoadAllContent));

        let effects = router
            .handle(ShellInput::ContentLoaded {
                store: ContentStore::new(),
            })
            .unwrap();
        assert!(effects.is_empty());
        assert!(router.state().phase.is_ready());
    }

    #[test]
    fn test_launch_twice_rejected() {
        let mut router = ready_router(ContentStore::new());
        assert_eq!(
            router.handle(ShellInput::Launch {
                attribution: Attribution::default()
            }),
            Err(ShellError::AlreadyLaunched)
        );
    }

    #[test]
    fn test_content_loaded_only_once() {
        let mut router = ready_router(ContentStore::new());
        let result = router.handle(ShellInput::ContentLoaded {
            store: popup_store(),
        });
        assert!(matches!(result, Err(ShellError::PhaseMismatch { .. })));
        assert!(router.state().content.is_empty());
    }

    #[test]
    fn test_actions_rejected_before_ready() {
        let mut router = ShellRouter::new(SessionBootstrapper::seeded(3));
        router
            .handle(ShellInput::Launch {
                attribution: Attribution::default(),
            })
            .unwrap();

        let result = router.handle(ShellAction::submit_hero("Aria").into());
        assert!(matches!(result, Err(ShellError::NotReady { .. })));
        assert_eq!(router.state().screen.screen(), Screen::Landing);
    }

    #[test]
    fn test_whitespace_hero_name_ignored() {
        let mut router = ready_router(ContentStore::new());
        let user_id = router.state().user_id().map(str::to_string);

        let effects = router.handle(ShellAction::submit_hero("  ").into()).unwrap();
        assert!(effects.is_empty());
        assert_eq!(router.state().screen.screen(), Screen::Landing);
        assert_eq!(router.state().user_id().map(str::to_string), user_id);
    }

    #[test]
    fn test_submit_hero() {
        let mut router = ready_router(ContentStore::new());
        let effects = router
            .handle(ShellAction::submit_hero("  Aria ").into())
            .unwrap();

        assert_eq!(router.state().screen.screen(), Screen::Lobby);
        assert_eq!(router.state().screen.hero_name(), "Aria");

        let adopted = effects
            .iter()
            .filter(|e| matches!(e, Effect::AdoptIdentity { .. }))
            .count();
        assert_eq!(adopted, 1);

        let created = events(&effects);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, HERO_CREATED);
        assert_eq!(created[0].property("hero_name"), Some("Aria"));
        assert_eq!(created[0].property("user_id"), router.state().user_id());

        let session = router.state().session.as_ref().unwrap();
        assert!(session.user_id.starts_with("Aria_"));
        assert_eq!(session.profile_value("hero_name"), Some("Aria"));
    }

    #[test]
    fn test_store_round_trip() {
        let mut router = ready_router(ContentStore::new());
        router.handle(ShellAction::submit_hero("Aria").into()).unwrap();

        let effects = router.handle(ShellAction::EnterStore.into()).unwrap();
        let visited = events(&effects);
        assert_eq!(visited.len(), 1);
        assert_eq!(visited[0].name, STORE_VISITED);
        assert_eq!(visited[0].property("hero_name"), Some("Aria"));
        assert_eq!(router.state().screen.screen(), Screen::Store);

        let effects = router.handle(ShellAction::BackToLobby.into()).unwrap();
        assert!(effects.is_empty());
        assert_eq!(router.state().screen.screen(), Screen::Lobby);
        assert_eq!(router.state().screen.hero_name(), "Aria");
    }

    #[test]
    fn test_store_requires_lobby() {
        let mut router = ready_router(ContentStore::new());
        let result = router.handle(ShellAction::EnterStore.into());
        assert!(matches!(result, Err(ShellError::StateMismatch { .. })));
    }

    #[test]
    fn test_offer_claim_counts_as_store_visit() {
        let mut router = ready_router(popup_store());
        assert!(!router.offer_presented());

        router.handle(ShellAction::submit_hero("Aria").into()).unwrap();
        assert!(router.offer_presented());

        let effects = router.handle(ShellAction::ClaimOffer.into()).unwrap();
        assert_eq!(events(&effects)[0].name, STORE_VISITED);
        assert_eq!(router.state().screen.screen(), Screen::Store);

        router.handle(ShellAction::BackToLobby.into()).unwrap();
        assert!(router.offer_presented());
    }

    #[test]
    fn test_offer_dismiss_stays_in_lobby() {
        let mut router = ready_router(popup_store());
        router.handle(ShellAction::submit_hero("Aria").into()).unwrap();

        let effects = router.handle(ShellAction::DismissOffer.into()).unwrap();
        assert!(effects.is_empty());
        assert_eq!(router.state().screen.screen(), Screen::Lobby);
        assert!(!router.offer_presented());

        assert_eq!(
            router.handle(ShellAction::ClaimOffer.into()),
            Err(ShellError::NoOfferPresented)
        );

        router.handle(ShellAction::EnterStore.into()).unwrap();
        router.handle(ShellAction::BackToLobby.into()).unwrap();
        assert!(router.offer_presented());
    }

    #[test]
    fn test_retry_after_registration_failure() {
        let mut router = ShellRouter::new(SessionBootstrapper::seeded(3));
        let first = router
            .handle(ShellInput::Launch {
                attribution: Attribution::default(),
            })
            .unwrap();
        router
            .handle(ShellInput::RegistrationFailed {
                reason: "offline".to_string(),
            })
            .unwrap();
        assert_eq!(router.state().phase.name(), "failed");

        // 重试沿用同一个会话
        let retried = router.handle(ShellInput::Retry).unwrap();
        assert_eq!(retried, first);
        assert_eq!(router.state().phase, BootPhase::Registering);
    }

    #[test]
    fn test_retry_after_content_failure() {
        let mut router = ShellRouter::new(SessionBootstrapper::seeded(3));
        router
            .handle(ShellInput::Launch {
                attribution: Attribution::default(),
            })
            .unwrap();
        router.handle(ShellInput::UserRegistered).unwrap();
        router
            .handle(ShellInput::ContentLoadFailed {
                reason: "timeout".to_string(),
            })
            .unwrap();

        let effects = router.handle(ShellInput::Retry).unwrap();
        assert_eq!(effects, vec![Effect::LoadAllContent]);
        assert_eq!(router.state().phase, BootPhase::LoadingContent);
    }

    #[test]
    fn test_retry_requires_failure() {
        let mut router = ready_router(ContentStore::new());
        assert!(matches!(
            router.handle(ShellInput::Retry),
            Err(ShellError::PhaseMismatch { .. })
        ));
    }
}
