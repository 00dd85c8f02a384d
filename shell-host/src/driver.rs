//! # Driver 模块
//!
//! 把路由发出的 [`Effect`] 翻译成内容服务调用，并把结果回传给路由。
//!
//! ## 执行模型
//!
//! ```text
//! ShellInput ──► router.handle() ──► Vec<Effect>
//!     ▲                                  │
//!     │                          execute(effect)
//!     └──── 需要等待的结果 ◄──────────────┘
//! ```
//!
//! - `RegisterUser` / `LoadAllContent` 在超时限制内等待，结果作为新输入排队
//! - `AdoptIdentity` 通过 `spawn_local` 在后台执行，不阻塞界面切换
//! - `TrackEvent` 同步上报
//!
//! 每次 `handle` 之后重新计算视图，与上一次不同时通知观察者。
//!
//! 驱动器必须运行在 tokio `LocalSet` 中。

use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use shell_runtime::content::CONTENT_BUNDLES;
use shell_runtime::{
    Attribution, ContentStore, Effect, ShellAction, ShellInput, ShellResult, ShellRouter, View,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::observer::ViewObserver;
use crate::provider::{ContentProvider, ProviderError};

/// 默认的服务调用超时
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ShellDriver<P: ContentProvider + 'static> {
    provider: Rc<P>,
    router: ShellRouter,
    timeout: Duration,
    observers: Vec<Box<dyn ViewObserver>>,
    last_view: Option<View>,
    /// 尚未结束的后台身份注册
    background: Vec<JoinHandle<()>>,
}

impl<P: ContentProvider + 'static> ShellDriver<P> {
    pub fn new(provider: Rc<P>, router: ShellRouter) -> Self {
        Self {
            provider,
            router,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            observers: Vec::new(),
            last_view: None,
            background: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 注册视图观察者
    pub fn observe(&mut self, observer: impl ViewObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn router(&self) -> &ShellRouter {
        &self.router
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// 当前视图
    pub fn view(&self) -> View {
        self.router.view()
    }

    /// 启动：先发布加载占位，再依次完成注册与内容加载
    ///
    /// 返回时路由处于 `Ready` 或 `Failed`。
    pub async fn launch(&mut self, attribution: Attribution) -> ShellResult<()> {
        info!(
            utm_source = %attribution.utm_source,
            referrer = %attribution.referrer,
            "启动游戏外壳"
        );
        self.publish();
        self.pump(ShellInput::Launch { attribution }).await
    }

    /// 处理玩家操作
    pub async fn dispatch(&mut self, action: ShellAction) -> ShellResult<()> {
        debug!(action = ?action, "处理玩家操作");
        self.pump(action.into()).await
    }

    /// 在不可用界面上重试失败的启动步骤
    pub async fn retry(&mut self) -> ShellResult<()> {
        info!("重试启动");
        self.pump(ShellInput::Retry).await
    }

    /// 等待所有后台身份注册结束
    pub async fn settle(&mut self) {
        for handle in std::mem::take(&mut self.background) {
            if let Err(e) = handle.await {
                warn!(error = %e, "后台身份注册任务异常结束");
            }
        }
    }

    async fn pump(&mut self, input: ShellInput) -> ShellResult<()> {
        let mut queue = VecDeque::from([input]);

        while let Some(input) = queue.pop_front() {
            let effects = self.router.handle(input)?;
            self.publish();

            for effect in effects {
                if let Some(next) = self.execute(effect).await {
                    queue.push_back(next);
                }
            }
        }

        Ok(())
    }

    /// 执行单个 Effect，需要等待的返回回传输入
    async fn execute(&mut self, effect: Effect) -> Option<ShellInput> {
        match effect {
            Effect::RegisterUser { session } => {
                let user_id = session.user_id.clone();
                match bounded(self.timeout, self.provider.set_user(session)).await {
                    Ok(()) => {
                        info!(user_id = %user_id, "会话注册成功");
                        Some(ShellInput::UserRegistered)
                    }
                    Err(e) => {
                        warn!(user_id = %user_id, error = %e, "会话注册失败");
                        Some(ShellInput::RegistrationFailed {
                            reason: e.to_string(),
                        })
                    }
                }
            }
            Effect::LoadAllContent => {
                match bounded(self.timeout, self.provider.load_all_content()).await {
                    Ok(()) => {
                        let store = self.collect_bundles();
                        info!(bundles = store.iter().count(), "内容加载完成");
                        Some(ShellInput::ContentLoaded { store })
                    }
                    Err(e) => {
                        warn!(error = %e, "内容加载失败");
                        Some(ShellInput::ContentLoadFailed {
                            reason: e.to_string(),
                        })
                    }
                }
            }
            Effect::AdoptIdentity { session } => {
                let provider = Rc::clone(&self.provider);
                let timeout = self.timeout;
                let handle = tokio::task::spawn_local(async move {
                    let user_id = session.user_id.clone();
                    match bounded(timeout, provider.set_user(session)).await {
                        Ok(()) => info!(user_id = %user_id, "英雄身份注册成功"),
                        Err(e) => warn!(user_id = %user_id, error = %e, "英雄身份注册失败"),
                    }
                });
                self.background.push(handle);
                None
            }
            Effect::TrackEvent(event) => {
                self.provider.track_event(&event);
                None
            }
        }
    }

    fn collect_bundles(&self) -> ContentStore {
        let mut store = ContentStore::new();
        for &name in CONTENT_BUNDLES {
            match self.provider.content_bundle(name) {
                Some(bundle) => store.insert(name, bundle),
                None => debug!(bundle = name, "内容包缺失，使用默认值"),
            }
        }
        store
    }

    /// 视图变化时通知观察者
    fn publish(&mut self) {
        let view = self.router.view();
        if self.last_view.as_ref() == Some(&view) {
            return;
        }

        debug!(view = ?view.screen(), loading = view.is_loading(), "视图更新");
        for observer in &mut self.observers {
            observer.on_view(&view);
        }
        self.last_view = Some(view);
    }
}

/// 给服务调用加上超时，超时视为失败
async fn bounded<F>(timeout: Duration, call: F) -> Result<(), ProviderError>
where
    F: Future<Output = Result<(), ProviderError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or(Err(ProviderError::Timeout(timeout)))
}
