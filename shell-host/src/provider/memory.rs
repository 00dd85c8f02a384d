//! 进程内内容服务
//!
//! 用于测试与 `--demo` 模式：内容预先放入，调用被完整记录，可以注入失败与延迟。

use std::cell::{Cell, RefCell};
use std::time::Duration;

use shell_runtime::{AnalyticsEvent, ContentBundle, ContentStore, Session};
use tracing::{debug, warn};

use super::{ContentProvider, ProviderError};

/// 内置演示内容
const DEMO_CATALOGUE: &str = include_str!("../../../assets/content/demo.json");

#[derive(Debug, Default)]
pub struct MemoryProvider {
    /// 下一次加载时发布的内容
    staged: RefCell<ContentStore>,
    /// 已加载的内容
    loaded: RefCell<Option<ContentStore>>,
    users: RefCell<Vec<Session>>,
    events: RefCell<Vec<AnalyticsEvent>>,
    load_count: Cell<usize>,
    /// 接下来多少次 set_user 失败
    registration_failures: Cell<usize>,
    /// 接下来多少次 load_all_content 失败
    load_failures: Cell<usize>,
    latency: Cell<Duration>,
}

impl MemoryProvider {
    pub fn new(content: ContentStore) -> Self {
        Self {
            staged: RefCell::new(content),
            ..Self::default()
        }
    }

    /// 使用内置演示内容
    pub fn demo() -> Self {
        let content = serde_json::from_str(DEMO_CATALOGUE).unwrap_or_else(|e| {
            warn!(error = %e, "内置演示内容解析失败，使用空内容");
            ContentStore::default()
        });
        Self::new(content)
    }

    /// 每次调用前等待的时长
    pub fn with_latency(self, latency: Duration) -> Self {
        self.latency.set(latency);
        self
    }

    /// 让接下来 `count` 次注册失败
    pub fn fail_registrations(&self, count: usize) {
        self.registration_failures.set(count);
    }

    /// 让接下来 `count` 次内容加载失败
    pub fn fail_loads(&self, count: usize) {
        self.load_failures.set(count);
    }

    /// 已注册过的全部会话（按调用顺序）
    pub fn users(&self) -> Vec<Session> {
        self.users.borrow().clone()
    }

    /// 已上报的全部事件（按调用顺序）
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.borrow().clone()
    }

    /// 指定名称的事件
    pub fn events_named(&self, name: &str) -> Vec<AnalyticsEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }

    /// 成功加载内容的次数
    pub fn load_count(&self) -> usize {
        self.load_count.get()
    }

    async fn wait(&self) {
        let latency = self.latency.get();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn take_failure(counter: &Cell<usize>) -> bool {
        let remaining = counter.get();
        if remaining > 0 {
            counter.set(remaining - 1);
            true
        } else {
            false
        }
    }
}

impl ContentProvider for MemoryProvider {
    async fn set_user(&self, session: Session) -> Result<(), ProviderError> {
        self.wait().await;

        if Self::take_failure(&self.registration_failures) {
            return Err(ProviderError::Rejected(format!(
                "模拟注册失败: {}",
                session.user_id
            )));
        }

        debug!(user_id = %session.user_id, "内存服务：注册会话");
        self.users.borrow_mut().push(session);
        Ok(())
    }

    async fn load_all_content(&self) -> Result<(), ProviderError> {
        self.wait().await;

        if Self::take_failure(&self.load_failures) {
            return Err(ProviderError::Unreachable("模拟内容加载失败".to_string()));
        }

        let content = self.staged.borrow().clone();
        *self.loaded.borrow_mut() = Some(content);
        self.load_count.set(self.load_count.get() + 1);
        Ok(())
    }

    fn content_bundle(&self, name: &str) -> Option<ContentBundle> {
        self.loaded.borrow().as_ref()?.bundle(name).cloned()
    }

    fn track_event(&self, event: &AnalyticsEvent) {
        debug!(event = %event.name, "内存服务：记录埋点");
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shell_runtime::content::{CONTENT_BUNDLES, LANDING};

    #[test]
    fn test_demo_catalogue_parses() {
        let content: ContentStore = serde_json::from_str(DEMO_CATALOGUE).unwrap();
        for name in CONTENT_BUNDLES {
            assert!(content.bundle(name).is_some(), "缺少内容包 {name}");
        }
        assert!(content.record(LANDING).is_some());
    }

    #[tokio::test]
    async fn test_bundles_hidden_until_loaded() {
        let provider = MemoryProvider::demo();
        assert!(provider.content_bundle("landing").is_none());

        provider.load_all_content().await.unwrap();
        assert!(provider.content_bundle("landing").is_some());
        assert_eq!(provider.load_count(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let provider = MemoryProvider::default();
        provider.fail_registrations(1);

        let session = Session {
            user_id: "user_1".to_string(),
            user_profile: Default::default(),
        };
        assert!(matches!(
            provider.set_user(session.clone()).await,
            Err(ProviderError::Rejected(_))
        ));
        assert!(provider.set_user(session).await.is_ok());
        assert_eq!(provider.users().len(), 1);

        provider.fail_loads(1);
        assert!(provider.load_all_content().await.is_err());
        assert_eq!(provider.load_count(), 0);
    }
}
