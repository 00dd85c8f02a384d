//! 磁盘内容目录
//!
//! 内容目录是一个 JSON 文件，结构与 [`ContentStore`] 相同：
//!
//! ```json
//! {
//!   "theme": { "ui-theme": { "accent_color": "#ff6b6b", "card_radius": 16 } },
//!   "store": { "store-products": { "products": "[{\"name\": \"500 Gems\"}]" } }
//! }
//! ```
//!
//! 埋点写入 tracing 日志；配置了 `analytics_log` 时额外追加到 JSON Lines 文件。

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use shell_runtime::{AnalyticsEvent, ContentBundle, ContentStore, Session};
use tracing::{debug, info, warn};

use super::{ContentProvider, ProviderError};

pub struct CatalogueProvider {
    path: PathBuf,
    analytics_log: Option<PathBuf>,
    store: RefCell<ContentStore>,
    user: RefCell<Option<Session>>,
}

impl CatalogueProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            analytics_log: None,
            store: RefCell::new(ContentStore::default()),
            user: RefCell::new(None),
        }
    }

    /// 同时把埋点追加到 JSON Lines 文件
    pub fn with_analytics_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.analytics_log = Some(path.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 最近一次注册的会话
    pub fn current_user(&self) -> Option<Session> {
        self.user.borrow().clone()
    }

    fn append_analytics(&self, path: &Path, event: &AnalyticsEvent) -> std::io::Result<()> {
        let line = serde_json::to_string(event)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{line}")
    }
}

impl ContentProvider for CatalogueProvider {
    async fn set_user(&self, session: Session) -> Result<(), ProviderError> {
        if session.user_id.trim().is_empty() {
            return Err(ProviderError::Rejected("user_id 为空".to_string()));
        }

        info!(
            user_id = %session.user_id,
            utm_source = session.profile_value("utm_source").unwrap_or_default(),
            "注册会话"
        );
        *self.user.borrow_mut() = Some(session);
        Ok(())
    }

    async fn load_all_content(&self) -> Result<(), ProviderError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::Unreachable(format!("{}: {e}", self.path.display())))?;

        let store: ContentStore = serde_json::from_str(&content).map_err(|e| {
            ProviderError::InvalidCatalogue(format!("{}: {e}", self.path.display()))
        })?;

        info!(
            path = %self.path.display(),
            bundles = store.iter().count(),
            "内容目录加载成功"
        );
        *self.store.borrow_mut() = store;
        Ok(())
    }

    fn content_bundle(&self, name: &str) -> Option<ContentBundle> {
        self.store.borrow().bundle(name).cloned()
    }

    fn track_event(&self, event: &AnalyticsEvent) {
        let properties = serde_json::to_string(&event.properties).unwrap_or_default();
        info!(event = %event.name, properties = %properties, "埋点");

        if let Some(path) = &self.analytics_log {
            if let Err(e) = self.append_analytics(path, event) {
                warn!(path = %path.display(), error = %e, "埋点日志写入失败");
            } else {
                debug!(path = %path.display(), "埋点已写入日志");
            }
        }
    }
}
