//! # Provider 模块
//!
//! 内容与埋点服务的接入层。
//!
//! 路由只认识 [`Effect`](shell_runtime::Effect)，宿主通过 [`ContentProvider`]
//! 把它们翻译成对内容服务的调用：
//!
//! | Effect | 调用 |
//! |---|---|
//! | `RegisterUser` / `AdoptIdentity` | [`ContentProvider::set_user`] |
//! | `LoadAllContent` | [`ContentProvider::load_all_content`] + [`ContentProvider::content_bundle`] |
//! | `TrackEvent` | [`ContentProvider::track_event`] |

mod catalogue;
mod memory;

use std::time::Duration;

use shell_runtime::{AnalyticsEvent, ContentBundle, Session};
use thiserror::Error;

pub use catalogue::CatalogueProvider;
pub use memory::MemoryProvider;

/// 内容服务错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// 服务拒绝了会话
    #[error("内容服务拒绝了会话: {0}")]
    Rejected(String),

    /// 服务不可达
    #[error("内容服务不可达: {0}")]
    Unreachable(String),

    /// 内容目录无法解析
    #[error("内容目录无效: {0}")]
    InvalidCatalogue(String),

    /// 请求超时
    #[error("请求超时（{0:?}）")]
    Timeout(Duration),
}

/// 内容与埋点服务
///
/// 所有调用都发生在同一个线程上（宿主运行在 `LocalSet` 中），
/// 实现可以放心使用 `RefCell` 保存内部状态，但不要跨 `.await` 持有借用。
pub trait ContentProvider {
    /// 注册或更新用户身份与档案
    fn set_user(&self, session: Session) -> impl Future<Output = Result<(), ProviderError>>;

    /// 拉取当前会话的全部内容包
    ///
    /// 完成后 [`content_bundle`](Self::content_bundle) 才能读到数据。
    fn load_all_content(&self) -> impl Future<Output = Result<(), ProviderError>>;

    /// 同步读取已加载的内容包
    fn content_bundle(&self, name: &str) -> Option<ContentBundle>;

    /// 上报埋点事件（fire-and-forget，不返回错误）
    fn track_event(&self, event: &AnalyticsEvent);
}
