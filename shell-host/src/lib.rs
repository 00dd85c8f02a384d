//! # Host 层
//!
//! 游戏外壳的宿主层实现。
//!
//! ## 架构说明
//!
//! Host 层负责：
//! - 接入内容与埋点服务（[`ContentProvider`]）
//! - 执行 Runtime 发出的 Effect 并回传结果（[`ShellDriver`]）
//! - 配置加载（[`HostConfig`]）
//! - 终端前端（[`Terminal`]）
//!
//! Host 层不包含界面路由逻辑，只负责执行 Runtime 发出的 Effect。

pub mod config;
pub mod driver;
pub mod observer;
pub mod provider;
pub mod terminal;
pub mod text_view;

pub use config::{ConfigError, DebugConfig, HostConfig, LoadedConfig, LogConfig, ProviderKind};
pub use driver::{DEFAULT_PROVIDER_TIMEOUT, ShellDriver};
pub use observer::{ViewHistory, ViewObserver};
pub use provider::{CatalogueProvider, ContentProvider, MemoryProvider, ProviderError};
pub use terminal::{CommandParseError, Terminal, TerminalCommand, report_content_diagnostics};
pub use text_view::render_text;
