//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// 内容服务类型
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// 从磁盘读取内容目录
    #[default]
    Catalogue,
    /// 进程内演示数据
    Memory,
}

/// 宿主配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// 内容服务类型（catalogue/memory）
    #[serde(default)]
    pub provider: ProviderKind,

    /// 内容目录路径（仅 Catalogue 模式使用）
    #[serde(default = "default_content_path")]
    pub content_path: PathBuf,

    /// 启动 URL，来源归因从它的查询串解析
    ///
    /// 例如 `https://play.example.com/?utm_source=ads&referrer=friend`
    #[serde(default)]
    pub launch_url: String,

    /// 注册与内容加载的超时时间（毫秒）
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,

    /// 埋点日志文件（JSON Lines），不配置则只写入 tracing 日志
    #[serde(default)]
    pub analytics_log: Option<PathBuf>,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,

    /// 调试配置
    #[serde(default)]
    pub debug: DebugConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 默认过滤级别，`RUST_LOG` 存在时以环境变量为准
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// 调试配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// 加载完内容后是否运行内容检查
    ///
    /// - debug build 默认开启（见 `default_content_check()`）
    /// - 检查结果只输出诊断，不阻塞启动
    #[serde(default = "default_content_check")]
    pub content_check: bool,
}

// 默认值函数
fn default_content_path() -> PathBuf {
    PathBuf::from("assets/content/demo.json")
}

fn default_provider_timeout_ms() -> u64 {
    10_000
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_content_check() -> bool {
    cfg!(debug_assertions)
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            content_path: default_content_path(),
            launch_url: String::new(),
            provider_timeout_ms: default_provider_timeout_ms(),
            analytics_log: None,
            log: LogConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            content_check: default_content_check(),
        }
    }
}

impl HostConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    /// 调用时日志系统可能尚未初始化，警告会在初始化后补记，见 [`LoadedConfig`]。
    pub fn load(path: impl AsRef<Path>) -> LoadedConfig {
        let path = path.as_ref();

        if !path.exists() {
            return LoadedConfig::fallback(format!("配置文件不存在: {path:?}，使用默认配置"));
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => LoadedConfig {
                    config,
                    notice: None,
                },
                Err(e) => LoadedConfig::fallback(format!("配置文件解析失败: {e}，使用默认配置")),
            },
            Err(e) => LoadedConfig::fallback(format!("配置文件读取失败: {e}，使用默认配置")),
        }
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// 注册与内容加载的超时时间
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider == ProviderKind::Catalogue && !self.content_path.exists() {
            return Err(ConfigError::ValidationFailed(format!(
                "内容目录不存在: {:?}",
                self.content_path
            )));
        }

        if self.provider_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "provider_timeout_ms 必须大于 0".to_string(),
            ));
        }

        if !self.launch_url.is_empty() && !self.launch_url.contains("://") {
            return Err(ConfigError::ValidationFailed(format!(
                "launch_url 不是完整的 URL: {}",
                self.launch_url
            )));
        }

        Ok(())
    }
}

/// 配置加载结果
///
/// 回退到默认配置时携带一条说明，由调用方在日志初始化后输出。
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: HostConfig,
    pub notice: Option<String>,
}

impl LoadedConfig {
    fn fallback(notice: String) -> Self {
        Self {
            config: HostConfig::default(),
            notice: Some(notice),
        }
    }

    /// 输出加载结果日志
    pub fn log(&self, path: &Path) {
        match &self.notice {
            Some(notice) => warn!("{notice}"),
            None => info!(path = ?path, "配置文件加载成功"),
        }
    }
}

/// 配置错误
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// 序列化失败
    SerializationFailed(String),
    /// IO 错误
    IoError(String),
    /// 验证失败
    ValidationFailed(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SerializationFailed(e) => write!(f, "配置序列化失败: {}", e),
            ConfigError::IoError(e) => write!(f, "配置 IO 错误: {}", e),
            ConfigError::ValidationFailed(e) => write!(f, "配置验证失败: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
