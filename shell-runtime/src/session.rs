//! # Session 模块
//!
//! 用户身份与来源归因。
//!
//! ## 生命周期
//!
//! ```text
//! 启动 ──initialize()──► Session { user_, utm_source, referrer }
//!                              │
//!            提交英雄名 ──adopt_hero()──► Session { <hero>_, ..., hero_name }
//! ```
//!
//! `adopt_hero` 在整个会话中只会被调用一次（离开 landing 界面时）。

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// 未携带 `utm_source` 时的默认来源
pub const DEFAULT_UTM_SOURCE: &str = "direct";

/// 初始用户 ID 前缀
const USER_ID_PREFIX: &str = "user_";

/// 初始用户 ID 随机部分长度
const USER_ID_RANDOM_LEN: usize = 13;

/// 英雄用户 ID 随机部分长度
const HERO_ID_RANDOM_LEN: usize = 6;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 用户档案
///
/// 值可能缺失（`None` 序列化为 `null`），与内容服务的 profile 语义一致。
pub type UserProfile = BTreeMap<String, Option<String>>;

/// 用户会话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 用户 ID
    pub user_id: String,
    /// 用户档案（来源归因、英雄名等）
    pub user_profile: UserProfile,
}

impl Session {
    /// 读取档案字段
    pub fn profile_value(&self, key: &str) -> Option<&str> {
        self.user_profile.get(key).and_then(|v| v.as_deref())
    }
}

/// 来源归因
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub utm_source: String,
    pub referrer: String,
}

impl Default for Attribution {
    fn default() -> Self {
        Self {
            utm_source: DEFAULT_UTM_SOURCE.to_string(),
            referrer: String::new(),
        }
    }
}

impl Attribution {
    /// 从查询字符串解析（不含 `?`）
    ///
    /// 空值与缺失等价：`utm_source=` 仍然回退到 `direct`。
    pub fn from_query(query: &str) -> Self {
        let params = parse_query(query);
        let lookup = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .filter(|v| !v.is_empty())
        };

        Self {
            utm_source: lookup("utm_source").unwrap_or_else(|| DEFAULT_UTM_SOURCE.to_string()),
            referrer: lookup("referrer").unwrap_or_default(),
        }
    }

    /// 从完整的启动 URL 解析
    ///
    /// 只看 `?` 与 `#` 之间的部分；没有查询串时返回默认归因。
    pub fn from_url(url: &str) -> Self {
        let without_fragment = url.split('#').next().unwrap_or_default();
        match without_fragment.split_once('?') {
            Some((_, query)) => Self::from_query(query),
            None => Self::default(),
        }
    }
}

/// 解析 `application/x-www-form-urlencoded` 查询串
///
/// 保留出现顺序；同名参数取第一个由调用方决定。
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

/// 会话引导器
///
/// 负责生成用户 ID 并组装用户档案。不做任何 IO，
/// 注册动作由路由以 [`Effect`](crate::Effect) 形式交给宿主执行。
#[derive(Debug, Clone)]
pub struct SessionBootstrapper {
    rng: StdRng,
}

impl Default for SessionBootstrapper {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl SessionBootstrapper {
    /// 使用系统熵源
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// 使用固定种子（测试用）
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 创建初始会话
    pub fn initialize(&mut self, attribution: &Attribution) -> Session {
        let user_id = format!(
            "{USER_ID_PREFIX}{}",
            self.random_base36(USER_ID_RANDOM_LEN)
        );

        let mut user_profile = UserProfile::new();
        user_profile.insert(
            "utm_source".to_string(),
            Some(attribution.utm_source.clone()),
        );
        user_profile.insert("referrer".to_string(), Some(attribution.referrer.clone()));

        Session {
            user_id,
            user_profile,
        }
    }

    /// 以英雄名重新标识会话
    ///
    /// 生成包含英雄名的新 ID，并把 `hero_name` 合并进原有档案。
    pub fn adopt_hero(&mut self, session: &Session, hero_name: &str) -> Session {
        let user_id = format!("{hero_name}_{}", self.random_base36(HERO_ID_RANDOM_LEN));

        let mut user_profile = session.user_profile.clone();
        user_profile.insert("hero_name".to_string(), Some(hero_name.to_string()));

        Session {
            user_id,
            user_profile,
        }
    }

    fn random_base36(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| BASE36[self.rng.gen_range(0..BASE36.len())] as char)
            .collect()
    }
}
