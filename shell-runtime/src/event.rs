//! # Event 模块
//!
//! 埋点事件定义。事件名与属性键是与分析后台约定的字符串，不要随意修改。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 会话注册成功后上报一次
pub const APP_LOADED: &str = "App Loaded";
/// 离开落地页、创建英雄时上报
pub const HERO_CREATED: &str = "Hero Created";
/// 进入商店时上报
pub const STORE_VISITED: &str = "Store Visited";

/// 埋点事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// 事件名
    pub name: String,
    /// 事件属性
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl AnalyticsEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// 链式添加属性
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// 读取字符串属性
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    pub fn app_loaded(user_id: &str, utm_source: Option<&str>) -> Self {
        Self::new(APP_LOADED)
            .with("user_id", user_id)
            .with("utm_source", utm_source)
    }

    pub fn hero_created(hero_name: &str, user_id: &str) -> Self {
        Self::new(HERO_CREATED)
            .with("hero_name", hero_name)
            .with("user_id", user_id)
    }

    pub fn store_visited(hero_name: &str, user_id: &str) -> Self {
        Self::new(STORE_VISITED)
            .with("hero_name", hero_name)
            .with("user_id", user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_created_payload() {
        let event = AnalyticsEvent::hero_created("Aria", "Aria_k3x9q1");
        insta::assert_json_snapshot!(event, @r#"
        {
          "name": "Hero Created",
          "properties": {
            "hero_name": "Aria",
            "user_id": "Aria_k3x9q1"
          }
        }
        "#);
    }

    #[test]
    fn test_app_loaded_missing_source() {
        let event = AnalyticsEvent::app_loaded("user_1", None);
        assert_eq!(event.property("user_id"), Some("user_1"));
        assert_eq!(event.properties.get("utm_source"), Some(&serde_json::Value::Null));
    }
}
