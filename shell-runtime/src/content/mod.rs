//! # Content 模块
//!
//! 外部内容服务提供的只读数据，以及"有值用值、无值用默认"的查找约定。
//!
//! ## 数据层级
//!
//! ```text
//! ContentStore ── bundle 名 ──► ContentBundle ── object key ──► FieldRecord ── 字段名 ──► FieldValue
//! ```
//!
//! 本地从不修改内容；重新加载时整体替换。

mod catalogue;
mod product;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use catalogue::{
    CONTENT_BUNDLES, HERO_NAME_TOKEN, LANDING, LOBBY, LandingContent, LobbyContent, POPUP,
    PopupContent, STORE_HEADER, STORE_PRODUCTS, StoreContent, THEME, ThemeContent,
    interpolate_hero_name,
};
pub use product::{Product, parse_products};

/// 字段值
///
/// 按顺序尝试：null、布尔、数字、文本，其余（数组/对象）保留原始 JSON。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Structured(serde_json::Value),
}

impl FieldValue {
    /// 类型名称（用于诊断输出）
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Structured(_) => "structured",
        }
    }

    /// 是否为 null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// 一个内容对象的字段集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式设置字段（构造测试数据用）
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// 原始字段值（null 视为缺失）
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    /// 文本字段
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 数字字段，接受可解析的数字文本
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// 布尔字段
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 遍历所有字段（包括 null）
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// 一个内容包：object key → 字段集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentBundle {
    objects: BTreeMap<String, FieldRecord>,
}

impl ContentBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式添加对象
    pub fn with(mut self, key: impl Into<String>, record: FieldRecord) -> Self {
        self.objects.insert(key.into(), record);
        self
    }

    pub fn object(&self, key: &str) -> Option<&FieldRecord> {
        self.objects.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRecord)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// 定位一个内容对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentKey {
    /// 内容包名
    pub bundle: &'static str,
    /// 对象 key
    pub object: &'static str,
}

impl ContentKey {
    pub const fn new(bundle: &'static str, object: &'static str) -> Self {
        Self { bundle, object }
    }
}

impl std::fmt::Display for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.bundle, self.object)
    }
}

/// 已加载的全部内容包
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentStore {
    bundles: BTreeMap<String, ContentBundle>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式添加内容包
    pub fn with(mut self, name: impl Into<String>, bundle: ContentBundle) -> Self {
        self.insert(name, bundle);
        self
    }

    /// 添加或整体替换内容包
    pub fn insert(&mut self, name: impl Into<String>, bundle: ContentBundle) {
        self.bundles.insert(name.into(), bundle);
    }

    pub fn bundle(&self, name: &str) -> Option<&ContentBundle> {
        self.bundles.get(name)
    }

    /// 按 [`ContentKey`] 查找对象
    pub fn record(&self, key: ContentKey) -> Option<&FieldRecord> {
        self.bundle(key.bundle)?.object(key.object)
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContentBundle)> {
        self.bundles.iter().map(|(k, v)| (k.as_str(), v))
    }
}
