//! # 诊断模块
//!
//! 对内容目录做静态检查，不依赖 IO。
//!
//! ## 设计原则
//!
//! - 纯函数 API，可在无 IO 环境下运行
//! - 诊断分级：Error（必须修复）、Warn（建议修复）、Info（信息提示）
//! - 检查结果只用于提示：界面在任何内容下都能回退到默认值

use crate::content::{
    ContentKey, ContentStore, FieldValue, LANDING, LOBBY, POPUP, STORE_HEADER, STORE_PRODUCTS,
    THEME, parse_products,
};

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// 信息提示
    Info,
    /// 警告（建议修复）
    Warn,
    /// 错误（必须修复）
    Error,
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warn => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// 诊断条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 定位（`bundle/object` 或 `bundle/object.field`）
    pub location: String,
    /// 诊断消息
    pub message: String,
}

impl Diagnostic {
    pub fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, location, message)
    }

    pub fn warn(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warn, location, message)
    }

    pub fn info(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Info, location, message)
    }

    fn new(level: DiagnosticLevel, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.level, self.location, self.message)
    }
}

/// 诊断结果
#[derive(Debug, Clone, Default)]
pub struct DiagnosticResult {
    /// 诊断条目列表
    pub diagnostics: Vec<Diagnostic>,
}

impl DiagnosticResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: DiagnosticResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn error_count(&self) -> usize {
        self.count(DiagnosticLevel::Error)
    }

    pub fn warn_count(&self) -> usize {
        self.count(DiagnosticLevel::Warn)
    }

    fn count(&self, level: DiagnosticLevel) -> usize {
        self.diagnostics.iter().filter(|d| d.level == level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 按级别过滤
    pub fn filter_by_level(&self, min_level: DiagnosticLevel) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level >= min_level)
            .collect()
    }
}

/// 字段期望的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    /// 数字或可解析为数字的文本
    Number,
    Flag,
    /// JSON 数组（文本或结构化）
    ProductList,
}

impl FieldKind {
    fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (_, FieldValue::Null) => true,
            (Self::Text, FieldValue::Text(_)) => true,
            (Self::Number, FieldValue::Number(_)) => true,
            (Self::Number, FieldValue::Text(s)) => s.trim().parse::<f64>().is_ok(),
            (Self::Flag, FieldValue::Bool(_)) => true,
            (Self::ProductList, FieldValue::Text(_) | FieldValue::Structured(_)) => true,
            _ => false,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Flag => "bool",
            Self::ProductList => "product list",
        }
    }
}

/// 界面读取的全部字段
const SCHEMA: &[(ContentKey, &[(&str, FieldKind)])] = &[
    (
        THEME,
        &[
            ("text_color", FieldKind::Text),
            ("background_color", FieldKind::Text),
            ("accent_color", FieldKind::Text),
            ("primary_color", FieldKind::Text),
            ("card_radius", FieldKind::Number),
        ],
    ),
    (
        LANDING,
        &[
            ("game_title", FieldKind::Text),
            ("tagline", FieldKind::Text),
            ("username_placeholder", FieldKind::Text),
            ("cta_button", FieldKind::Text),
            ("background_art", FieldKind::Text),
        ],
    ),
    (
        LOBBY,
        &[
            ("welcome_message", FieldKind::Text),
            ("show_popup", FieldKind::Flag),
        ],
    ),
    (
        POPUP,
        &[
            ("popup_title", FieldKind::Text),
            ("popup_message", FieldKind::Text),
            ("popup_button", FieldKind::Text),
        ],
    ),
    (
        STORE_HEADER,
        &[
            ("store_title", FieldKind::Text),
            ("store_subtitle", FieldKind::Text),
        ],
    ),
    (STORE_PRODUCTS, &[("products", FieldKind::ProductList)]),
];

/// 分析内容目录，返回诊断结果
///
/// 执行以下检查：
/// - 缺失的内容包/对象（Info，界面会使用默认值）
/// - 字段类型与界面期望不符（Warn，该字段会回退到默认值）
/// - 商品列表无法解析（Error，商店将不显示任何商品）
pub fn analyze_content(store: &ContentStore) -> DiagnosticResult {
    let mut result = DiagnosticResult::new();

    for (key, fields) in SCHEMA {
        let Some(record) = store.record(*key) else {
            result.push(Diagnostic::info(
                key.to_string(),
                "内容对象缺失，将全部使用默认值",
            ));
            continue;
        };

        for (field, kind) in *fields {
            let Some(value) = record.get(field) else {
                continue;
            };
            let location = format!("{key}.{field}");

            if !kind.accepts(value) {
                result.push(Diagnostic::warn(
                    location,
                    format!(
                        "字段类型为 {}，期望 {}，将使用默认值",
                        value.kind(),
                        kind.name()
                    ),
                ));
                continue;
            }

            if *kind == FieldKind::ProductList && !is_product_array(value) {
                result.push(Diagnostic::error(
                    location,
                    "商品列表不是有效的 JSON 数组，商店将不显示任何商品",
                ));
            } else if *kind == FieldKind::ProductList && parse_products(value).is_empty() {
                result.push(Diagnostic::warn(location, "商品列表中没有可识别的商品"));
            }
        }
    }

    result
}

fn is_product_array(value: &FieldValue) -> bool {
    match value {
        FieldValue::Text(raw) => matches!(
            serde_json::from_str::<serde_json::Value>(raw),
            Ok(serde_json::Value::Array(_))
        ),
        FieldValue::Structured(v) => v.is_array(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue(json: &str) -> ContentStore {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_store_reports_missing_objects() {
        let result = analyze_content(&ContentStore::new());
        assert_eq!(result.diagnostics.len(), SCHEMA.len());
        assert!(!result.has_errors());
        assert!(
            result
                .diagnostics
                .iter()
                .all(|d| d.level == DiagnosticLevel::Info)
        );
    }

    #[test]
    fn test_wrong_kind_warns() {
        let store = catalogue(
            r#"{"theme": {"ui-theme": {"card_radius": "wide", "text_color": 3}},
                "lobby": {"main-lobby": {"show_popup": "yes"}}}"#,
        );
        let result = analyze_content(&store);
        assert_eq!(result.warn_count(), 3);
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.location == "theme/ui-theme.card_radius")
        );
    }

    #[test]
    fn test_malformed_products_is_error() {
        let store = catalogue(r#"{"store": {"store-products": {"products": "[{oops"}}}"#);
        let result = analyze_content(&store);
        assert!(result.has_errors());
        let errors = result.filter_by_level(DiagnosticLevel::Error);
        assert_eq!(errors[0].location, "store/store-products.products");
        assert_eq!(
            errors[0].to_string(),
            "[ERROR] store/store-products.products: 商品列表不是有效的 JSON 数组，商店将不显示任何商品"
        );
    }

    #[test]
    fn test_valid_catalogue_only_missing_info() {
        let store = catalogue(
            r#"{"store": {"store-products": {"products": "[{\"name\": \"Gems\"}]"},
                          "store-header": {"store_title": "Shop"}}}"#,
        );
        let result = analyze_content(&store);
        assert_eq!(result.error_count(), 0);
        assert_eq!(result.warn_count(), 0);
    }
}
