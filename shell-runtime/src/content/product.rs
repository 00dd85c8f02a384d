//! 商店商品解析
//!
//! 商品列表以 JSON 文本（或结构化数组）存放在内容字段中。
//! 解析失败一律返回空列表，不向界面抛错。

use serde::{Deserialize, Serialize};

use super::FieldValue;

/// 商店商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 商品 ID（数字或字符串均可）
    #[serde(default, deserialize_with = "id_as_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub description: String,
    /// 角标文字，如 "BEST VALUE"
    #[serde(default, deserialize_with = "text_or_none")]
    pub tag: Option<String>,
    /// 折扣百分比，0 表示无折扣
    #[serde(default, deserialize_with = "number_or_zero")]
    pub discount: f64,
}

impl Product {
    /// 是否有折扣
    pub fn has_discount(&self) -> bool {
        self.discount > 0.0
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

// 可选字段为 null 或类型不符时取默认值，不丢弃整个商品

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(text_or_none(deserializer)?.unwrap_or_default())
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()).unwrap_or(0.0))
}

/// 从内容字段解析商品列表
///
/// - 文本：按 JSON 解析，必须是数组
/// - 结构化数组：直接使用
/// - 其他类型、JSON 损坏、非数组：空列表
///
/// 数组中的非对象元素被跳过；对象中字段类型不符时取默认值。
pub fn parse_products(field: &FieldValue) -> Vec<Product> {
    let items = match field {
        FieldValue::Text(raw) => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        FieldValue::Structured(serde_json::Value::Array(items)) => items.clone(),
        _ => return Vec::new(),
    };

    items
        .into_iter()
        .filter(serde_json::Value::is_object)
        .filter_map(|item| serde_json::from_value::<Product>(item).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_products_from_text() {
        let field = FieldValue::from(
            r#"[
                {"id": "gems_500", "name": "500 Gems", "description": "A pile", "tag": "HOT", "discount": 20},
                {"id": 7, "name": "Starter Pack", "description": "For new heroes"}
            ]"#,
        );
        let products = parse_products(&field);

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id.as_deref(), Some("gems_500"));
        assert!(products[0].has_discount());
        assert_eq!(products[1].id.as_deref(), Some("7"));
        assert_eq!(products[1].tag, None);
        assert!(!products[1].has_discount());
    }

    #[test]
    fn test_parse_products_fail_closed() {
        assert!(parse_products(&FieldValue::from("not json")).is_empty());
        assert!(parse_products(&FieldValue::from(r#"{"name": "x"}"#)).is_empty());
        assert!(parse_products(&FieldValue::Number(3.0)).is_empty());
        assert!(parse_products(&FieldValue::Null).is_empty());
    }

    #[test]
    fn test_parse_products_skips_non_objects() {
        let field = FieldValue::from(r#"[1, "x", null, {"name": "Ok"}, {"name": 5}]"#);
        let products = parse_products(&field);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Ok");
        assert_eq!(products[1].name, "");
    }

    #[test]
    fn test_parse_products_lenient_fields() {
        let field = FieldValue::from(
            r#"[
                {"id": "a", "name": "Gems", "description": "d", "discount": null},
                {"id": "b", "name": "Gold", "description": null, "tag": null},
                {"id": "c", "name": "Pack", "discount": "20", "tag": 3},
                {"id": "d", "name": null, "discount": "lots"}
            ]"#,
        );
        let products = parse_products(&field);

        assert_eq!(products.len(), 4);
        assert!(!products[0].has_discount());
        assert_eq!(products[1].description, "");
        assert_eq!(products[1].tag, None);
        assert_eq!(products[2].discount, 20.0);
        assert_eq!(products[2].tag, None);
        assert_eq!(products[3].name, "");
        assert_eq!(products[3].discount, 0.0);
    }

    #[test]
    fn test_parse_products_structured() {
        let field = FieldValue::Structured(serde_json::json!([{"name": "Gold"}]));
        assert_eq!(parse_products(&field).len(), 1);
    }
}
