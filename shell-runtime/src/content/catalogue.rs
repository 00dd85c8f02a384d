//! 各界面使用的内容对象及其默认值
//!
//! 每个字段都成对出现：内容服务的值（存在且非 null 且类型正确）或硬编码默认值。
//! 内容服务完全没有返回数据时，界面仍然完整可用。

use super::{ContentKey, ContentStore, FieldRecord, Product, parse_products};

pub const THEME: ContentKey = ContentKey::new("theme", "ui-theme");
pub const LANDING: ContentKey = ContentKey::new("landing", "ftue-landing");
pub const LOBBY: ContentKey = ContentKey::new("lobby", "main-lobby");
pub const POPUP: ContentKey = ContentKey::new("popup", "welcome-offer-popup");
pub const STORE_HEADER: ContentKey = ContentKey::new("store", "store-header");
pub const STORE_PRODUCTS: ContentKey = ContentKey::new("store", "store-products");

/// 批量加载后需要读取的全部内容包
pub const CONTENT_BUNDLES: &[&str] = &["landing", "lobby", "popup", "store", "theme"];

/// 欢迎语模板中的英雄名占位符
pub const HERO_NAME_TOKEN: &str = "{heroName}";

const DEFAULT_WELCOME_TEMPLATE: &str = "Welcome, {heroName}! Ready for your next quest?";

/// 替换模板中所有英雄名占位符
pub fn interpolate_hero_name(template: &str, hero_name: &str) -> String {
    template.replace(HERO_NAME_TOKEN, hero_name)
}

fn text_or(record: Option<&FieldRecord>, name: &str, default: &str) -> String {
    record
        .and_then(|r| r.text(name))
        .unwrap_or(default)
        .to_string()
}

/// 全局主题
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeContent {
    pub text_color: String,
    pub background_color: String,
    pub accent_color: String,
    pub primary_color: String,
    /// 圆角半径（像素），可直接参与布局计算
    pub card_radius: f64,
}

impl Default for ThemeContent {
    fn default() -> Self {
        Self::resolve(&ContentStore::default())
    }
}

impl ThemeContent {
    pub fn resolve(store: &ContentStore) -> Self {
        let record = store.record(THEME);
        Self {
            text_color: text_or(record, "text_color", "#fff"),
            background_color: text_or(record, "background_color", "#181a20"),
            accent_color: text_or(record, "accent_color", "#ff6b6b"),
            primary_color: text_or(record, "primary_color", "#667eea"),
            card_radius: record.and_then(|r| r.number("card_radius")).unwrap_or(16.0),
        }
    }
}

/// 落地页文案
#[derive(Debug, Clone, PartialEq)]
pub struct LandingContent {
    pub game_title: String,
    pub tagline: String,
    pub username_placeholder: String,
    pub cta_button: String,
    /// 背景图地址；缺失时不绘制背景层
    pub background_art: Option<String>,
}

impl LandingContent {
    pub fn resolve(store: &ContentStore) -> Self {
        let record = store.record(LANDING);
        Self {
            game_title: text_or(record, "game_title", "Nova Legends: Battle for the Stars"),
            tagline: text_or(
                record,
                "tagline",
                "Join millions of players. Claim your welcome rewards and start your adventure!",
            ),
            username_placeholder: text_or(
                record,
                "username_placeholder",
                "Choose your hero name",
            ),
            cta_button: text_or(record, "cta_button", "Enter the Arena"),
            background_art: record
                .and_then(|r| r.text("background_art"))
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// 大厅内容
#[derive(Debug, Clone, PartialEq)]
pub struct LobbyContent {
    /// 欢迎语模板（含 `{heroName}` 占位符）
    pub welcome_template: String,
    /// 进入大厅时是否弹出欢迎优惠
    pub show_popup: bool,
}

impl LobbyContent {
    pub fn resolve(store: &ContentStore) -> Self {
        let record = store.record(LOBBY);
        Self {
            welcome_template: text_or(record, "welcome_message", DEFAULT_WELCOME_TEMPLATE),
            show_popup: record.and_then(|r| r.flag("show_popup")).unwrap_or(false),
        }
    }

    /// 代入英雄名后的欢迎语
    pub fn welcome_message(&self, hero_name: &str) -> String {
        interpolate_hero_name(&self.welcome_template, hero_name)
    }
}

/// 欢迎优惠弹窗文案
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub message: String,
    pub button: String,
}

impl PopupContent {
    pub fn resolve(store: &ContentStore) -> Self {
        let record = store.record(POPUP);
        Self {
            title: text_or(record, "popup_title", "🎁 Welcome Offer"),
            message: text_or(
                record,
                "popup_message",
                "500 Gems + 20% Off Your First Purchase! Limited time only.",
            ),
            button: text_or(record, "popup_button", "Claim Now"),
        }
    }
}

/// 商店内容
#[derive(Debug, Clone, PartialEq)]
pub struct StoreContent {
    pub title: String,
    pub subtitle: String,
    /// 商品列表；数据损坏时为空
    pub products: Vec<Product>,
}

impl StoreContent {
    pub fn resolve(store: &ContentStore) -> Self {
        let header = store.record(STORE_HEADER);
        let products = store
            .record(STORE_PRODUCTS)
            .and_then(|r| r.get("products"))
            .map(parse_products)
            .unwrap_or_default();

        Self {
            title: text_or(header, "store_title", "Nova Store"),
            subtitle: text_or(
                header,
                "store_subtitle",
                "Special offers and bundles just for you!",
            ),
            products,
        }
    }
}
