//! # View 模块
//!
//! 从状态到视图描述的纯函数。
//!
//! Host 不关心状态如何变化，只需要在每次 `handle` 之后调用 [`render`]，
//! 与上一次结果比较，变化时重绘即可。视图只包含已经解析好的文案、颜色与数值，
//! 不含任何渲染后端的类型。

use serde::Serialize;

use crate::content::{
    LandingContent, LobbyContent, PopupContent, Product, StoreContent, ThemeContent,
};
use crate::input::ShellAction;
use crate::router::offer_presented;
use crate::state::{BootPhase, Screen, ShellState};

/// 加载占位文案
pub const LOADING_MESSAGE: &str = "Loading Nova Experiences...";

const COMING_SOON: &str = "Coming Soon";

/// 视图
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// 加载占位（注册或内容加载尚未完成）
    Loading { message: String },
    /// 启动失败，可重试
    Unavailable { message: String, retry_label: String },
    Landing(LandingView),
    Lobby(LobbyView),
    Store(StoreView),
}

impl View {
    /// 是否为加载占位
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// 对应的界面（加载与失败时为 `None`）
    pub fn screen(&self) -> Option<Screen> {
        match self {
            Self::Landing(_) => Some(Screen::Landing),
            Self::Lobby(_) => Some(Screen::Lobby),
            Self::Store(_) => Some(Screen::Store),
            Self::Loading { .. } | Self::Unavailable { .. } => None,
        }
    }
}

/// 已解析的主题
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeView {
    pub text_color: String,
    pub background_color: String,
    pub accent_color: String,
    pub primary_color: String,
    pub card_radius: f64,
}

impl From<ThemeContent> for ThemeView {
    fn from(theme: ThemeContent) -> Self {
        Self {
            text_color: theme.text_color,
            background_color: theme.background_color,
            accent_color: theme.accent_color,
            primary_color: theme.primary_color,
            card_radius: theme.card_radius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingView {
    pub theme: ThemeView,
    pub title: String,
    pub tagline: String,
    pub placeholder: String,
    pub cta_label: String,
    pub background_art: Option<String>,
}

/// 大厅入口按钮
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LobbyTile {
    pub label: String,
    /// 副标题（如 "Coming Soon"）
    pub caption: Option<String>,
    /// 点击后的操作；`None` 表示按钮禁用
    pub action: Option<ShellAction>,
}

impl LobbyTile {
    pub fn enabled(&self) -> bool {
        self.action.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LobbyView {
    pub theme: ThemeView,
    pub hero_name: String,
    pub welcome: String,
    pub tiles: Vec<LobbyTile>,
    /// 欢迎优惠弹窗（覆盖在大厅之上）
    pub offer: Option<OfferView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferView {
    pub title: String,
    pub message: String,
    pub claim_label: String,
    pub close_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreView {
    pub theme: ThemeView,
    pub title: String,
    pub subtitle: String,
    pub back_label: String,
    pub products: Vec<ProductCard>,
}

/// 商品卡片
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductCard {
    /// 列表 key：商品 ID，缺失时为列表下标
    pub key: String,
    pub name: String,
    pub description: String,
    pub tag: Option<String>,
    /// 折扣角标，如 `-20% OFF`；无折扣时为 `None`
    pub discount_badge: Option<String>,
    pub buy_label: String,
}

impl ProductCard {
    fn from_product(index: usize, product: Product) -> Self {
        let discount_badge = product
            .has_discount()
            .then(|| format!("-{}% OFF", format_number(product.discount)));

        Self {
            key: product.id.unwrap_or_else(|| index.to_string()),
            name: product.name,
            description: product.description,
            tag: product.tag.filter(|t| !t.is_empty()),
            discount_badge,
            buy_label: "Buy Now".to_string(),
        }
    }
}

/// 整数值不带小数点
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// 根据状态计算视图
///
/// 就绪之前只会返回 [`View::Loading`] 或 [`View::Unavailable`]，
/// 不会出现填了一半的界面。
pub fn render(state: &ShellState) -> View {
    match &state.phase {
        BootPhase::Idle | BootPhase::Registering | BootPhase::LoadingContent => View::Loading {
            message: LOADING_MESSAGE.to_string(),
        },
        BootPhase::Failed { stage, reason } => View::Unavailable {
            message: format!("{stage}失败：{reason}"),
            retry_label: "Retry".to_string(),
        },
        BootPhase::Ready => render_screen(state),
    }
}

fn render_screen(state: &ShellState) -> View {
    let content = &state.content;
    let theme = ThemeView::from(ThemeContent::resolve(content));

    match state.screen.screen() {
        Screen::Landing => {
            let landing = LandingContent::resolve(content);
            View::Landing(LandingView {
                theme,
                title: landing.game_title,
                tagline: landing.tagline,
                placeholder: landing.username_placeholder,
                cta_label: landing.cta_button,
                background_art: landing.background_art,
            })
        }
        Screen::Lobby => {
            let hero_name = state.screen.hero_name().to_string();
            let lobby = LobbyContent::resolve(content);
            let offer = offer_presented(state).then(|| {
                let popup = PopupContent::resolve(content);
                OfferView {
                    title: popup.title,
                    message: popup.message,
                    claim_label: popup.button,
                    close_label: "×".to_string(),
                }
            });

            View::Lobby(LobbyView {
                theme,
                welcome: lobby.welcome_message(&hero_name),
                hero_name,
                tiles: lobby_tiles(),
                offer,
            })
        }
        Screen::Store => {
            let store = StoreContent::resolve(content);
            View::Store(StoreView {
                theme,
                title: store.title,
                subtitle: store.subtitle,
                back_label: "← Back".to_string(),
                products: store
                    .products
                    .into_iter()
                    .enumerate()
                    .map(|(i, p)| ProductCard::from_product(i, p))
                    .collect(),
            })
        }
    }
}

fn lobby_tiles() -> Vec<LobbyTile> {
    vec![
        LobbyTile {
            label: "🎮 Play".to_string(),
            caption: Some(COMING_SOON.to_string()),
            action: None,
        },
        LobbyTile {
            label: "🛒 Store".to_string(),
            caption: None,
            action: Some(ShellAction::EnterStore),
        },
        LobbyTile {
            label: "🏆 Events".to_string(),
            caption: Some(COMING_SOON.to_string()),
            action: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentBundle, ContentStore, FieldRecord, LANDING, STORE_PRODUCTS};
    use crate::state::BootStage;

    fn ready_state(content: ContentStore) -> ShellState {
        ShellState {
            phase: BootPhase::Ready,
            content,
            ..ShellState::default()
        }
    }

    #[test]
    fn test_loading_until_ready() {
        for phase in [BootPhase::Idle, BootPhase::Registering, BootPhase::LoadingContent] {
            let state = ShellState {
                phase,
                ..ShellState::default()
            };
            assert_eq!(
                render(&state),
                View::Loading {
                    message: LOADING_MESSAGE.to_string()
                }
            );
        }
    }

    #[test]
    fn test_failed_renders_unavailable() {
        let state = ShellState {
            phase: BootPhase::Failed {
                stage: BootStage::ContentLoad,
                reason: "timeout".to_string(),
            },
            ..ShellState::default()
        };
        let View::Unavailable { message, .. } = render(&state) else {
            panic!("expected unavailable view");
        };
        assert_eq!(message, "内容加载失败：timeout");
    }

    #[test]
    fn test_landing_defaults_and_override() {
        let View::Landing(landing) = render(&ready_state(ContentStore::new())) else {
            panic!("expected landing view");
        };
        assert_eq!(landing.title, "Nova Legends: Battle for the Stars");
        assert_eq!(landing.cta_label, "Enter the Arena");
        assert_eq!(landing.theme.card_radius, 16.0);

        let store = ContentStore::new().with(
            LANDING.bundle,
            ContentBundle::new().with(
                LANDING.object,
                FieldRecord::new()
                    .with("game_title", "Star Siege")
                    .with("background_art", "https://cdn.example.com/bg.png"),
            ),
        );
        let View::Landing(landing) = render(&ready_state(store)) else {
            panic!("expected landing view");
        };
        assert_eq!(landing.title, "Star Siege");
        assert_eq!(landing.tagline, "Join millions of players. Claim your welcome rewards and start your adventure!");
        assert_eq!(
            landing.background_art.as_deref(),
            Some("https://cdn.example.com/bg.png")
        );
    }

    #[test]
    fn test_lobby_tiles() {
        let mut state = ready_state(ContentStore::new());
        state.screen.enter_lobby("Aria").unwrap();

        let View::Lobby(lobby) = render(&state) else {
            panic!("expected lobby view");
        };
        assert_eq!(lobby.welcome, "Welcome, Aria! Ready for your next quest?");
        let enabled: Vec<_> = lobby.tiles.iter().filter(|t| t.enabled()).collect();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].action, Some(ShellAction::EnterStore));
        assert!(lobby.offer.is_none());
    }

    #[test]
    fn test_product_cards() {
        let products = r#"[
            {"id": "starter", "name": "Starter", "description": "d", "tag": "NEW", "discount": 20},
            {"name": "Gems", "description": "e", "tag": "", "discount": 12.5},
            {"name": "Gold", "description": "f", "discount": 0}
        ]"#;
        let store = ContentStore::new().with(
            STORE_PRODUCTS.bundle,
            ContentBundle::new().with(
                STORE_PRODUCTS.object,
                FieldRecord::new().with("products", products),
            ),
        );
        let mut state = ready_state(store);
        state.screen.enter_lobby("Aria").unwrap();
        state.screen.enter_store().unwrap();

        let View::Store(view) = render(&state) else {
            panic!("expected store view");
        };
        assert_eq!(view.products.len(), 3);
        assert_eq!(view.products[0].key, "starter");
        assert_eq!(view.products[0].discount_badge.as_deref(), Some("-20% OFF"));
        assert_eq!(view.products[1].key, "1");
        assert_eq!(view.products[1].tag, None);
        assert_eq!(view.products[1].discount_badge.as_deref(), Some("-12.5% OFF"));
        assert_eq!(view.products[2].discount_badge, None);
    }

    #[test]
    fn test_unparseable_products_render_no_cards() {
        let store = ContentStore::new().with(
            STORE_PRODUCTS.bundle,
            ContentBundle::new().with(
                STORE_PRODUCTS.object,
                FieldRecord::new().with("products", "}{"),
            ),
        );
        let mut state = ready_state(store);
        state.screen.enter_lobby("Aria").unwrap();
        state.screen.enter_store().unwrap();

        let View::Store(view) = render(&state) else {
            panic!("expected store view");
        };
        assert!(view.products.is_empty());
        assert_eq!(view.title, "Nova Store");
    }
}
