//! 终端文本渲染
//!
//! 把 [`View`] 排版成纯文本，附带当前界面可用的命令提示。

use std::fmt::Write;

use shell_runtime::View;
use shell_runtime::view::{LandingView, LobbyView, OfferView, StoreView};

/// 渲染视图为终端文本（以换行结尾）
pub fn render_text(view: &View) -> String {
    let mut out = String::new();
    match view {
        View::Loading { message } => {
            let _ = writeln!(out, "{message}");
        }
        View::Unavailable {
            message,
            retry_label,
        } => {
            let _ = writeln!(out, "! {message}");
            let _ = writeln!(out, "> retry        {retry_label}");
        }
        View::Landing(landing) => render_landing(&mut out, landing),
        View::Lobby(lobby) => render_lobby(&mut out, lobby),
        View::Store(store) => render_store(&mut out, store),
    }
    out
}

fn render_landing(out: &mut String, view: &LandingView) {
    let _ = writeln!(out, "=== {} ===", view.title);
    let _ = writeln!(out, "{}", view.tagline);
    if let Some(art) = &view.background_art {
        let _ = writeln!(out, "(background: {art})");
    }
    let _ = writeln!(out, "> hero <name>  {} [{}]", view.cta_label, view.placeholder);
}

fn render_lobby(out: &mut String, view: &LobbyView) {
    let _ = writeln!(out, "=== Lobby ===");
    let _ = writeln!(out, "{}", view.welcome);
    for tile in &view.tiles {
        match (&tile.caption, tile.enabled()) {
            (_, true) => {
                let _ = writeln!(out, "  {}  > store", tile.label);
            }
            (Some(caption), false) => {
                let _ = writeln!(out, "  {} ({caption})", tile.label);
            }
            (None, false) => {
                let _ = writeln!(out, "  {}", tile.label);
            }
        }
    }
    if let Some(offer) = &view.offer {
        render_offer(out, offer);
    }
}

fn render_offer(out: &mut String, offer: &OfferView) {
    let _ = writeln!(out, "+-- {} --+", offer.title);
    let _ = writeln!(out, "| {}", offer.message);
    let _ = writeln!(out, "> claim        {}", offer.claim_label);
    let _ = writeln!(out, "> close        {}", offer.close_label);
}

fn render_store(out: &mut String, view: &StoreView) {
    let _ = writeln!(out, "=== {} ===", view.title);
    let _ = writeln!(out, "{}", view.subtitle);
    if view.products.is_empty() {
        let _ = writeln!(out, "(no products)");
    }
    for card in &view.products {
        let mut heading = format!("- {}", card.name);
        if let Some(tag) = &card.tag {
            let _ = write!(heading, " [{tag}]");
        }
        if let Some(badge) = &card.discount_badge {
            let _ = write!(heading, " {badge}");
        }
        let _ = writeln!(out, "{heading}");
        let _ = writeln!(out, "  {}", card.description);
        let _ = writeln!(out, "  [{}]", card.buy_label);
    }
    let _ = writeln!(out, "> back         {}", view.back_label);
}
