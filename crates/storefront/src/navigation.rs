//! Site header and footer navigation.
//!
//! Menus come from the Shopify admin through the layout query. Their item URLs
//! are absolute, so links pointing at the store itself are reduced to their
//! path. When the layout query fails the header falls back to a built-in menu
//! and the footer renders without links; pages never fail because of it.

use std::sync::LazyLock;

use regex::Regex;

use crate::shopify::{Layout, Menu};
use crate::state::AppState;
use crate::views::{DrawerPosition, DrawerView};

/// Scroll offset (px) after which the header sticks to the top with a shadow.
pub const SCROLL_THRESHOLD_PX: u32 = 250;

/// Header background when no path pattern matches.
pub const DEFAULT_BACKGROUND: &str = "bg-secondary";

/// Header background per path pattern; `*` matches any run of characters.
const PATH_BACKGROUNDS: &[(&str, &str)] = &[
    ("/", "bg-secondary"),
    ("/collections", "bg-secondary"),
    ("/collections/*", "bg-secondary"),
];

static PATH_BACKGROUND_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    PATH_BACKGROUNDS
        .iter()
        .map(|(pattern, class)| (glob_regex(pattern).expect("Invalid path pattern"), *class))
        .collect()
});

/// Header menu used when the shop has no menu or the layout query fails.
const FALLBACK_HEADER_MENU: &[(&str, &str)] = &[
    ("Collections", "/collections"),
    ("Blog", "/blogs/journal"),
    ("Policies", "/policies"),
    ("About", "/pages/about"),
];

const WOMENS_SUBMENU: &[(&str, &str)] = &[
    ("All Womens", "/collections/all/Women's"),
    ("Womens Tops", "/collections/tops/Women's"),
    ("Womens Bottoms", "/collections/bottoms/Women's"),
    ("Dresses & Rompers", "/collections/dresses"),
];

const MENS_SUBMENU: &[(&str, &str)] = &[
    ("All Mens", "/collections/all/Men's"),
    ("Mens Tops", "/collections/tops/Men's"),
    ("Mens Bottoms", "/collections/bottoms/Men's"),
];

// =============================================================================
// Views
// =============================================================================

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub title: String,
    pub url: String,
}

impl NavItem {
    fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
        }
    }
}

/// A drawer of curated collection links opened from the header.
#[derive(Debug, Clone)]
pub struct Submenu {
    pub toggle_text: String,
    pub drawer: DrawerView,
    pub links: Vec<NavItem>,
}

/// Site header.
#[derive(Debug, Clone)]
pub struct HeaderView {
    pub shop_name: String,
    pub items: Vec<NavItem>,
    pub submenus: Vec<Submenu>,
    /// Background class for the current path.
    pub background_class: &'static str,
    pub announcement: Option<String>,
    pub scroll_threshold: u32,
}

/// Site footer.
#[derive(Debug, Clone)]
pub struct FooterView {
    pub shop_name: String,
    pub items: Vec<NavItem>,
}

/// Header and footer for one page.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub header: HeaderView,
    pub footer: FooterView,
}

impl Navigation {
    /// Load navigation for the page at `path`.
    pub async fn load(state: &AppState, path: &str) -> Self {
        let site = &state.config().site;
        let layout = state
            .storefront()
            .layout(&site.header_menu_handle, &site.footer_menu_handle)
            .await;

        match layout {
            Ok(layout) => Self::from_layout(
                &layout,
                &state.config().shopify.public_store_domain,
                path,
                site.announcement.clone(),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load layout, using fallback navigation");
                Self::fallback(&site.name, path, site.announcement.clone())
            }
        }
    }

    /// Build navigation from the shop's layout data.
    #[must_use]
    pub fn from_layout(
        layout: &Layout,
        public_store_domain: &str,
        path: &str,
        announcement: Option<String>,
    ) -> Self {
        let primary_domain = layout.shop.primary_domain_url.as_str();
        let header_items = layout.header_menu.as_ref().map_or_else(fallback_header_items, |menu| {
            menu_items(menu, public_store_domain, primary_domain)
        });
        let footer_items = layout
            .footer_menu
            .as_ref()
            .map(|menu| menu_items(menu, public_store_domain, primary_domain))
            .unwrap_or_default();

        Self {
            header: header(&layout.shop.name, header_items, path, announcement),
            footer: FooterView {
                shop_name: layout.shop.name.clone(),
                items: footer_items,
            },
        }
    }

    /// Navigation without any shop data.
    #[must_use]
    pub fn fallback(shop_name: &str, path: &str, announcement: Option<String>) -> Self {
        Self {
            header: header(shop_name, fallback_header_items(), path, announcement),
            footer: FooterView {
                shop_name: shop_name.to_string(),
                items: Vec::new(),
            },
        }
    }
}

fn header(shop_name: &str, items: Vec<NavItem>, path: &str, announcement: Option<String>) -> HeaderView {
    HeaderView {
        shop_name: shop_name.to_string(),
        items,
        submenus: submenus(),
        background_class: background_class(path),
        announcement,
        scroll_threshold: SCROLL_THRESHOLD_PX,
    }
}

// =============================================================================
// Menu Helpers
// =============================================================================

/// Reduce a menu URL to its path when it points at the store itself.
///
/// URLs on `*.myshopify.com`, the public store domain, or the primary domain
/// become relative; anything else (external links) is kept as is.
#[must_use]
pub fn normalize_menu_url(url: &str, public_store_domain: &str, primary_domain_url: &str) -> String {
    let is_own = |domain: &str| !domain.is_empty() && url.contains(domain);

    if url.contains("myshopify.com") || is_own(public_store_domain) || is_own(primary_domain_url) {
        if let Ok(parsed) = url::Url::parse(url) {
            return parsed.path().to_string();
        }
    }

    url.to_string()
}

/// Top-level links of a menu. Items without a URL are skipped.
#[must_use]
pub fn menu_items(menu: &Menu, public_store_domain: &str, primary_domain_url: &str) -> Vec<NavItem> {
    menu.items
        .iter()
        .filter_map(|item| {
            let url = item.url.as_deref()?;
            Some(NavItem {
                title: item.title.clone(),
                url: normalize_menu_url(url, public_store_domain, primary_domain_url),
            })
        })
        .collect()
}

/// The built-in header menu.
#[must_use]
pub fn fallback_header_items() -> Vec<NavItem> {
    FALLBACK_HEADER_MENU
        .iter()
        .map(|(title, url)| NavItem::new(title, url))
        .collect()
}

/// The Womens and Mens collection drawers.
#[must_use]
pub fn submenus() -> Vec<Submenu> {
    [
        ("womens-menu", "Womens", WOMENS_SUBMENU),
        ("mens-menu", "Mens", MENS_SUBMENU),
    ]
    .into_iter()
    .map(|(id, toggle_text, links)| Submenu {
        toggle_text: toggle_text.to_string(),
        drawer: DrawerView::new(
            id,
            DrawerPosition::Left,
            toggle_text,
            format!("{toggle_text} collections"),
        ),
        links: links
            .iter()
            .map(|(title, url)| NavItem::new(title, &encode_path(url)))
            .collect(),
    })
    .collect()
}

/// Percent-encode each segment of a path (`Women's` -> `Women%27s`).
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

// =============================================================================
// Header Background
// =============================================================================

/// Compile a path pattern where `*` matches any run of characters.
fn glob_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let escaped = regex::escape(pattern).replace(r"\*", ".*");
    Regex::new(&format!("^{escaped}$"))
}

/// Header background class for a request path.
#[must_use]
pub fn background_class(path: &str) -> &'static str {
    PATH_BACKGROUND_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(path))
        .map_or(DEFAULT_BACKGROUND, |(_, class)| class)
}
