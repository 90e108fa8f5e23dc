//! View models handed to Askama templates.
//!
//! Templates never see Storefront API types directly. Each view maps resolved
//! data to exactly what the markup needs, with optional fields where the
//! markup has a "render nothing" branch.

pub mod primitives;

pub use primitives::{ButtonClass, ButtonSize, ButtonVariant, DrawerPosition, DrawerView};

use crate::middleware::CspNonce;
use crate::navigation::{FooterView, HeaderView, Navigation};
use crate::shopify::{Collection, Image, Product, SelectedOption};

/// Number of grid images loaded eagerly (above the fold).
pub const EAGER_IMAGE_COUNT: usize = 12;

/// Alt text for gallery images without one.
pub const GALLERY_ALT_FALLBACK: &str = "Product Image";

// =============================================================================
// Images
// =============================================================================

/// An image ready for an `<img>` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageView {
    pub url: String,
    pub alt: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl ImageView {
    /// Build from a Storefront image, using `fallback_alt` when it has no alt text.
    #[must_use]
    pub fn from_image(image: &Image, fallback_alt: &str) -> Self {
        Self {
            url: image.url.clone(),
            alt: image
                .alt_text
                .clone()
                .unwrap_or_else(|| fallback_alt.to_string()),
            width: image.width,
            height: image.height,
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// URL of a product page with the given variant options preselected.
///
/// ```
/// use highland_storefront::shopify::SelectedOption;
/// use highland_storefront::views::variant_url;
///
/// let options = [SelectedOption { name: "Size".into(), value: "X Large".into() }];
/// assert_eq!(variant_url("lake-tee", &options), "/products/lake-tee?Size=X%20Large");
/// assert_eq!(variant_url("lake-tee", &[]), "/products/lake-tee");
/// ```
#[must_use]
pub fn variant_url(handle: &str, selected_options: &[SelectedOption]) -> String {
    let path = format!("/products/{handle}");
    if selected_options.is_empty() {
        return path;
    }

    let query = selected_options
        .iter()
        .map(|option| {
            format!(
                "{}={}",
                urlencoding::encode(&option.name),
                urlencoding::encode(&option.value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{path}?{query}")
}

/// A product grid item.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub title: String,
    /// Product page URL, preselecting the first variant.
    pub url: String,
    pub image: Option<ImageView>,
    /// Lowest variant price.
    pub price: String,
    eager: bool,
}

impl ProductCardView {
    /// Build the card at `index` in its grid.
    #[must_use]
    pub fn new(product: &Product, index: usize) -> Self {
        Self {
            title: product.title.clone(),
            url: variant_url(&product.handle, product.first_variant_options()),
            image: product
                .featured_image
                .as_ref()
                .map(|image| ImageView::from_image(image, &product.title)),
            price: product.min_price.formatted(),
            eager: index < EAGER_IMAGE_COUNT,
        }
    }

    /// Cards for a whole grid, in order.
    #[must_use]
    pub fn grid(products: &[Product]) -> Vec<Self> {
        products
            .iter()
            .enumerate()
            .map(|(index, product)| Self::new(product, index))
            .collect()
    }

    /// Value of the image's `loading` attribute.
    #[must_use]
    pub const fn loading(&self) -> &'static str {
        if self.eager { "eager" } else { "lazy" }
    }
}

// =============================================================================
// Collections
// =============================================================================

/// Banner at the top of a collection page.
///
/// Collections without an image get a text-only banner.
#[derive(Debug, Clone)]
pub struct HeroView {
    pub title: String,
    pub description: String,
    pub image: Option<ImageView>,
}

impl HeroView {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>, image: Option<&Image>) -> Self {
        let title = title.into();
        let image = image.map(|image| ImageView::from_image(image, &title));
        Self {
            title,
            description: description.into(),
            image,
        }
    }

    /// Hero for a single collection.
    #[must_use]
    pub fn from_collection(collection: &Collection) -> Self {
        Self::new(
            collection.title.clone(),
            collection.description.clone(),
            collection.image.as_ref(),
        )
    }
}

/// Home page banner promoting one collection.
#[derive(Debug, Clone)]
pub struct FeaturedCollectionView {
    /// `SHOP OUR <TITLE>`.
    pub heading: String,
    pub url: String,
    pub image: Option<ImageView>,
}

impl FeaturedCollectionView {
    #[must_use]
    pub fn from_collection(collection: &Collection) -> Self {
        Self {
            heading: format!("SHOP OUR {}", collection.title.to_uppercase()),
            url: format!("/collections/{}", collection.handle),
            image: collection
                .image
                .as_ref()
                .map(|image| ImageView::from_image(image, &collection.title)),
        }
    }

    #[must_use]
    pub const fn button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Large, ButtonVariant::Secondary)
    }
}

// =============================================================================
// Page Layout
// =============================================================================

/// Everything `base.html` needs around a page's content.
#[derive(Debug, Clone)]
pub struct LayoutView {
    /// Document title (`Highland HQ | Home`).
    pub title: String,
    /// CSP nonce for inline and external script tags.
    pub nonce: String,
    pub header: HeaderView,
    pub footer: FooterView,
    pub cart_drawer: DrawerView,
    pub search_drawer: DrawerView,
    pub menu_drawer: DrawerView,
}

impl LayoutView {
    #[must_use]
    pub fn new(title: String, nonce: &CspNonce, navigation: Navigation) -> Self {
        Self {
            title,
            nonce: nonce.value().to_string(),
            header: navigation.header,
            footer: navigation.footer,
            cart_drawer: DrawerView::new(
                "cart-drawer",
                DrawerPosition::Right,
                "Cart",
                "Items in your cart",
            ),
            search_drawer: DrawerView::new(
                "search-drawer",
                DrawerPosition::Right,
                "Search",
                "Search the store",
            ),
            menu_drawer: DrawerView::new(
                "menu-drawer",
                DrawerPosition::Left,
                "Menu",
                "Site navigation",
            ),
        }
    }
}
