//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean API separate from the wire structs in
//! `storefront::queries`, which mirror the GraphQL response shapes.

use highland_core::{CartGid, CartLineGid, CollectionGid, Price, ProductGid, VariantGid};
use serde::{Deserialize, Serialize};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Parse into a typed [`Price`].
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        Price::parse(&self.amount, &self.currency_code).ok()
    }

    /// Format for display (`$19.99`), falling back to the raw amount.
    #[must_use]
    pub fn formatted(&self) -> String {
        self.price().map_or_else(
            || format!("{} {}", self.amount, self.currency_code),
            |price| price.to_string(),
        )
    }
}

// =============================================================================
// Image Types
// =============================================================================

/// Product, variant or collection image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantGid,
    pub title: String,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOption>,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub image: Option<Image>,
    /// Handle of the parent product, used to build variant URLs.
    pub product_handle: String,
    /// Title of the parent product.
    pub product_title: String,
}

/// A product.
///
/// Listing queries (grids, search) fill the summary fields only: `images`,
/// `options` and `selected_variant` are empty and `variants` holds at most
/// the first variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductGid,
    pub handle: String,
    pub title: String,
    pub vendor: String,
    /// Plain text description.
    pub description: String,
    /// Description as HTML, rendered unescaped on the product page.
    pub description_html: String,
    pub featured_image: Option<Image>,
    pub images: Vec<Image>,
    pub options: Vec<ProductOption>,
    /// Lowest variant price.
    pub min_price: Money,
    /// Variant matching the requested options, if any.
    pub selected_variant: Option<ProductVariant>,
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Options of the first variant, used to link grid items to a concrete variant.
    #[must_use]
    pub fn first_variant_options(&self) -> &[SelectedOption] {
        self.variants
            .first()
            .map_or(&[], |variant| variant.selected_options.as_slice())
    }
}

/// Filter applied to a collection's product list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductFilter {
    /// Only products carrying this tag.
    Tag(String),
}

impl ProductFilter {
    /// The filter as a Storefront search query (`tag:"summer sale"`).
    #[must_use]
    pub fn search_query(&self) -> String {
        match self {
            Self::Tag(tag) => {
                let escaped = tag.replace('\\', "\\\\").replace('"', "\\\"");
                format!("tag:\"{escaped}\"")
            }
        }
    }
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Cursor pagination state returned with a connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// One page of products.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page_info: PageInfo,
}

// =============================================================================
// Collection Types
// =============================================================================

/// A product collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionGid,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<Image>,
}

/// A collection together with one page of its products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionPage {
    pub collection: Collection,
    pub products: ProductPage,
}

// =============================================================================
// Navigation Types
// =============================================================================

/// A navigation menu configured in the Shopify admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Menu {
    pub id: String,
    pub items: Vec<MenuItem>,
}

/// A menu entry. `url` is absolute as returned by Shopify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub items: Vec<MenuItem>,
}

/// Shop-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    /// Primary domain URL (e.g., `https://highlandhq.com`).
    pub primary_domain_url: String,
}

/// Data shared by every page: shop metadata plus header and footer menus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub shop: Shop,
    pub header_menu: Option<Menu>,
    pub footer_menu: Option<Menu>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartGid,
    /// Hosted checkout URL.
    pub checkout_url: Option<String>,
    pub total_quantity: i64,
    pub cost: CartCost,
    pub discount_codes: Vec<CartDiscountCode>,
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Codes that currently apply to the cart.
    #[must_use]
    pub fn applicable_discount_codes(&self) -> Vec<&str> {
        self.discount_codes
            .iter()
            .filter(|code| code.applicable)
            .map(|code| code.code.as_str())
            .collect()
    }
}

/// Cart totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartCost {
    pub subtotal_amount: Option<Money>,
    pub total_amount: Option<Money>,
}

/// A discount code entered on the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartDiscountCode {
    pub code: String,
    /// Whether the code applies to the current cart contents.
    pub applicable: bool,
}

/// A product-variant-plus-quantity entry in a cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineGid,
    pub quantity: i64,
    /// Line total after discounts.
    pub total_amount: Money,
    pub merchandise: ProductVariant,
}

/// Input for adding a line to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineInput {
    pub merchandise_id: VariantGid,
    pub quantity: i64,
}

/// Input for changing the quantity of an existing cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineUpdateInput {
    pub id: CartLineGid,
    pub quantity: i64,
}
