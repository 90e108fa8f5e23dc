//! Cart session state, the cart action form protocol, and cart view models.
//!
//! The visitor's cart lives in Shopify; the session only remembers its ID.
//! Every cart form posts to `POST /cart` with a `cart_action` field naming
//! the mutation. The cart Shopify returns is the only state ever rendered.

use highland_core::{CartGid, CartLineGid, VariantGid};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::AppError;
use crate::shopify::{Cart, CartLine};
use crate::views::{ButtonClass, ButtonSize, ButtonVariant, ImageView, variant_url};

/// Session key holding the visitor's cart ID.
pub const CART_ID_KEY: &str = "cart_id";

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart ID from the session.
///
/// Unreadable or malformed values are treated as "no cart".
pub async fn get_cart_id(session: &Session) -> Option<CartGid> {
    session.get::<CartGid>(CART_ID_KEY).await.ok().flatten()
}

/// Remember the cart ID in the session.
pub async fn set_cart_id(
    session: &Session,
    cart_id: &CartGid,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(CART_ID_KEY, cart_id).await
}

/// Forget the cart, e.g. after Shopify stopped recognizing it.
pub async fn clear_cart_id(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CartGid>(CART_ID_KEY).await.map(|_| ())
}

// =============================================================================
// Cart Actions
// =============================================================================

/// Raw cart form as posted by the browser.
#[derive(Debug, Default, Deserialize)]
pub struct CartActionForm {
    pub cart_action: Option<String>,
    pub merchandise_id: Option<String>,
    pub quantity: Option<String>,
    pub line_id: Option<String>,
    /// Code typed into the discount input.
    pub discount_code: Option<String>,
    /// Codes already on the cart, comma-joined.
    pub discount_codes: Option<String>,
    /// Which cart rendering to respond with (`page` or `aside`).
    pub layout: Option<String>,
}

/// A validated cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    LinesAdd {
        merchandise_id: VariantGid,
        quantity: i64,
    },
    LinesUpdate {
        line_id: CartLineGid,
        quantity: i64,
    },
    LinesRemove {
        line_ids: Vec<CartLineGid>,
    },
    DiscountCodesUpdate {
        codes: Vec<String>,
    },
}

impl CartAction {
    /// Validate a posted cart form.
    ///
    /// Updating a line to quantity 0 removes it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an unknown action, a missing or
    /// malformed ID, or an invalid quantity.
    pub fn from_form(form: &CartActionForm) -> Result<Self, AppError> {
        match form.cart_action.as_deref() {
            Some("LinesAdd") => {
                let merchandise_id =
                    VariantGid::parse(required(form.merchandise_id.as_deref(), "merchandise_id")?)
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let quantity = parse_quantity(form.quantity.as_deref(), 1)?;
                if quantity < 1 {
                    return Err(AppError::BadRequest("quantity must be at least 1".to_string()));
                }
                Ok(Self::LinesAdd {
                    merchandise_id,
                    quantity,
                })
            }
            Some("LinesUpdate") => {
                let line_id = parse_line_id(form.line_id.as_deref())?;
                let quantity = parse_quantity(form.quantity.as_deref(), 1)?;
                if quantity < 0 {
                    return Err(AppError::BadRequest("quantity must not be negative".to_string()));
                }
                if quantity == 0 {
                    return Ok(Self::LinesRemove {
                        line_ids: vec![line_id],
                    });
                }
                Ok(Self::LinesUpdate { line_id, quantity })
            }
            Some("LinesRemove") => Ok(Self::LinesRemove {
                line_ids: vec![parse_line_id(form.line_id.as_deref())?],
            }),
            Some("DiscountCodesUpdate") => Ok(Self::DiscountCodesUpdate {
                codes: merge_discount_codes(
                    form.discount_codes.as_deref().unwrap_or_default(),
                    form.discount_code.as_deref(),
                ),
            }),
            Some(other) => Err(AppError::BadRequest(format!("unknown cart action: {other}"))),
            None => Err(AppError::BadRequest("missing cart_action".to_string())),
        }
    }

    /// Action name, for logs and breadcrumbs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LinesAdd { .. } => "LinesAdd",
            Self::LinesUpdate { .. } => "LinesUpdate",
            Self::LinesRemove { .. } => "LinesRemove",
            Self::DiscountCodesUpdate { .. } => "DiscountCodesUpdate",
        }
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("missing {field}")))
}

fn parse_line_id(value: Option<&str>) -> Result<CartLineGid, AppError> {
    CartLineGid::parse(required(value, "line_id")?).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_quantity(value: Option<&str>, default: i64) -> Result<i64, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid quantity: {raw}"))),
    }
}

/// Combine the cart's existing codes with a newly entered one.
///
/// Codes are trimmed, empties dropped, and duplicates removed
/// case-insensitively, keeping the first spelling.
#[must_use]
pub fn merge_discount_codes(existing: &str, new_code: Option<&str>) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();

    for code in existing.split(',').chain(new_code) {
        let code = code.trim();
        if code.is_empty() || codes.iter().any(|c| c.eq_ignore_ascii_case(code)) {
            continue;
        }
        codes.push(code.to_string());
    }

    codes
}

// =============================================================================
// Views
// =============================================================================

/// Where the cart is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CartLayout {
    /// The `/cart` page.
    #[default]
    Page,
    /// The slide-in cart drawer.
    Aside,
}

impl CartLayout {
    /// Parse the form's `layout` field; anything but `aside` is the page.
    #[must_use]
    pub fn from_form(value: Option<&str>) -> Self {
        match value {
            Some("aside") => Self::Aside,
            _ => Self::Page,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Aside => "aside",
        }
    }

    #[must_use]
    pub const fn is_aside(self) -> bool {
        matches!(self, Self::Aside)
    }
}

/// Quantity stepper state for one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityControls {
    pub quantity: i64,
    /// Quantity submitted by the decrease button.
    pub prev: i64,
    /// Quantity submitted by the increase button.
    pub next: i64,
    /// A line can't go below 1 with the stepper; removing is explicit.
    pub decrease_disabled: bool,
}

impl QuantityControls {
    #[must_use]
    pub fn new(quantity: i64) -> Self {
        Self {
            quantity,
            prev: (quantity - 1).max(0),
            next: quantity + 1,
            decrease_disabled: quantity <= 1,
        }
    }

    #[must_use]
    pub const fn button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Small, ButtonVariant::Outline)
    }

    #[must_use]
    pub const fn remove_button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Small, ButtonVariant::Ghost)
    }
}

/// One cart line.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub id: String,
    pub product_title: String,
    /// Selected option values joined by ` / `.
    pub options: String,
    pub url: String,
    pub image: Option<ImageView>,
    pub total: String,
    pub controls: QuantityControls,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let variant = &line.merchandise;
        Self {
            id: line.id.to_string(),
            product_title: variant.product_title.clone(),
            options: variant
                .selected_options
                .iter()
                .map(|option| option.value.as_str())
                .collect::<Vec<_>>()
                .join(" / "),
            url: variant_url(&variant.product_handle, &variant.selected_options),
            image: variant
                .image
                .as_ref()
                .map(|image| ImageView::from_image(image, &variant.title)),
            total: line.total_amount.formatted(),
            controls: QuantityControls::new(line.quantity),
        }
    }
}

/// Totals, discounts and checkout link.
#[derive(Debug, Clone)]
pub struct CartSummaryView {
    /// Formatted subtotal, `-` when Shopify reports none.
    pub subtotal: String,
    /// Applicable discount codes.
    pub discount_codes: Vec<String>,
    pub checkout_url: Option<String>,
}

impl CartSummaryView {
    /// Applicable codes joined for display (`SUMMER, WELCOME10`).
    #[must_use]
    pub fn discount_list(&self) -> String {
        self.discount_codes.join(", ")
    }

    /// Existing codes as posted back by the discount form.
    #[must_use]
    pub fn discount_codes_field(&self) -> String {
        self.discount_codes.join(",")
    }

    #[must_use]
    pub const fn checkout_button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Large, ButtonVariant::Primary)
    }

    #[must_use]
    pub const fn apply_button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Medium, ButtonVariant::Secondary)
    }

    #[must_use]
    pub const fn remove_button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Small, ButtonVariant::Ghost)
    }
}

impl From<&Cart> for CartSummaryView {
    fn from(cart: &Cart) -> Self {
        Self {
            subtotal: cart
                .cost
                .subtotal_amount
                .as_ref()
                .filter(|money| !money.amount.is_empty())
                .map_or_else(|| "-".to_string(), crate::shopify::Money::formatted),
            discount_codes: cart
                .applicable_discount_codes()
                .into_iter()
                .map(str::to_string)
                .collect(),
            checkout_url: cart.checkout_url.clone(),
        }
    }
}

/// The whole cart, as rendered on the cart page or in the drawer.
#[derive(Debug, Clone)]
pub struct CartView {
    pub layout: CartLayout,
    pub lines: Vec<CartLineView>,
    /// Present only when the cart holds at least one item.
    pub summary: Option<CartSummaryView>,
    pub total_quantity: i64,
}

impl CartView {
    /// Build the view for an optional cart.
    #[must_use]
    pub fn new(cart: Option<&Cart>, layout: CartLayout) -> Self {
        let Some(cart) = cart else {
            return Self::empty(layout);
        };

        Self {
            layout,
            lines: cart.lines.iter().map(CartLineView::from).collect(),
            summary: (cart.total_quantity > 0).then(|| CartSummaryView::from(cart)),
            total_quantity: cart.total_quantity,
        }
    }

    /// A cart with nothing in it.
    #[must_use]
    pub const fn empty(layout: CartLayout) -> Self {
        Self {
            layout,
            lines: Vec::new(),
            summary: None,
            total_quantity: 0,
        }
    }

    #[must_use]
    pub const fn has_items(&self) -> bool {
        self.total_quantity > 0
    }

    #[must_use]
    pub const fn heading(&self) -> &'static str {
        if self.has_items() {
            "Your Cart Items"
        } else {
            "Your Cart Is Empty!"
        }
    }

    /// Whether to show the "Continue shopping" empty state.
    #[must_use]
    pub fn show_empty_state(&self) -> bool {
        self.lines.is_empty()
    }

    /// Class of the empty state's "Continue shopping" link.
    #[must_use]
    pub const fn continue_button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Medium, ButtonVariant::Outline)
    }
}
