//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Cart IDs are stored in the session and mapped to Shopify carts. All
//! mutations go through one action endpoint, `POST /cart`, which answers HTMX
//! requests with the re-rendered cart and plain form posts with a redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{OriginalUri, State},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::cart::{
    CartAction, CartActionForm, CartLayout, CartView, clear_cart_id, get_cart_id, set_cart_id,
};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::shopify::{Cart, CartLineInput, CartLineUpdateInput};
use crate::state::AppState;
use crate::views::LayoutView;

/// Event fired after every successful cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Extra event fired after lines were added (shows the "added" toast).
pub const CART_ADDED_EVENT: &str = "cart-added";

/// Extra event fired when a mutation came from outside the drawer, so the
/// drawer re-fetches its contents. Drawer mutations swap in their own result.
pub const CART_DRAWER_STALE_EVENT: &str = "cart-drawer-stale";

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutView,
    pub cart: CartView,
}

/// Cart contents fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_main.html")]
pub struct CartMainTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: i64,
}

/// Fetch the session's cart.
///
/// A cart Shopify no longer knows is dropped from the session. Read failures
/// are logged and rendered as an empty cart.
async fn load_cart(state: &AppState, session: &Session) -> Option<Cart> {
    let cart_id = get_cart_id(session).await?;

    match state.storefront().get_cart(&cart_id).await {
        Ok(Some(cart)) => Some(cart),
        Ok(None) => {
            tracing::info!(cart_id = %cart_id, "Cart no longer exists, forgetting it");
            if let Err(e) = clear_cart_id(session).await {
                tracing::warn!("Failed to clear cart ID from session: {e}");
            }
            None
        }
        Err(e) => {
            tracing::warn!("Failed to fetch cart {cart_id}: {e}");
            None
        }
    }
}

/// Display cart page.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    session: Session,
    nonce: CspNonce,
) -> CartShowTemplate {
    let (layout, cart) = tokio::join!(
        super::page_layout(&state, uri.path(), "Cart", &nonce),
        load_cart(&state, &session),
    );

    CartShowTemplate {
        layout,
        cart: CartView::new(cart.as_ref(), CartLayout::Page),
    }
}

/// Cart drawer contents (HTMX).
#[instrument(skip(state, session))]
pub async fn aside(State(state): State<AppState>, session: Session) -> CartMainTemplate {
    let cart = load_cart(&state, &session).await;

    CartMainTemplate {
        cart: CartView::new(cart.as_ref(), CartLayout::Aside),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> CartCountTemplate {
    let count = load_cart(&state, &session)
        .await
        .map_or(0, |cart| cart.total_quantity);

    CartCountTemplate { count }
}

/// Apply a cart action.
///
/// Adding to a visitor's first cart creates it. Other actions on a visitor
/// without a cart render the empty cart.
#[instrument(skip(state, session, headers, form))]
pub async fn action(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartActionForm>,
) -> Result<Response> {
    let action = CartAction::from_form(&form)?;
    let layout = CartLayout::from_form(form.layout.as_deref());
    add_breadcrumb("cart", action.name(), Some(&[("layout", layout.as_str())]));

    let storefront = state.storefront();
    let added = matches!(action, CartAction::LinesAdd { .. });

    let cart = match (action, get_cart_id(&session).await) {
        (
            CartAction::LinesAdd {
                merchandise_id,
                quantity,
            },
            cart_id,
        ) => {
            let lines = vec![CartLineInput {
                merchandise_id,
                quantity,
            }];
            let cart = match cart_id {
                Some(cart_id) => storefront.add_lines(&cart_id, lines).await?,
                None => {
                    let cart = storefront.create_cart(lines).await?;
                    set_cart_id(&session, &cart.id).await?;
                    tracing::info!(cart_id = %cart.id, "Created cart");
                    cart
                }
            };
            Some(cart)
        }
        (CartAction::LinesUpdate { line_id, quantity }, Some(cart_id)) => Some(
            storefront
                .update_lines(
                    &cart_id,
                    vec![CartLineUpdateInput {
                        id: line_id,
                        quantity,
                    }],
                )
                .await?,
        ),
        (CartAction::LinesRemove { line_ids }, Some(cart_id)) => {
            Some(storefront.remove_lines(&cart_id, line_ids).await?)
        }
        (CartAction::DiscountCodesUpdate { codes }, Some(cart_id)) => {
            Some(storefront.update_discount_codes(&cart_id, codes).await?)
        }
        (_, None) => None,
    };

    if !super::is_htmx(&headers) {
        return Ok(Redirect::to("/cart").into_response());
    }

    let mut events = vec![CART_UPDATED_EVENT];
    if !layout.is_aside() {
        events.push(CART_DRAWER_STALE_EVENT);
    }
    if added {
        events.push(CART_ADDED_EVENT);
    }
    let trigger = events.join(", ");

    Ok((
        AppendHeaders([("HX-Trigger", trigger)]),
        CartMainTemplate {
            cart: CartView::new(cart.as_ref(), layout),
        },
    )
        .into_response())
}

/// Redirect to Shopify checkout.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Redirect {
    load_cart(&state, &session)
        .await
        .and_then(|cart| cart.checkout_url)
        .map_or_else(|| Redirect::to("/cart"), |url| Redirect::to(&url))
}
