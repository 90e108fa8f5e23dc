//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                         - Home page
//! GET  /fragments/recommended-products          - Recommended products (deferred, HTMX)
//! GET  /health                                   - Liveness check
//!
//! # Collections
//! GET  /collections                              - Collection index
//! GET  /collections/all[/{tag}]                  - Shop All catalog, optionally by tag
//! GET  /collections/{handles}[/{tag}[/{extra}]]  - One collection, or several comma-separated
//!
//! # Products
//! GET  /products/{handle}                        - Product detail (?Option=Value preselects a variant)
//!
//! # Cart
//! GET  /cart                                     - Cart page
//! GET  /cart/aside                               - Cart drawer fragment (HTMX)
//! GET  /cart/count                               - Cart count badge fragment (HTMX)
//! POST /cart                                     - Cart action endpoint (rate limited)
//! GET  /checkout                                 - Redirect to Shopify checkout
//!
//! # Search
//! GET  /search?q=                                - Search results page
//! GET  /search/predictive?q=                     - Search drawer results fragment (HTMX)
//! ```

pub mod cart;
pub mod collections;
pub mod home;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{CspNonce, cart_rate_limiter};
use crate::navigation::Navigation;
use crate::state::AppState;
use crate::views::LayoutView;

/// Header value that HTMX sends with every request it makes.
pub const HX_REQUEST: &str = "hx-request";

/// Build the page chrome for a full page render.
///
/// `page` is the title suffix (`Highland HQ | <page>`).
pub async fn page_layout(state: &AppState, path: &str, page: &str, nonce: &CspNonce) -> LayoutView {
    let navigation = Navigation::load(state, path).await;
    LayoutView::new(state.config().site.page_title(page), nonce, navigation)
}

/// Whether a request was made by HTMX rather than a plain navigation.
#[must_use]
pub fn is_htmx(headers: &axum::http::HeaderMap) -> bool {
    headers.contains_key(HX_REQUEST)
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index))
        .route("/all", get(collections::all))
        .route("/all/{tag}", get(collections::all_tagged))
        .route("/{handles}", get(collections::show))
        .route("/{handles}/{tag}", get(collections::show))
        .route("/{handles}/{tag}/{additional}", get(collections::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new().route("/{handle}", get(products::show))
}

/// Create the cart routes router.
///
/// Only the action endpoint is rate limited; reads are served freely.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(cart::action).layer(cart_rate_limiter()))
        .route("/", get(cart::show))
        .route("/aside", get(cart::aside))
        .route("/count", get(cart::count))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search::index))
        .route("/predictive", get(search::predictive))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        .route(
            "/fragments/recommended-products",
            get(home::recommended_products),
        )
        .route("/health", get(health))
        // Collection routes
        .nest("/collections", collection_routes())
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout redirect
        .route("/checkout", get(cart::checkout))
        // Search routes
        .nest("/search", search_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify.
async fn health() -> &'static str {
    "ok"
}
