//! Route tests for the cart: the action endpoint, drawer, badge and checkout.

mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use common::{CLIENT_IP, TestApp};

const LAKE_TEE_SMALL: &str = "gid://shopify/ProductVariant/11";
const PINE_FLANNEL: &str = "gid://shopify/ProductVariant/200";

/// Line IDs in a rendered cart, in order.
fn line_ids(body: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for rest in body.split(r#"name="line_id" value=""#).skip(1) {
        let id = rest.split('"').next().unwrap_or_default().to_string();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

async fn add(app: &TestApp, variant: &str) -> String {
    let response = app
        .cart_action(&[
            ("cart_action", "LinesAdd"),
            ("merchandise_id", variant),
            ("quantity", "1"),
        ])
        .await;
    response.assert_status_ok();
    response.text()
}

// =============================================================================
// Reading the cart
// =============================================================================

#[tokio::test]
async fn test_empty_cart_page() {
    let app = TestApp::new().await;

    let response = app.get("/cart").await;
    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("<title>Highland HQ | Cart</title>"));
    assert!(body.contains("Your Cart Is Empty!"));
    assert!(body.contains("Continue shopping &rarr;"));
    assert!(!body.contains("cart-summary"));
    assert_eq!(app.calls("Cart"), 0, "no cart in session, nothing to fetch");
}

#[tokio::test]
async fn test_empty_cart_count() {
    let app = TestApp::new().await;

    let response = app.htmx_get("/cart/count").await;
    response.assert_status_ok();
    assert!(!response.text().contains("cart-count-badge"));
}

#[tokio::test]
async fn test_cart_aside_layout() {
    let app = TestApp::new().await;
    add(&app, LAKE_TEE_SMALL).await;

    let body = app.htmx_get("/cart/aside").await.text();

    assert!(body.contains(r#"id="cart-main-aside""#));
    assert!(body.contains(r##"hx-target="#cart-main-aside""##));
    assert!(body.contains(r#"<input type="hidden" name="layout" value="aside">"#));
    assert!(body.contains("data-drawer-close"));
    assert!(!body.contains("<html"), "drawer contents are a fragment");
}

// =============================================================================
// Adding
// =============================================================================

#[tokio::test]
async fn test_first_add_creates_cart() {
    let app = TestApp::new().await;

    let response = app
        .cart_action(&[
            ("cart_action", "LinesAdd"),
            ("merchandise_id", LAKE_TEE_SMALL),
            ("quantity", "1"),
        ])
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.header("hx-trigger"),
        "cart-updated, cart-drawer-stale, cart-added"
    );

    let body = response.text();
    assert!(body.contains("Your Cart Items"));
    assert!(body.contains("Lake Tee"));
    assert!(body.contains(r#"<p class="cart-line-options">Small</p>"#));
    assert!(body.contains("Quantity: 1"));
    assert!(body.contains("disabled>&minus;</button>"), "decrease is disabled at 1");
    assert!(body.contains(r#"name="quantity" value="2""#));
    assert!(body.contains(r#"href="https://highland-hq.myshopify.com/cart/c/"#));
    assert!(body.contains("Continue to Checkout"));
    assert_eq!(app.calls("CartCreate"), 1);
    assert_eq!(app.last_variables("CartCreate")["input"]["lines"][0]["quantity"], 1);

    let count = app.htmx_get("/cart/count").await.text();
    assert!(count.contains(r#"<span class="cart-count-badge">1</span>"#));
}

#[tokio::test]
async fn test_second_add_reuses_cart() {
    let app = TestApp::new().await;
    add(&app, LAKE_TEE_SMALL).await;

    let body = add(&app, LAKE_TEE_SMALL).await;

    assert!(body.contains("Quantity: 2"));
    assert!(!body.contains("disabled>&minus;</button>"));
    assert!(body.contains(r#"name="quantity" value="1""#));
    assert_eq!(app.calls("CartCreate"), 1);
    assert_eq!(app.calls("CartLinesAdd"), 1);

    let body = add(&app, PINE_FLANNEL).await;
    assert_eq!(line_ids(&body).len(), 2);
    assert!(body.contains("Pine Flannel"));
    assert!(body.contains("$120.00"), "subtotal is 2 x $28 + $64");

    let count = app.htmx_get("/cart/count").await.text();
    assert!(count.contains(">3</span>"));
}

#[tokio::test]
async fn test_cart_page_after_add() {
    let app = TestApp::new().await;
    add(&app, PINE_FLANNEL).await;

    let body = app.get("/cart").await.text();

    assert!(body.contains(r#"id="cart-main-page""#));
    assert!(body.contains("Pine Flannel"));
    assert!(body.contains("<dt>Subtotal</dt>"));
    assert!(body.contains("$64.00"));
    assert!(body.contains(
        r#"<p class="cart-summary-note">Tax and Shipping Calculated at Checkout.</p>"#
    ));
    assert!(body.contains(r#"data-cart-main aria-busy="false""#));
    assert!(body.contains(r#"hx-disabled-elt="find button""#));
}

#[tokio::test]
async fn test_add_failure_is_an_error() {
    let app = TestApp::new().await;
    app.fail("CartCreate");

    let response = app
        .cart_action(&[("cart_action", "LinesAdd"), ("merchandise_id", LAKE_TEE_SMALL)])
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);

    let count = app.htmx_get("/cart/count").await.text();
    assert!(!count.contains("cart-count-badge"));
}

// =============================================================================
// Updating and removing
// =============================================================================

#[tokio::test]
async fn test_update_line_quantity() {
    let app = TestApp::new().await;
    let body = add(&app, LAKE_TEE_SMALL).await;
    let line_id = line_ids(&body).remove(0);

    let response = app
        .cart_action(&[
            ("cart_action", "LinesUpdate"),
            ("line_id", line_id.as_str()),
            ("quantity", "3"),
            ("layout", "page"),
        ])
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("hx-trigger"), "cart-updated, cart-drawer-stale");

    let body = response.text();
    assert!(body.contains("Quantity: 3"));
    assert_eq!(app.last_variables("CartLinesUpdate")["lines"][0]["id"], line_id.as_str());
    assert_eq!(app.last_variables("CartLinesUpdate")["lines"][0]["quantity"], 3);
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let app = TestApp::new().await;
    let body = add(&app, LAKE_TEE_SMALL).await;
    let line_id = line_ids(&body).remove(0);

    let body = app
        .cart_action(&[
            ("cart_action", "LinesUpdate"),
            ("line_id", line_id.as_str()),
            ("quantity", "0"),
        ])
        .await
        .text();

    assert!(body.contains("Your Cart Is Empty!"));
    assert!(body.contains("Continue shopping"));
    assert_eq!(app.calls("CartLinesUpdate"), 0);
    assert_eq!(app.calls("CartLinesRemove"), 1);
}

#[tokio::test]
async fn test_remove_line() {
    let app = TestApp::new().await;
    add(&app, LAKE_TEE_SMALL).await;
    let body = add(&app, PINE_FLANNEL).await;
    let ids = line_ids(&body);

    let body = app
        .cart_action(&[("cart_action", "LinesRemove"), ("line_id", ids[0].as_str())])
        .await
        .text();

    assert!(!body.contains("Lake Tee"));
    assert!(body.contains("Pine Flannel"));
    assert_eq!(line_ids(&body), vec![ids[1].clone()]);
}

// =============================================================================
// Discount codes
// =============================================================================

#[tokio::test]
async fn test_discount_codes() {
    let app = TestApp::new().await;
    add(&app, LAKE_TEE_SMALL).await;

    let body = app
        .cart_action(&[
            ("cart_action", "DiscountCodesUpdate"),
            ("discount_codes", ""),
            ("discount_code", " SUMMER "),
        ])
        .await
        .text();
    assert!(body.contains("<code>SUMMER</code>"));
    assert!(body.contains(r#"name="discount_codes" value="SUMMER""#));

    // Duplicates are dropped; non-applicable codes aren't shown
    let body = app
        .cart_action(&[
            ("cart_action", "DiscountCodesUpdate"),
            ("discount_codes", "SUMMER"),
            ("discount_code", "summer"),
        ])
        .await
        .text();
    assert_eq!(
        app.last_variables("CartDiscountCodesUpdate")["discountCodes"],
        serde_json::json!(["SUMMER"])
    );
    assert!(body.contains("<code>SUMMER</code>"));

    let body = app
        .cart_action(&[
            ("cart_action", "DiscountCodesUpdate"),
            ("discount_codes", "SUMMER"),
            ("discount_code", "EXPIRED"),
        ])
        .await
        .text();
    assert!(body.contains("<code>SUMMER</code>"));
    assert!(!body.contains("EXPIRED"));

    // The removal form posts an empty list
    let body = app
        .cart_action(&[("cart_action", "DiscountCodesUpdate"), ("discount_codes", "")])
        .await
        .text();
    assert!(!body.contains("cart-discounts"));
    assert_eq!(
        app.last_variables("CartDiscountCodesUpdate")["discountCodes"],
        serde_json::json!([])
    );
}

// =============================================================================
// Protocol edge cases
// =============================================================================

#[tokio::test]
async fn test_plain_form_post_redirects_to_cart() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/cart")
        .add_header(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static(CLIENT_IP),
        )
        .form(&[
            ("cart_action", "LinesAdd"),
            ("merchandise_id", LAKE_TEE_SMALL),
        ])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/cart");
    assert!(!response.headers().contains_key("hx-trigger"));
    assert!(app.get("/cart").await.text().contains("Lake Tee"));
}

#[tokio::test]
async fn test_post_without_proxy_headers_keys_on_peer_address() {
    let app = TestApp::new().await;

    let response = app
        .direct_cart_action(&[
            ("cart_action", "LinesAdd"),
            ("merchandise_id", LAKE_TEE_SMALL),
        ])
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Lake Tee"));
    assert_eq!(app.calls("CartCreate"), 1);
}

#[tokio::test]
async fn test_drawer_mutation_does_not_refetch_drawer() {
    let app = TestApp::new().await;
    let body = add(&app, LAKE_TEE_SMALL).await;
    let line_id = line_ids(&body).remove(0);

    let response = app
        .cart_action(&[
            ("cart_action", "LinesUpdate"),
            ("line_id", line_id.as_str()),
            ("quantity", "2"),
            ("layout", "aside"),
        ])
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("hx-trigger"), "cart-updated");
    assert!(response.text().contains(r#"id="cart-main-aside""#));

    let page = app.get("/cart").await.text();
    assert!(page.contains(r#"hx-get="/cart/aside" hx-trigger="load, cart-drawer-stale from:body""#));
    assert!(page.contains(r#"hx-get="/cart/count" hx-trigger="load, cart-updated from:body""#));
}

#[tokio::test]
async fn test_invalid_actions_are_bad_requests() {
    let app = TestApp::new().await;

    let cases: &[&[(&str, &str)]] = &[
        &[("merchandise_id", LAKE_TEE_SMALL)],
        &[("cart_action", "BuyerIdentityUpdate")],
        &[("cart_action", "LinesAdd")],
        &[("cart_action", "LinesAdd"), ("merchandise_id", "gid://shopify/Product/1")],
        &[
            ("cart_action", "LinesAdd"),
            ("merchandise_id", LAKE_TEE_SMALL),
            ("quantity", "two"),
        ],
        &[
            ("cart_action", "LinesAdd"),
            ("merchandise_id", LAKE_TEE_SMALL),
            ("quantity", "0"),
        ],
        &[("cart_action", "LinesUpdate"), ("quantity", "2")],
        &[
            ("cart_action", "LinesUpdate"),
            ("line_id", "gid://shopify/CartLine/1"),
            ("quantity", "-1"),
        ],
        &[("cart_action", "LinesRemove"), ("line_id", "line-1")],
    ];

    for form in cases {
        let response = app.cart_action(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().starts_with("Bad request: "));
    }

    assert_eq!(app.calls("CartCreate"), 0);
}

#[tokio::test]
async fn test_mutation_without_cart_renders_empty_cart() {
    let app = TestApp::new().await;

    let response = app
        .cart_action(&[
            ("cart_action", "LinesUpdate"),
            ("line_id", "gid://shopify/CartLine/9?cart=test"),
            ("quantity", "2"),
        ])
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Your Cart Is Empty!"));
    assert_eq!(app.calls("CartLinesUpdate"), 0);
    assert_eq!(app.calls("CartCreate"), 0);
}

#[tokio::test]
async fn test_expired_cart_is_forgotten() {
    let app = TestApp::new().await;
    add(&app, LAKE_TEE_SMALL).await;
    app.shop().expire_carts();

    let body = app.get("/cart").await.text();
    assert!(body.contains("Your Cart Is Empty!"));
    let lookups = app.calls("Cart");

    let count = app.htmx_get("/cart/count").await.text();
    assert!(!count.contains("cart-count-badge"));
    assert_eq!(app.calls("Cart"), lookups, "the session no longer holds a cart");

    // The next add starts a fresh cart
    let body = add(&app, PINE_FLANNEL).await;
    assert!(body.contains("Pine Flannel"));
    assert_eq!(app.calls("CartCreate"), 2);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_without_cart_redirects_to_cart_page() {
    let app = TestApp::new().await;

    let response = app.get("/checkout").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/cart");
}

#[tokio::test]
async fn test_checkout_redirects_to_shopify() {
    let app = TestApp::new().await;
    add(&app, LAKE_TEE_SMALL).await;

    let response = app.get("/checkout").await;
    response.assert_status(StatusCode::SEE_OTHER);

    let location = response.header("location");
    let location = location.to_str().expect("location should be ASCII");
    assert!(location.starts_with("https://highland-hq.myshopify.com/cart/c/"));
}
