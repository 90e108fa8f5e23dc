//! Shared harness for storefront route tests.
//!
//! Routes are exercised against an in-process fake of the Shopify Storefront
//! GraphQL API: an axum server on an ephemeral port that answers each
//! operation by name from a small in-memory catalog and cart store.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{ConnectInfo, Request};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Json, Router, extract::State, routing::post};
use axum_test::{TestRequest, TestServer};
use highland_storefront::config::{ShopifyStorefrontConfig, SiteConfig, StorefrontConfig};
use highland_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};

/// Client address sent with every request (the cart rate limiter keys on it).
pub const CLIENT_IP: &str = "203.0.113.7";

/// TCP peer address of every test request, as `main` records it with
/// `into_make_service_with_connect_info`.
pub const PEER_IP: [u8; 4] = [192, 0, 2, 10];

pub const FEATURED_HANDLE: &str = "august-collection";

// =============================================================================
// Catalog builders
// =============================================================================

pub fn money(amount: f64) -> Value {
    json!({ "amount": format!("{amount:.2}"), "currencyCode": "USD" })
}

pub fn image(url: &str, alt: Option<&str>) -> Value {
    json!({ "url": url, "altText": alt, "width": 800, "height": 1000 })
}

/// A product variant as the fake serves it.
#[derive(Debug, Clone)]
pub struct FakeVariant {
    pub id: String,
    pub title: String,
    pub available: bool,
    pub options: Vec<(String, String)>,
    pub price: f64,
    pub image: Option<Value>,
}

impl FakeVariant {
    pub fn new(id: u32, options: &[(&str, &str)], price: f64, available: bool) -> Self {
        Self {
            id: format!("gid://shopify/ProductVariant/{id}"),
            title: options
                .iter()
                .map(|(_, value)| *value)
                .collect::<Vec<_>>()
                .join(" / "),
            available,
            options: options
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect(),
            price,
            image: None,
        }
    }

    fn matches(&self, wanted: &[(String, String)]) -> bool {
        wanted.iter().all(|(name, value)| {
            self.options
                .iter()
                .any(|(n, v)| n.eq_ignore_ascii_case(name) && v.eq_ignore_ascii_case(value))
        })
    }

    fn to_json(&self, product: &FakeProduct) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "availableForSale": self.available,
            "selectedOptions": self.options.iter()
                .map(|(name, value)| json!({ "name": name, "value": value }))
                .collect::<Vec<_>>(),
            "price": money(self.price),
            "compareAtPrice": null,
            "image": self.image,
            "product": { "handle": product.handle, "title": product.title },
        })
    }
}

/// A product with its variants.
#[derive(Debug, Clone)]
pub struct FakeProduct {
    pub id: u32,
    pub handle: String,
    pub title: String,
    pub description_html: String,
    pub images: Vec<Value>,
    pub tags: Vec<String>,
    pub variants: Vec<FakeVariant>,
}

impl FakeProduct {
    pub fn new(id: u32, handle: &str, title: &str, variants: Vec<FakeVariant>) -> Self {
        Self {
            id,
            handle: handle.to_string(),
            title: title.to_string(),
            description_html: format!("<p>{title} description</p>"),
            images: vec![image(&format!("https://cdn.shopify.com/{handle}.jpg"), None)],
            tags: Vec::new(),
            variants,
        }
    }

    /// A one-variant product priced at `price`.
    pub fn simple(id: u32, handle: &str, title: &str, price: f64) -> Self {
        Self::new(
            id,
            handle,
            title,
            vec![FakeVariant::new(id * 100, &[("Title", "Default Title")], price, true)],
        )
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| (*tag).to_string()).collect();
        self
    }

    fn min_price(&self) -> f64 {
        self.variants
            .iter()
            .map(|variant| variant.price)
            .fold(f64::INFINITY, f64::min)
    }

    fn card_json(&self) -> Value {
        json!({
            "id": format!("gid://shopify/Product/{}", self.id),
            "handle": self.handle,
            "title": self.title,
            "featuredImage": self.images.first(),
            "priceRange": { "minVariantPrice": money(self.min_price()) },
            "variants": {
                "nodes": self.variants.first().map(|v| v.to_json(self)).into_iter().collect::<Vec<_>>()
            },
        })
    }

    fn detail_json(&self, selected: &[(String, String)]) -> Value {
        let mut option_names: Vec<String> = Vec::new();
        for variant in &self.variants {
            for (name, _) in &variant.options {
                if !option_names.contains(name) {
                    option_names.push(name.clone());
                }
            }
        }
        let options: Vec<Value> = option_names
            .iter()
            .map(|name| {
                let mut values: Vec<&str> = Vec::new();
                for variant in &self.variants {
                    for (n, v) in &variant.options {
                        if n == name && !values.contains(&v.as_str()) {
                            values.push(v);
                        }
                    }
                }
                json!({
                    "name": name,
                    "optionValues": values.iter().map(|v| json!({ "name": v })).collect::<Vec<_>>(),
                })
            })
            .collect();

        let selected_variant = if selected.is_empty() {
            Value::Null
        } else {
            self.variants
                .iter()
                .find(|variant| variant.matches(selected))
                .map_or(Value::Null, |variant| variant.to_json(self))
        };

        json!({
            "id": format!("gid://shopify/Product/{}", self.id),
            "handle": self.handle,
            "title": self.title,
            "vendor": "Highland HQ",
            "description": "",
            "descriptionHtml": self.description_html,
            "featuredImage": self.images.first(),
            "images": { "nodes": self.images },
            "options": options,
            "priceRange": { "minVariantPrice": money(self.min_price()) },
            "selectedVariant": selected_variant,
            "variants": {
                "nodes": self.variants.iter().map(|v| v.to_json(self)).collect::<Vec<_>>()
            },
        })
    }
}

/// A collection and the handles of its products.
#[derive(Debug, Clone)]
pub struct FakeCollection {
    pub id: u32,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub image: Option<Value>,
    pub products: Vec<String>,
    /// End cursor reported when the collection has a next page.
    pub next_cursor: Option<String>,
}

impl FakeCollection {
    pub fn new(id: u32, handle: &str, title: &str, products: &[&str]) -> Self {
        Self {
            id,
            handle: handle.to_string(),
            title: title.to_string(),
            description: String::new(),
            image: None,
            products: products.iter().map(|handle| (*handle).to_string()).collect(),
            next_cursor: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, url: &str) -> Self {
        self.image = Some(image(url, None));
        self
    }

    #[must_use]
    pub fn with_next_page(mut self, cursor: &str) -> Self {
        self.next_cursor = Some(cursor.to_string());
        self
    }

    fn json(&self) -> Value {
        json!({
            "id": format!("gid://shopify/Collection/{}", self.id),
            "handle": self.handle,
            "title": self.title,
            "description": self.description,
            "image": self.image,
        })
    }
}

fn page_info(next_cursor: Option<&str>) -> Value {
    json!({
        "hasPreviousPage": false,
        "hasNextPage": next_cursor.is_some(),
        "startCursor": "start",
        "endCursor": next_cursor.unwrap_or("end"),
    })
}

// =============================================================================
// Fake shop state
// =============================================================================

#[derive(Debug, Clone)]
struct FakeLine {
    id: String,
    variant_id: String,
    quantity: i64,
}

#[derive(Debug, Clone, Default)]
struct FakeCart {
    id: String,
    lines: Vec<FakeLine>,
    discount_codes: Vec<String>,
}

/// Everything the fake Storefront API knows.
#[derive(Debug, Default)]
pub struct FakeShopState {
    pub products: Vec<FakeProduct>,
    pub collections: Vec<FakeCollection>,
    pub header_menu: Option<Value>,
    pub footer_menu: Option<Value>,
    /// Operations answered with a GraphQL error.
    pub failing: HashSet<String>,
    /// Variables of the most recent request per operation.
    pub last_variables: HashMap<String, Value>,
    /// Number of requests per operation.
    pub calls: HashMap<String, usize>,
    carts: HashMap<String, FakeCart>,
    next_id: u32,
}

impl FakeShopState {
    fn product(&self, handle: &str) -> Option<&FakeProduct> {
        self.products.iter().find(|product| product.handle == handle)
    }

    fn collection(&self, handle: &str) -> Option<&FakeCollection> {
        self.collections
            .iter()
            .find(|collection| collection.handle == handle)
    }

    fn variant(&self, id: &str) -> Option<(&FakeProduct, &FakeVariant)> {
        self.products.iter().find_map(|product| {
            product
                .variants
                .iter()
                .find(|variant| variant.id == id)
                .map(|variant| (product, variant))
        })
    }

    /// Drop every cart, as Shopify does when carts expire.
    pub fn expire_carts(&mut self) {
        self.carts.clear();
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn cart_json(&self, cart: &FakeCart) -> Value {
        let mut subtotal = 0.0;
        let mut total_quantity = 0;
        let lines: Vec<Value> = cart
            .lines
            .iter()
            .filter_map(|line| {
                let (product, variant) = self.variant(&line.variant_id)?;
                #[allow(clippy::cast_precision_loss)]
                let total = variant.price * line.quantity as f64;
                subtotal += total;
                total_quantity += line.quantity;
                Some(json!({
                    "id": line.id,
                    "quantity": line.quantity,
                    "cost": { "totalAmount": money(total) },
                    "merchandise": variant.to_json(product),
                }))
            })
            .collect();

        json!({
            "id": cart.id,
            "checkoutUrl": format!("https://highland-hq.myshopify.com/cart/c/{}", cart.id.len()),
            "totalQuantity": total_quantity,
            "cost": {
                "subtotalAmount": money(subtotal),
                "totalAmount": money(subtotal),
            },
            "discountCodes": cart.discount_codes.iter()
                .map(|code| json!({ "code": code, "applicable": code != "EXPIRED" }))
                .collect::<Vec<_>>(),
            "lines": { "nodes": lines },
        })
    }

    fn add_lines(&mut self, cart_id: &str, lines: &Value) {
        let new_lines: Vec<(String, i64)> = lines
            .as_array()
            .into_iter()
            .flatten()
            .map(|line| {
                (
                    line["merchandiseId"].as_str().unwrap_or_default().to_string(),
                    line["quantity"].as_i64().unwrap_or(1),
                )
            })
            .collect();

        for (variant_id, quantity) in new_lines {
            let line_id = format!("gid://shopify/CartLine/{}?cart=test", self.next_id());
            let Some(cart) = self.carts.get_mut(cart_id) else {
                return;
            };
            if let Some(line) = cart.lines.iter_mut().find(|l| l.variant_id == variant_id) {
                line.quantity += quantity;
            } else {
                cart.lines.push(FakeLine {
                    id: line_id,
                    variant_id,
                    quantity,
                });
            }
        }
    }

    fn mutation_payload(&self, cart_id: &str) -> Value {
        let cart = self.carts.get(cart_id).map(|cart| self.cart_json(cart));
        json!({ "cart": cart, "userErrors": [] })
    }

    fn respond(&mut self, operation: &str, variables: &Value) -> Value {
        match operation {
            "FeaturedCollection" => {
                let handle = variables["handle"].as_str().unwrap_or_default();
                json!({ "collection": self.collection(handle).map(FakeCollection::json) })
            }
            "CollectionProducts" => {
                let handle = variables["handle"].as_str().unwrap_or_default();
                let collection = self.collection(handle).map(|collection| {
                    let mut data = collection.json();
                    let products: Vec<Value> = collection
                        .products
                        .iter()
                        .filter_map(|handle| self.product(handle))
                        .map(FakeProduct::card_json)
                        .collect();
                    data["products"] = json!({
                        "nodes": products,
                        "pageInfo": page_info(collection.next_cursor.as_deref()),
                    });
                    data
                });
                json!({ "collection": collection })
            }
            "Collections" => json!({
                "collections": {
                    "nodes": self.collections.iter().map(FakeCollection::json).collect::<Vec<_>>()
                }
            }),
            "RecommendedProducts" => json!({
                "products": {
                    "nodes": self.products.iter().map(FakeProduct::card_json).collect::<Vec<_>>()
                }
            }),
            "Catalog" => {
                let tag = variables["query"]
                    .as_str()
                    .and_then(|query| query.strip_prefix("tag:"))
                    .map(|tag| tag.trim_matches('"').to_string());
                let products: Vec<Value> = self
                    .products
                    .iter()
                    .filter(|product| tag.as_ref().is_none_or(|tag| product.tags.contains(tag)))
                    .map(FakeProduct::card_json)
                    .collect();
                json!({ "products": { "nodes": products, "pageInfo": page_info(None) } })
            }
            "SearchProducts" => {
                let term = variables["query"].as_str().unwrap_or_default().to_lowercase();
                let products: Vec<Value> = self
                    .products
                    .iter()
                    .filter(|product| product.title.to_lowercase().contains(&term))
                    .map(FakeProduct::card_json)
                    .collect();
                json!({ "products": { "nodes": products } })
            }
            "Product" => {
                let handle = variables["handle"].as_str().unwrap_or_default();
                let selected: Vec<(String, String)> = variables["selectedOptions"]
                    .as_array()
                    .into_iter()
                    .flatten()
                    .map(|option| {
                        (
                            option["name"].as_str().unwrap_or_default().to_string(),
                            option["value"].as_str().unwrap_or_default().to_string(),
                        )
                    })
                    .collect();
                json!({ "product": self.product(handle).map(|p| p.detail_json(&selected)) })
            }
            "Layout" => json!({
                "shop": {
                    "name": "Highland HQ",
                    "primaryDomain": { "url": "https://highlandhq.com" },
                },
                "header": self.header_menu,
                "footer": self.footer_menu,
            }),
            "Cart" => {
                let id = variables["cartId"].as_str().unwrap_or_default();
                json!({ "cart": self.carts.get(id).map(|cart| self.cart_json(cart)) })
            }
            "CartCreate" => {
                let id = format!("gid://shopify/Cart/c{}?key=secret", self.next_id());
                self.carts.insert(
                    id.clone(),
                    FakeCart {
                        id: id.clone(),
                        ..FakeCart::default()
                    },
                );
                self.add_lines(&id, &variables["input"]["lines"]);
                json!({ "cartCreate": self.mutation_payload(&id) })
            }
            "CartLinesAdd" => {
                let id = variables["cartId"].as_str().unwrap_or_default().to_string();
                self.add_lines(&id, &variables["lines"]);
                json!({ "cartLinesAdd": self.mutation_payload(&id) })
            }
            "CartLinesUpdate" => {
                let id = variables["cartId"].as_str().unwrap_or_default().to_string();
                if let Some(cart) = self.carts.get_mut(&id) {
                    for update in variables["lines"].as_array().into_iter().flatten() {
                        let line_id = update["id"].as_str().unwrap_or_default();
                        if let Some(line) = cart.lines.iter_mut().find(|l| l.id == line_id) {
                            line.quantity = update["quantity"].as_i64().unwrap_or(line.quantity);
                        }
                    }
                }
                json!({ "cartLinesUpdate": self.mutation_payload(&id) })
            }
            "CartLinesRemove" => {
                let id = variables["cartId"].as_str().unwrap_or_default().to_string();
                let removed: Vec<&str> = variables["lineIds"]
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_str)
                    .collect();
                if let Some(cart) = self.carts.get_mut(&id) {
                    cart.lines.retain(|line| !removed.contains(&line.id.as_str()));
                }
                json!({ "cartLinesRemove": self.mutation_payload(&id) })
            }
            "CartDiscountCodesUpdate" => {
                let id = variables["cartId"].as_str().unwrap_or_default().to_string();
                let codes: Vec<String> = variables["discountCodes"]
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                if let Some(cart) = self.carts.get_mut(&id) {
                    cart.discount_codes = codes;
                }
                json!({ "cartDiscountCodesUpdate": self.mutation_payload(&id) })
            }
            other => panic!("fake Storefront API got unexpected operation {other}"),
        }
    }
}

type SharedShop = Arc<Mutex<FakeShopState>>;

async fn graphql(State(shop): State<SharedShop>, Json(body): Json<Value>) -> Json<Value> {
    let operation = body["operationName"].as_str().unwrap_or_default().to_string();
    let variables = body["variables"].clone();

    let mut shop = shop.lock().expect("fake shop lock poisoned");
    *shop.calls.entry(operation.clone()).or_default() += 1;
    shop.last_variables.insert(operation.clone(), variables.clone());

    if shop.failing.contains(&operation) {
        return Json(json!({ "errors": [{ "message": "Internal error" }] }));
    }

    Json(json!({ "data": shop.respond(&operation, &variables) }))
}

// =============================================================================
// Test application
// =============================================================================

/// The storefront app wired to a fake Storefront API.
pub struct TestApp {
    pub server: TestServer,
    shop: SharedShop,
}

impl TestApp {
    /// Start a fake Storefront API seeded with `state`, and the app in front of it.
    pub async fn with_shop(state: FakeShopState) -> Self {
        let shop: SharedShop = Arc::new(Mutex::new(state));

        let fake = Router::new()
            .route("/graphql", post(graphql))
            .with_state(Arc::clone(&shop));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Storefront API");
        let addr = listener.local_addr().expect("Failed to read fake API address");
        tokio::spawn(async move {
            axum::serve(listener, fake)
                .await
                .expect("fake Storefront API failed");
        });

        let config = test_config(format!("http://{addr}/graphql"));
        let app = highland_storefront::app(AppState::new(config))
            .layer(middleware::from_fn(insert_peer_addr));
        let server = TestServer::builder()
            .save_cookies()
            .build(app)
            .expect("Failed to start test server");

        Self { server, shop }
    }

    /// The default catalog.
    pub async fn new() -> Self {
        Self::with_shop(sample_shop()).await
    }

    /// Access the fake shop, e.g. to make an operation fail.
    pub fn shop(&self) -> MutexGuard<'_, FakeShopState> {
        self.shop.lock().expect("fake shop lock poisoned")
    }

    pub fn fail(&self, operation: &str) {
        self.shop().failing.insert(operation.to_string());
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.shop().calls.get(operation).copied().unwrap_or_default()
    }

    pub fn last_variables(&self, operation: &str) -> Value {
        self.shop()
            .last_variables
            .get(operation)
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn get(&self, path: &str) -> TestRequest {
        self.server.get(path).add_header(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static(CLIENT_IP),
        )
    }

    /// HTMX-style GET.
    pub fn htmx_get(&self, path: &str) -> TestRequest {
        self.get(path)
            .add_header(HeaderName::from_static("hx-request"), HeaderValue::from_static("true"))
    }

    /// Post a cart action form straight from the peer, with no proxy headers.
    pub fn direct_cart_action(&self, form: &[(&str, &str)]) -> TestRequest {
        self.server
            .post("/cart")
            .add_header(HeaderName::from_static("hx-request"), HeaderValue::from_static("true"))
            .form(&form)
    }

    /// Post a cart action form, as HTMX does.
    pub fn cart_action(&self, form: &[(&str, &str)]) -> TestRequest {
        self.server
            .post("/cart")
            .add_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static(CLIENT_IP),
            )
            .add_header(HeaderName::from_static("hx-request"), HeaderValue::from_static("true"))
            .form(&form)
    }
}

async fn insert_peer_addr(mut req: Request, next: Next) -> Response {
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((PEER_IP, 51234))));
    next.run(req).await
}

pub fn test_config(endpoint: String) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        shopify: ShopifyStorefrontConfig {
            store: "highland-hq.myshopify.com".to_string(),
            api_version: "2024-10".to_string(),
            storefront_public_token: "public_token_value".to_string(),
            storefront_private_token: SecretString::from("kq7Xv2Lm9Rt4Wz8Np3Hs6Jd1"),
            endpoint: Some(endpoint),
            public_store_domain: "highlandhq.com".to_string(),
        },
        site: SiteConfig {
            name: "Highland HQ".to_string(),
            featured_collection_handle: FEATURED_HANDLE.to_string(),
            recommended_collection_handle: FEATURED_HANDLE.to_string(),
            announcement: Some("Free shipping on orders over $75".to_string()),
            header_menu_handle: "main-menu".to_string(),
            footer_menu_handle: "footer".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The catalog most tests run against.
pub fn sample_shop() -> FakeShopState {
    let tee = FakeProduct::new(
        1,
        "lake-tee",
        "Lake Tee",
        vec![
            FakeVariant::new(11, &[("Size", "Small")], 28.0, true),
            FakeVariant::new(12, &[("Size", "Large")], 28.0, false),
        ],
    )
    .with_tags(&["Women's"]);
    let flannel = FakeProduct::simple(2, "pine-flannel", "Pine Flannel", 64.0).with_tags(&["Men's"]);
    let dress = FakeProduct::simple(3, "meadow-dress", "Meadow Dress", 82.5).with_tags(&["Women's"]);
    let sold_out = FakeProduct::new(
        4,
        "ridge-hoodie",
        "Ridge Hoodie",
        vec![FakeVariant::new(41, &[("Size", "Medium")], 70.0, false)],
    );

    FakeShopState {
        products: vec![tee, flannel, dress, sold_out],
        collections: vec![
            FakeCollection::new(1, FEATURED_HANDLE, "August Collection", &["lake-tee", "pine-flannel"])
                .with_image("https://cdn.shopify.com/august.jpg"),
            FakeCollection::new(2, "dresses", "Dresses", &["meadow-dress"]),
            FakeCollection::new(3, "rompers-jumpsuits", "Rompers & Jumpsuits", &["lake-tee"]),
        ],
        header_menu: Some(json!({
            "id": "gid://shopify/Menu/1",
            "items": [
                { "id": "1", "title": "Shop", "url": "https://highland-hq.myshopify.com/collections/all", "items": [] },
                { "id": "2", "title": "Journal", "url": "https://highlandhq.com/blogs/journal", "items": [] },
                { "id": "3", "title": "Instagram", "url": "https://instagram.com/highlandhq", "items": [] },
                { "id": "4", "title": "Broken", "url": null, "items": [] },
            ],
        })),
        footer_menu: Some(json!({
            "id": "gid://shopify/Menu/2",
            "items": [
                { "id": "5", "title": "Refund Policy", "url": "https://highlandhq.com/policies/refund-policy", "items": [] },
            ],
        })),
        ..FakeShopState::default()
    }
}
