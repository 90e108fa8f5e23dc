//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` request/response envelopes with `reqwest` 0.13 for
//! HTTP. Catalog reads (collections, products, menus) are cached using `moka`
//! (5-minute TTL); carts are always fetched live.

mod cache;
mod conversions;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use highland_core::{CartGid, CartLineGid};
use moka::future::Cache;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::ShopifyStorefrontConfig;
use crate::pagination::PaginationVariables;
use crate::shopify::types::{
    Cart, CartLineInput, CartLineUpdateInput, Collection, CollectionPage, Layout, Product,
    ProductFilter, ProductPage, SelectedOption,
};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::{CacheKey, CacheValue};
use conversions::{
    convert_cart, convert_collection, convert_collection_page, convert_layout, convert_product,
    convert_product_card, convert_product_page, user_error_message,
};
use queries::{
    CartLineInputFields, CartLineUpdateInputFields, CartMutationPayload, PaginationArgs, cart,
    cart_create, cart_discount_codes_update, cart_lines_add, cart_lines_remove,
    cart_lines_update, catalog, collection_products, collections, featured_collection, layout,
    product, recommended_products, search_products,
};

/// Number of products in the home page "Recommended Products" grid.
const RECOMMENDED_PRODUCTS_COUNT: i64 = 10;

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides typed access to collections, products, menus and cart operations.
/// Catalog responses are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.graphql_endpoint(),
                access_token: config.storefront_private_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            // See: https://shopify.dev/docs/storefronts/headless/building-with-the-storefront-api/getting-started
            .header(
                "Shopify-Storefront-Private-Token",
                &self.inner.access_token,
            )
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read the body as text first so failures can be logged with context
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                operation = request_body.operation_name,
                status = %status,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::message(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            )));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    operation = request_body.operation_name,
                    error = %e,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(
                operation = request_body.operation_name,
                errors = ?errors,
                "GraphQL errors in response"
            );

            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                body = %truncate(&response_text, 500),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::message("No data in response")
        })
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        let value = self.inner.cache.get(key).await;
        if value.is_some() {
            debug!(?key, "Cache hit");
        }
        value
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        self.inner.cache.insert(key, value).await;
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get the collection featured in the home page hero.
    ///
    /// Returns `Ok(None)` when no collection has this handle.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn featured_collection(
        &self,
        handle: &str,
    ) -> Result<Option<Collection>, ShopifyError> {
        let key = CacheKey::FeaturedCollection(handle.to_string());
        if let Some(CacheValue::Collection(collection)) = self.cached(&key).await {
            return Ok(Some(*collection));
        }

        let data = self
            .execute::<queries::FeaturedCollection>(featured_collection::Variables {
                handle: handle.to_string(),
            })
            .await?;

        let Some(collection) = data.collection.map(convert_collection) else {
            return Ok(None);
        };

        self.store(key, CacheValue::Collection(Box::new(collection.clone())))
            .await;
        Ok(Some(collection))
    }

    /// Get one page of a collection's products, optionally filtered.
    ///
    /// Returns `Ok(None)` when no collection has this handle.
    #[instrument(skip(self, pagination), fields(handle = %handle))]
    pub async fn collection(
        &self,
        handle: &str,
        filter: Option<&ProductFilter>,
        pagination: &PaginationVariables,
    ) -> Result<Option<CollectionPage>, ShopifyError> {
        let key = CacheKey::CollectionPage {
            handle: handle.to_string(),
            filter: filter.cloned(),
            pagination: pagination.clone(),
        };
        if let Some(CacheValue::CollectionPage(page)) = self.cached(&key).await {
            return Ok(Some(*page));
        }

        let variables = collection_products::Variables {
            handle: handle.to_string(),
            filters: filter.map(|filter| {
                vec![match filter {
                    ProductFilter::Tag(tag) => collection_products::ProductFilterInput {
                        tag: Some(tag.clone()),
                    },
                }]
            }),
            pagination: pagination_args(pagination),
        };

        let data = self
            .execute::<queries::CollectionProducts>(variables)
            .await?;

        let Some(page) = data.collection.map(convert_collection_page) else {
            return Ok(None);
        };

        self.store(key, CacheValue::CollectionPage(Box::new(page.clone())))
            .await;
        Ok(Some(page))
    }

    /// List collections for the collection index page.
    #[instrument(skip(self))]
    pub async fn collections(&self, first: i64) -> Result<Vec<Collection>, ShopifyError> {
        let key = CacheKey::Collections(first);
        if let Some(CacheValue::Collections(collections)) = self.cached(&key).await {
            return Ok(collections);
        }

        let data = self
            .execute::<queries::Collections>(collections::Variables { first })
            .await?;

        let collections: Vec<Collection> = data
            .collections
            .nodes
            .into_iter()
            .map(convert_collection)
            .collect();

        self.store(key, CacheValue::Collections(collections.clone()))
            .await;
        Ok(collections)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the most recently updated products for the home page.
    #[instrument(skip(self))]
    pub async fn recommended_products(&self) -> Result<Vec<Product>, ShopifyError> {
        let key = CacheKey::RecommendedProducts;
        if let Some(CacheValue::Products(products)) = self.cached(&key).await {
            return Ok(products);
        }

        let data = self
            .execute::<queries::RecommendedProducts>(recommended_products::Variables {
                first: RECOMMENDED_PRODUCTS_COUNT,
            })
            .await?;

        let products: Vec<Product> = data
            .products
            .nodes
            .into_iter()
            .map(convert_product_card)
            .collect();

        self.store(key, CacheValue::Products(products.clone())).await;
        Ok(products)
    }

    /// Get one page of the full catalog, optionally narrowed by a search query.
    #[instrument(skip(self, pagination))]
    pub async fn catalog(
        &self,
        query: Option<&str>,
        pagination: &PaginationVariables,
    ) -> Result<ProductPage, ShopifyError> {
        let key = CacheKey::Catalog {
            query: query.map(str::to_string),
            pagination: pagination.clone(),
        };
        if let Some(CacheValue::ProductPage(page)) = self.cached(&key).await {
            return Ok(page);
        }

        let data = self
            .execute::<queries::Catalog>(catalog::Variables {
                query: query.map(str::to_string),
                pagination: pagination_args(pagination),
            })
            .await?;

        let page = convert_product_page(data.products);

        self.store(key, CacheValue::ProductPage(page.clone())).await;
        Ok(page)
    }

    /// Get a product by handle, resolving the variant for `selected_options`.
    ///
    /// Returns `Ok(None)` when no product has this handle.
    #[instrument(skip(self, selected_options), fields(handle = %handle))]
    pub async fn product(
        &self,
        handle: &str,
        selected_options: &[SelectedOption],
    ) -> Result<Option<Product>, ShopifyError> {
        let key = CacheKey::Product {
            handle: handle.to_string(),
            selected_options: selected_options
                .iter()
                .map(|opt| (opt.name.clone(), opt.value.clone()))
                .collect(),
        };
        if let Some(CacheValue::Product(product)) = self.cached(&key).await {
            return Ok(Some(*product));
        }

        let variables = product::Variables {
            handle: handle.to_string(),
            selected_options: selected_options
                .iter()
                .map(|opt| product::SelectedOptionInput {
                    name: opt.name.clone(),
                    value: opt.value.clone(),
                })
                .collect(),
        };

        let data = self.execute::<queries::Product>(variables).await?;

        let Some(product) = data.product.map(convert_product) else {
            return Ok(None);
        };

        self.store(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(Some(product))
    }

    /// Search products by free text. Results are not cached.
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        term: &str,
        first: i64,
    ) -> Result<Vec<Product>, ShopifyError> {
        let data = self
            .execute::<queries::SearchProducts>(search_products::Variables {
                query: term.to_string(),
                first,
            })
            .await?;

        Ok(data
            .products
            .nodes
            .into_iter()
            .map(convert_product_card)
            .collect())
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Get shop metadata and the header and footer menus.
    #[instrument(skip(self))]
    pub async fn layout(
        &self,
        header_menu: &str,
        footer_menu: &str,
    ) -> Result<Layout, ShopifyError> {
        let key = CacheKey::Layout {
            header_menu: header_menu.to_string(),
            footer_menu: footer_menu.to_string(),
        };
        if let Some(CacheValue::Layout(layout)) = self.cached(&key).await {
            return Ok(*layout);
        }

        let data = self
            .execute::<queries::Layout>(layout::Variables {
                header_menu_handle: header_menu.to_string(),
                footer_menu_handle: footer_menu.to_string(),
            })
            .await?;

        let layout = convert_layout(data);

        self.store(key, CacheValue::Layout(Box::new(layout.clone())))
            .await;
        Ok(layout)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get an existing cart.
    ///
    /// Returns `Ok(None)` when Shopify no longer knows the cart (e.g., it
    /// expired or was checked out).
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartGid) -> Result<Option<Cart>, ShopifyError> {
        let data = self
            .execute::<queries::Cart>(cart::Variables {
                cart_id: cart_id.clone(),
            })
            .await?;

        Ok(data.cart.map(convert_cart))
    }

    /// Create a new cart with initial lines.
    #[instrument(skip(self, lines))]
    pub async fn create_cart(&self, lines: Vec<CartLineInput>) -> Result<Cart, ShopifyError> {
        let variables = cart_create::Variables {
            input: cart_create::CartInput {
                lines: lines.into_iter().map(line_input).collect(),
            },
        };

        let data = self.execute::<queries::CartCreate>(variables).await?;
        cart_from_payload(data.cart_create, "create cart")
    }

    /// Add lines to a cart.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_lines(
        &self,
        cart_id: &CartGid,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_lines_add::Variables {
            cart_id: cart_id.clone(),
            lines: lines.into_iter().map(line_input).collect(),
        };

        let data = self.execute::<queries::CartLinesAdd>(variables).await?;
        cart_from_payload(data.cart_lines_add, "add to cart")
    }

    /// Change the quantity of cart lines.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_lines(
        &self,
        cart_id: &CartGid,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_lines_update::Variables {
            cart_id: cart_id.clone(),
            lines: lines
                .into_iter()
                .map(|line| CartLineUpdateInputFields {
                    id: line.id,
                    quantity: line.quantity,
                })
                .collect(),
        };

        let data = self.execute::<queries::CartLinesUpdate>(variables).await?;
        cart_from_payload(data.cart_lines_update, "update cart")
    }

    /// Remove lines from a cart.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_lines(
        &self,
        cart_id: &CartGid,
        line_ids: Vec<CartLineGid>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_lines_remove::Variables {
            cart_id: cart_id.clone(),
            line_ids,
        };

        let data = self.execute::<queries::CartLinesRemove>(variables).await?;
        cart_from_payload(data.cart_lines_remove, "remove from cart")
    }

    /// Replace the discount codes on a cart.
    #[instrument(skip(self, discount_codes), fields(cart_id = %cart_id))]
    pub async fn update_discount_codes(
        &self,
        cart_id: &CartGid,
        discount_codes: Vec<String>,
    ) -> Result<Cart, ShopifyError> {
        let variables = cart_discount_codes_update::Variables {
            cart_id: cart_id.clone(),
            discount_codes,
        };

        let data = self
            .execute::<queries::CartDiscountCodesUpdate>(variables)
            .await?;
        cart_from_payload(data.cart_discount_codes_update, "update discount codes")
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn pagination_args(pagination: &PaginationVariables) -> PaginationArgs {
    PaginationArgs {
        first: pagination.first,
        last: pagination.last,
        start_cursor: pagination.start_cursor.clone(),
        end_cursor: pagination.end_cursor.clone(),
    }
}

fn line_input(line: CartLineInput) -> CartLineInputFields {
    CartLineInputFields {
        merchandise_id: line.merchandise_id,
        quantity: line.quantity,
    }
}

/// Unwrap a cart mutation payload, surfacing user errors.
fn cart_from_payload(
    payload: Option<CartMutationPayload>,
    action: &str,
) -> Result<Cart, ShopifyError> {
    let Some(payload) = payload else {
        return Err(ShopifyError::message(format!("Failed to {action}")));
    };

    if !payload.user_errors.is_empty() {
        return Err(ShopifyError::UserError(user_error_message(
            payload.user_errors,
        )));
    }

    payload
        .cart
        .map(convert_cart)
        .ok_or_else(|| ShopifyError::message(format!("Failed to {action}")))
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
