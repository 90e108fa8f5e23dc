//! Cache types for Storefront API responses.

use crate::pagination::PaginationVariables;
use crate::shopify::types::{Collection, CollectionPage, Layout, Product, ProductFilter, ProductPage};

/// Cache key for catalog responses. Carts are never cached.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    FeaturedCollection(String),
    RecommendedProducts,
    CollectionPage {
        handle: String,
        filter: Option<ProductFilter>,
        pagination: PaginationVariables,
    },
    Catalog {
        query: Option<String>,
        pagination: PaginationVariables,
    },
    Product {
        handle: String,
        selected_options: Vec<(String, String)>,
    },
    Collections(i64),
    Layout {
        header_menu: String,
        footer_menu: String,
    },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Collection(Box<Collection>),
    CollectionPage(Box<CollectionPage>),
    Collections(Vec<Collection>),
    Products(Vec<Product>),
    ProductPage(ProductPage),
    Product(Box<Product>),
    Layout(Box<Layout>),
}
