//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod collections;
pub mod menus;
pub mod products;

pub use cart::{convert_cart, user_error_message};
pub use collections::{convert_collection, convert_collection_page};
pub use menus::convert_layout;
pub use products::{
    convert_image, convert_money, convert_page_info, convert_product, convert_product_card,
    convert_product_page, convert_variant,
};
