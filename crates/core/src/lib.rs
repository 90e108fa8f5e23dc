//! Highland HQ Core - Shared domain types.
//!
//! This crate provides the small set of types the storefront uses to make
//! sense of the opaque data returned by the Shopify Storefront API:
//! - prices with currency-aware formatting
//! - Shopify global IDs (`gid://shopify/...`)
//! - URL handles for products and collections
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps it
//! lightweight and allows it to be tested without network access.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
