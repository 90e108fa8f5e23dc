//! Core types for the Highland HQ storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod handle;
pub mod id;
pub mod price;

pub use handle::{Handle, HandleError, HandleList};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
