//! Newtype IDs for Shopify global IDs.
//!
//! Shopify identifies every object with a global ID of the form
//! `gid://shopify/<Resource>/<id>`. Use the `define_gid!` macro to create
//! type-safe wrappers that prevent accidentally passing a product ID where a
//! variant or cart line ID is expected.

use thiserror::Error;

/// Prefix shared by all Shopify global IDs.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a global ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GidError {
    /// The value does not start with `gid://shopify/`.
    #[error("not a Shopify global ID: {0}")]
    MissingPrefix(String),
    /// The value names a different resource type.
    #[error("expected a {expected} ID, got {value}")]
    WrongResource {
        expected: &'static str,
        value: String,
    },
    /// The value has no identifier after the resource type.
    #[error("missing identifier in {0}")]
    MissingId(String),
}

/// Validate `value` as a global ID for `resource`.
///
/// Cart and cart line IDs carry a `?key=...` suffix which is kept as part of
/// the identifier.
///
/// # Errors
///
/// Returns a `GidError` describing the first problem found.
pub fn validate_gid(value: &str, resource: &'static str) -> Result<(), GidError> {
    let rest = value
        .strip_prefix(GID_PREFIX)
        .ok_or_else(|| GidError::MissingPrefix(value.to_string()))?;

    let (kind, id) = rest
        .split_once('/')
        .ok_or_else(|| GidError::MissingId(value.to_string()))?;

    if kind != resource {
        return Err(GidError::WrongResource {
            expected: resource,
            value: value.to_string(),
        });
    }

    let id = id.split('?').next().unwrap_or_default();
    if id.is_empty() {
        return Err(GidError::MissingId(value.to_string()));
    }

    Ok(())
}

/// Macro to define a type-safe Shopify global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` which validates the `gid://shopify/<Resource>/` prefix
/// - `as_str()` and `Display`
///
/// # Example
///
/// ```rust
/// # use highland_core::define_gid;
/// define_gid!(ProductGid, "Product");
///
/// let id = ProductGid::parse("gid://shopify/Product/123").unwrap();
/// assert_eq!(id.as_str(), "gid://shopify/Product/123");
/// assert!(ProductGid::parse("gid://shopify/Collection/123").is_err());
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource type named in the global ID.
            pub const RESOURCE: &'static str = $resource;

            /// Parse and validate a global ID.
            ///
            /// # Errors
            ///
            /// Returns an error if the value is not a global ID for this resource.
            pub fn parse(value: &str) -> ::core::result::Result<Self, $crate::types::id::GidError> {
                let value = value.trim();
                $crate::types::id::validate_gid(value, $resource)?;
                Ok(Self(value.to_string()))
            }

            /// Get the full global ID.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the global ID string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::GidError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_gid!(ProductGid, "Product");
define_gid!(VariantGid, "ProductVariant");
define_gid!(CollectionGid, "Collection");
define_gid!(CartGid, "Cart");
define_gid!(CartLineGid, "CartLine");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant() {
        let id = VariantGid::parse("gid://shopify/ProductVariant/42").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/ProductVariant/42");
        assert_eq!(id.to_string(), "gid://shopify/ProductVariant/42");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ProductGid::parse("  gid://shopify/Product/1 ").unwrap();
        assert_eq!(id.as_str(), "gid://shopify/Product/1");
    }

    #[test]
    fn test_cart_line_keeps_key_suffix() {
        let raw = "gid://shopify/CartLine/abc-123?cart=Z2NwLXVz";
        let id = CartLineGid::parse(raw).unwrap();
        assert_eq!(id.as_str(), raw);
    }

    #[test]
    fn test_rejects_missing_prefix() {
        assert_eq!(
            VariantGid::parse("42").unwrap_err(),
            GidError::MissingPrefix("42".to_string())
        );
    }

    #[test]
    fn test_rejects_wrong_resource() {
        let err = VariantGid::parse("gid://shopify/Product/42").unwrap_err();
        assert!(matches!(
            err,
            GidError::WrongResource {
                expected: "ProductVariant",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_empty_identifier() {
        assert!(matches!(
            CartGid::parse("gid://shopify/Cart/?key=abc"),
            Err(GidError::MissingId(_))
        ));
        assert!(matches!(
            CartGid::parse("gid://shopify/Cart"),
            Err(GidError::MissingId(_))
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let id = CartGid::parse("gid://shopify/Cart/c1?key=k").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/Cart/c1?key=k\"");
    }
}
