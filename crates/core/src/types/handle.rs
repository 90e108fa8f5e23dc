//! URL handles for products and collections.
//!
//! Handles are the human-readable slugs Shopify uses in storefront URLs
//! (`/products/<handle>`, `/collections/<handle>`). Collection routes also
//! accept a comma-separated list of handles, parsed with [`HandleList`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum handle length accepted by Shopify.
pub const MAX_HANDLE_LENGTH: usize = 255;

/// Errors that can occur when parsing a handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("handle is empty")]
    Empty,
    #[error("handle is longer than {MAX_HANDLE_LENGTH} characters")]
    TooLong,
    #[error("invalid character {0:?} in handle")]
    InvalidCharacter(char),
}

/// A validated product or collection handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Handle(String);

impl Handle {
    /// Parse a handle.
    ///
    /// Surrounding whitespace and trailing slashes are removed and the value
    /// is lowercased. The remaining characters must be ASCII letters, digits,
    /// `-` or `_`.
    ///
    /// # Errors
    ///
    /// Returns a `HandleError` if the handle is empty, too long, or contains
    /// characters that cannot appear in a Shopify handle.
    pub fn parse(value: &str) -> Result<Self, HandleError> {
        let value = value.trim().trim_end_matches('/').to_lowercase();

        if value.is_empty() {
            return Err(HandleError::Empty);
        }
        if value.len() > MAX_HANDLE_LENGTH {
            return Err(HandleError::TooLong);
        }
        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(HandleError::InvalidCharacter(c));
        }

        Ok(Self(value))
    }

    /// Get the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Handle {
    type Error = HandleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Handle> for String {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

/// A non-empty list of distinct handles, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleList(Vec<Handle>);

impl HandleList {
    /// Parse a comma-separated list of handles (e.g. `dresses,rompers-jumpsuits`).
    ///
    /// Empty segments are ignored and repeated handles are kept once, at
    /// their first position.
    ///
    /// # Errors
    ///
    /// Returns `HandleError::Empty` if no handles remain, or the first error
    /// from an invalid segment.
    pub fn parse(value: &str) -> Result<Self, HandleError> {
        let mut handles: Vec<Handle> = Vec::new();

        for segment in value.split(',') {
            if segment.trim().trim_end_matches('/').is_empty() {
                continue;
            }
            let handle = Handle::parse(segment)?;
            if !handles.contains(&handle) {
                handles.push(handle);
            }
        }

        if handles.is_empty() {
            return Err(HandleError::Empty);
        }

        Ok(Self(handles))
    }

    /// Whether the list names more than one collection.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.0.len() > 1
    }

    /// The first handle in the list.
    #[must_use]
    #[allow(clippy::indexing_slicing)] // parse() never produces an empty list
    pub fn first(&self) -> &Handle {
        &self.0[0]
    }

    /// Iterate over the handles.
    pub fn iter(&self) -> impl Iterator<Item = &Handle> {
        self.0.iter()
    }

    /// Number of handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for HandleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(Handle::as_str)
            .collect::<Vec<_>>()
            .join(",");
        f.write_str(&joined)
    }
}
