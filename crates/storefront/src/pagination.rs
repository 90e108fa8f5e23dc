//! Cursor pagination for product grids.
//!
//! Pages are addressed with two query parameters: `cursor` (an opaque
//! Storefront cursor) and `direction` (`next` or `previous`). Moving backwards
//! requests the `last` N items before the page's start cursor; anything else
//! requests the `first` N items after its end cursor.

use serde::Deserialize;

use crate::shopify::PageInfo;
use crate::views::{ButtonClass, ButtonSize, ButtonVariant};

/// Products per page on a single collection.
pub const COLLECTION_PAGE_SIZE: i64 = 12;

/// Products per page on the "Shop All" catalog.
pub const CATALOG_PAGE_SIZE: i64 = 8;

/// Pagination query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub cursor: Option<String>,
    pub direction: Option<String>,
}

/// Connection arguments for one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PaginationVariables {
    pub first: Option<i64>,
    pub last: Option<i64>,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl PaginationVariables {
    /// Build connection arguments from request query parameters.
    #[must_use]
    pub fn from_query(query: &PageQuery, page_by: i64) -> Self {
        let cursor = query.cursor.clone().filter(|c| !c.is_empty());

        if query.direction.as_deref() == Some("previous") {
            Self {
                last: Some(page_by),
                start_cursor: cursor,
                ..Self::default()
            }
        } else {
            Self {
                first: Some(page_by),
                end_cursor: cursor,
                ..Self::default()
            }
        }
    }
}

/// Previous/next links for a paginated grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationLinks {
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

impl PaginationLinks {
    /// Build links for the page described by `page_info`, served at `path`.
    #[must_use]
    pub fn new(path: &str, page_info: &PageInfo) -> Self {
        let link = |direction: &str, cursor: &str| {
            format!(
                "{path}?direction={direction}&cursor={}",
                urlencoding::encode(cursor)
            )
        };

        Self {
            previous_url: page_info
                .start_cursor
                .as_deref()
                .filter(|_| page_info.has_previous_page)
                .map(|cursor| link("previous", cursor)),
            next_url: page_info
                .end_cursor
                .as_deref()
                .filter(|_| page_info.has_next_page)
                .map(|cursor| link("next", cursor)),
        }
    }

    /// Whether any link is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.previous_url.is_none() && self.next_url.is_none()
    }

    #[must_use]
    pub const fn button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Medium, ButtonVariant::Outline)
    }
}
