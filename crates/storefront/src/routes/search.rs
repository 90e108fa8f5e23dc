//! Search route handlers.
//!
//! Both the results page and the search drawer query the Storefront API
//! directly. A blank term never reaches Shopify.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{OriginalUri, Query, State};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;
use crate::views::{ButtonClass, LayoutView, ProductCardView};

/// Results shown on the search page.
const SEARCH_PAGE_SIZE: i64 = 24;

/// Results shown in the search drawer.
const PREDICTIVE_SIZE: i64 = 10;

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

impl SearchQuery {
    /// The trimmed search term, or `None` when blank.
    #[must_use]
    pub fn term(&self) -> Option<&str> {
        Some(self.q.trim()).filter(|term| !term.is_empty())
    }
}

/// Full search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search/index.html")]
pub struct SearchPageTemplate {
    pub layout: LayoutView,
    pub term: String,
    /// `None` when no search was made.
    pub results: Option<Vec<ProductCardView>>,
}

impl SearchPageTemplate {
    #[must_use]
    pub fn search_button(&self) -> ButtonClass {
        ButtonClass::default()
    }
}

/// Search drawer results fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub term: String,
    pub results: Option<Vec<ProductCardView>>,
}

/// Display the search page.
#[instrument(skip(state, nonce))]
pub async fn index(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SearchQuery>,
    nonce: CspNonce,
) -> Result<SearchPageTemplate> {
    let search = async {
        match query.term() {
            Some(term) => state
                .storefront()
                .search_products(term, SEARCH_PAGE_SIZE)
                .await
                .map(Some),
            None => Ok(None),
        }
    };

    let (layout, products) = tokio::join!(
        super::page_layout(&state, uri.path(), "Search", &nonce),
        search,
    );

    Ok(SearchPageTemplate {
        layout,
        term: query.term().unwrap_or_default().to_string(),
        results: products?.map(|products| ProductCardView::grid(&products)),
    })
}

/// Search drawer results (HTMX).
///
/// Failures leave the drawer empty rather than erroring the fragment.
#[instrument(skip(state))]
pub async fn predictive(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> SearchResultsTemplate {
    let Some(term) = query.term() else {
        return SearchResultsTemplate {
            term: String::new(),
            results: None,
        };
    };

    let results = match state.storefront().search_products(term, PREDICTIVE_SIZE).await {
        Ok(products) => Some(ProductCardView::grid(&products)),
        Err(e) => {
            tracing::warn!("Predictive search failed: {e}");
            None
        }
    };

    SearchResultsTemplate {
        term: term.to_string(),
        results,
    }
}
