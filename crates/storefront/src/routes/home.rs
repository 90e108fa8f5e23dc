//! Home page route handlers.
//!
//! The featured collection is critical: if Shopify can't be reached the page
//! fails. Recommended products are deferred to a fragment requested after the
//! page loads, so a failure there only leaves the section empty.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{OriginalUri, State};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::CspNonce;
use crate::navigation::Navigation;
use crate::state::AppState;
use crate::views::{
    ButtonClass, ButtonSize, ButtonVariant, FeaturedCollectionView, LayoutView, ProductCardView,
};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: LayoutView,
    /// Hero banner; not rendered when the collection doesn't exist.
    pub featured: Option<FeaturedCollectionView>,
    /// Target of the recommended products "See More" button.
    pub see_more_url: String,
}

impl HomeTemplate {
    /// Class of the recommended products "See More" link.
    #[must_use]
    pub const fn see_more_button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Medium, ButtonVariant::Outline)
    }
}

/// Recommended products fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/recommended_products.html")]
pub struct RecommendedProductsTemplate {
    /// `None` when the products couldn't be loaded.
    pub products: Option<Vec<ProductCardView>>,
}

/// Display the home page.
#[instrument(skip(state, nonce))]
pub async fn home(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    nonce: CspNonce,
) -> Result<HomeTemplate> {
    let site = &state.config().site;

    let (navigation, featured) = tokio::join!(
        Navigation::load(&state, uri.path()),
        state
            .storefront()
            .featured_collection(&site.featured_collection_handle),
    );

    let featured = featured?.as_ref().map(FeaturedCollectionView::from_collection);
    if featured.is_none() {
        tracing::warn!(
            handle = %site.featured_collection_handle,
            "Featured collection not found"
        );
    }

    Ok(HomeTemplate {
        layout: LayoutView::new(site.page_title("Home"), &nonce, navigation),
        featured,
        see_more_url: format!("/collections/{}", site.recommended_collection_handle),
    })
}

/// Recommended products, loaded after the page.
#[instrument(skip(state))]
pub async fn recommended_products(State(state): State<AppState>) -> RecommendedProductsTemplate {
    let products = match state.storefront().recommended_products().await {
        Ok(products) => Some(ProductCardView::grid(&products)),
        Err(e) => {
            tracing::error!("Failed to fetch recommended products: {e}");
            None
        }
    };

    RecommendedProductsTemplate { products }
}
