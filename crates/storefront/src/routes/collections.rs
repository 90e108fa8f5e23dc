//! Collection route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{OriginalUri, Path, Query, State};
use futures::future::try_join_all;
use highland_core::HandleList;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CspNonce;
use crate::navigation::Navigation;
use crate::pagination::{
    CATALOG_PAGE_SIZE, COLLECTION_PAGE_SIZE, PageQuery, PaginationLinks, PaginationVariables,
};
use crate::shopify::{Collection, CollectionPage, ProductFilter};
use crate::state::AppState;
use crate::views::{HeroView, ImageView, LayoutView, ProductCardView};

/// Number of collections listed on the collection index.
const COLLECTIONS_INDEX_SIZE: i64 = 50;

/// Collection index card.
#[derive(Clone)]
pub struct CollectionCardView {
    pub title: String,
    pub url: String,
    pub image: Option<ImageView>,
}

impl From<&Collection> for CollectionCardView {
    fn from(collection: &Collection) -> Self {
        Self {
            title: collection.title.clone(),
            url: format!("/collections/{}", collection.handle),
            image: collection
                .image
                .as_ref()
                .map(|image| ImageView::from_image(image, &collection.title)),
        }
    }
}

/// Path parameters of `/collections/{handles}[/{tag}[/{additional}]]`.
///
/// The trailing `additional` segment is accepted but not used.
#[derive(Debug, Deserialize)]
pub struct CollectionPath {
    pub handles: String,
    pub tag: Option<String>,
    pub additional: Option<String>,
}

/// Collection index page template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsIndexTemplate {
    pub layout: LayoutView,
    pub collections: Vec<CollectionCardView>,
}

/// Product grid page template, shared by collections and the catalog.
#[derive(Template, WebTemplate)]
#[template(path = "collections/show.html")]
pub struct CollectionShowTemplate {
    pub layout: LayoutView,
    pub hero: HeroView,
    pub products: Vec<ProductCardView>,
    pub pagination: PaginationLinks,
}

/// Display the collection index.
#[instrument(skip(state, nonce))]
pub async fn index(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    nonce: CspNonce,
) -> Result<CollectionsIndexTemplate> {
    let (layout, collections) = tokio::join!(
        super::page_layout(&state, uri.path(), "Collections", &nonce),
        state.storefront().collections(COLLECTIONS_INDEX_SIZE),
    );

    Ok(CollectionsIndexTemplate {
        layout,
        collections: collections?.iter().map(CollectionCardView::from).collect(),
    })
}

/// Display the whole catalog ("Shop All").
#[instrument(skip(state, nonce))]
pub async fn all(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
    nonce: CspNonce,
) -> Result<CollectionShowTemplate> {
    catalog(&state, uri.path(), None, &query, &nonce).await
}

/// Display the catalog narrowed to one tag.
#[instrument(skip(state, nonce))]
pub async fn all_tagged(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(tag): Path<String>,
    Query(query): Query<PageQuery>,
    nonce: CspNonce,
) -> Result<CollectionShowTemplate> {
    let filter = tag_filter(Some(tag));
    catalog(&state, uri.path(), filter.as_ref(), &query, &nonce).await
}

async fn catalog(
    state: &AppState,
    path: &str,
    filter: Option<&ProductFilter>,
    query: &PageQuery,
    nonce: &CspNonce,
) -> Result<CollectionShowTemplate> {
    let pagination = PaginationVariables::from_query(query, CATALOG_PAGE_SIZE);
    let search = filter.map(ProductFilter::search_query);

    let (layout, page) = tokio::join!(
        super::page_layout(state, path, "Products", nonce),
        state.storefront().catalog(search.as_deref(), &pagination),
    );
    let page = page?;

    Ok(CollectionShowTemplate {
        layout,
        hero: HeroView::new("Shop All", "", None),
        products: ProductCardView::grid(&page.products),
        pagination: PaginationLinks::new(path, &page.page_info),
    })
}

/// Display one collection, or several comma-separated collections merged.
#[instrument(skip(state, nonce))]
pub async fn show(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(params): Path<CollectionPath>,
    Query(query): Query<PageQuery>,
    nonce: CspNonce,
) -> Result<CollectionShowTemplate> {
    let handles = HandleList::parse(&params.handles)
        .map_err(|_| AppError::NotFound(format!("Collection {} not found", params.handles)))?;
    let filter = tag_filter(params.tag);
    let pagination = PaginationVariables::from_query(&query, COLLECTION_PAGE_SIZE);
    let storefront = state.storefront();

    let lookups = handles
        .iter()
        .map(|handle| storefront.collection(handle.as_str(), filter.as_ref(), &pagination));

    let navigation = Navigation::load(&state, uri.path());
    let (navigation, pages) = tokio::join!(navigation, try_join_all(lookups));

    let pages: Vec<CollectionPage> = pages?.into_iter().flatten().collect();
    let Some(first) = pages.first() else {
        return Err(AppError::NotFound(format!("Collection {handles} not found")));
    };

    let (hero, pagination) = if handles.is_multiple() {
        let title = pages
            .iter()
            .map(|page| page.collection.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        (
            HeroView::new(title, "", first.collection.image.as_ref()),
            PaginationLinks::default(),
        )
    } else {
        (
            HeroView::from_collection(&first.collection),
            PaginationLinks::new(uri.path(), &first.products.page_info),
        )
    };

    let products: Vec<_> = pages
        .iter()
        .flat_map(|page| page.products.products.iter().cloned())
        .collect();

    Ok(CollectionShowTemplate {
        layout: LayoutView::new(state.config().site.page_title(&hero.title), &nonce, navigation),
        products: ProductCardView::grid(&products),
        hero,
        pagination,
    })
}

/// Tag filter from a path segment; blank segments mean no filter.
fn tag_filter(tag: Option<String>) -> Option<ProductFilter> {
    tag.map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .map(ProductFilter::Tag)
}
