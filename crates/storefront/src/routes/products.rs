//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use highland_core::Handle;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CspNonce;
use crate::navigation::Navigation;
use crate::shopify::{Product, ProductOption, ProductVariant, SelectedOption};
use crate::state::AppState;
use crate::views::{
    ButtonClass, ButtonSize, ButtonVariant, GALLERY_ALT_FALLBACK, ImageView, LayoutView,
    variant_url,
};

/// One selectable option value.
#[derive(Clone)]
pub struct OptionValueView {
    pub value: String,
    /// Product URL with this value swapped into the current selection.
    pub url: String,
    /// Part of the current selection.
    pub active: bool,
    /// Some purchasable variant carries this value alongside the rest of the selection.
    pub available: bool,
}

/// A variant option with more than one value.
#[derive(Clone)]
pub struct OptionView {
    pub name: String,
    pub values: Vec<OptionValueView>,
}

/// Images for the product gallery; the selected variant's image comes first.
#[derive(Clone, Default)]
pub struct GalleryView {
    pub main: Option<ImageView>,
    pub thumbnails: Vec<ImageView>,
}

impl GalleryView {
    fn new(product: &Product) -> Self {
        let selected_image = product
            .selected_variant
            .as_ref()
            .and_then(|variant| variant.image.as_ref());

        let mut images: Vec<ImageView> = selected_image
            .into_iter()
            .chain(product.images.iter())
            .map(|image| ImageView::from_image(image, GALLERY_ALT_FALLBACK))
            .collect();
        // The variant image usually appears among the product images too
        let mut seen = std::collections::HashSet::new();
        images.retain(|image| seen.insert(image.url.clone()));

        Self {
            main: images.first().cloned(),
            thumbnails: images,
        }
    }
}

/// Add to cart form state.
#[derive(Clone)]
pub struct AddToCartView {
    /// Variant to add; `None` when the selection matches no variant.
    pub merchandise_id: Option<String>,
    pub available: bool,
}

impl AddToCartView {
    fn new(selected_variant: Option<&ProductVariant>) -> Self {
        Self {
            merchandise_id: selected_variant.map(|variant| variant.id.to_string()),
            available: selected_variant.is_some_and(|variant| variant.available_for_sale),
        }
    }

    /// The button is disabled unless a purchasable variant is selected.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        !self.available
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        if self.available { "Add to cart" } else { "Sold out" }
    }

    #[must_use]
    pub const fn button(&self) -> ButtonClass {
        ButtonClass::new(ButtonSize::Large, ButtonVariant::Primary)
    }
}

/// Product detail data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub title: String,
    pub vendor: String,
    /// Description HTML authored in the Shopify admin.
    pub description_html: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub gallery: GalleryView,
    pub options: Vec<OptionView>,
    pub add_to_cart: AddToCartView,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let selected = product.selected_variant.as_ref();
        let current: &[SelectedOption] =
            selected.map_or_else(|| product.first_variant_options(), |v| v.selected_options.as_slice());

        Self {
            title: product.title.clone(),
            vendor: product.vendor.clone(),
            description_html: product.description_html.clone(),
            price: selected.map_or_else(|| product.min_price.formatted(), |v| v.price.formatted()),
            compare_at_price: selected
                .and_then(|v| v.compare_at_price.as_ref())
                .filter(|money| money.price().is_some_and(|price| !price.is_zero()))
                .map(crate::shopify::Money::formatted),
            gallery: GalleryView::new(product),
            options: product
                .options
                .iter()
                .filter(|option| option.values.len() > 1)
                .map(|option| option_view(product, option, current))
                .collect(),
            add_to_cart: AddToCartView::new(selected),
        }
    }
}

/// Selection with `name` set to `value`, keeping the other choices.
fn with_option(current: &[SelectedOption], name: &str, value: &str) -> Vec<SelectedOption> {
    let mut options: Vec<SelectedOption> = current
        .iter()
        .map(|option| {
            if option.name == name {
                SelectedOption {
                    name: option.name.clone(),
                    value: value.to_string(),
                }
            } else {
                option.clone()
            }
        })
        .collect();

    if !options.iter().any(|option| option.name == name) {
        options.push(SelectedOption {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    options
}

fn option_view(product: &Product, option: &ProductOption, current: &[SelectedOption]) -> OptionView {
    let values = option
        .values
        .iter()
        .map(|value| {
            let selection = with_option(current, &option.name, value);
            let available = product.variants.iter().any(|variant| {
                variant.available_for_sale
                    && selection
                        .iter()
                        .all(|wanted| variant.selected_options.contains(wanted))
            });

            OptionValueView {
                value: value.clone(),
                url: variant_url(&product.handle, &selection),
                active: current
                    .iter()
                    .any(|chosen| chosen.name == option.name && &chosen.value == value),
                available,
            }
        })
        .collect();

    OptionView {
        name: option.name.clone(),
        values,
    }
}

/// Options requested through the query string (`?Size=Small&Color=Green`).
fn selected_options(query: Vec<(String, String)>) -> Vec<SelectedOption> {
    query
        .into_iter()
        .filter(|(name, value)| !name.is_empty() && !value.is_empty())
        .map(|(name, value)| SelectedOption { name, value })
        .collect()
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: LayoutView,
    pub product: ProductView,
}

/// Display product detail page.
///
/// Without a selection in the query string the visitor is redirected to the
/// first variant, so the page always shows a purchasable selection.
#[instrument(skip(state, nonce))]
pub async fn show(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(handle): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    nonce: CspNonce,
) -> Result<Response> {
    let not_found = || AppError::NotFound(format!("Product {handle} not found"));
    let parsed = Handle::parse(&handle).map_err(|_| not_found())?;
    let options = selected_options(query);

    let (navigation, product) = tokio::join!(
        Navigation::load(&state, uri.path()),
        state.storefront().product(parsed.as_str(), &options),
    );
    let product = product?.ok_or_else(not_found)?;

    if let Some(url) = first_variant_redirect(&product, &options) {
        return Ok(Redirect::to(&url).into_response());
    }

    Ok(ProductShowTemplate {
        layout: LayoutView::new(
            state.config().site.page_title(&product.title),
            &nonce,
            navigation,
        ),
        product: ProductView::from(&product),
    }
    .into_response())
}

/// URL of the first variant when nothing was selected.
fn first_variant_redirect(product: &Product, requested: &[SelectedOption]) -> Option<String> {
    if !requested.is_empty() || product.selected_variant.is_some() {
        return None;
    }
    let options = product.first_variant_options();
    (!options.is_empty()).then(|| variant_url(&product.handle, options))
}
