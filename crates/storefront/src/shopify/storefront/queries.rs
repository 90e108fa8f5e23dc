//! GraphQL query definitions for the Shopify Storefront API.
//!
//! The documents live in `graphql/storefront/`: one file per operation under
//! `queries/` and one per shared fragment under `fragments/`. Each operation is
//! a unit struct implementing [`GraphQLQuery`], with a snake_case module
//! holding its `Variables` and `ResponseData`. Fragments are spliced into the
//! documents at compile time, so every document carries exactly the fragments
//! it uses.

use graphql_client::{GraphQLQuery, QueryBody};
use highland_core::{CartGid, CartLineGid, CollectionGid, ProductGid, VariantGid};
use serde::{Deserialize, Serialize};

// =============================================================================
// Documents
// =============================================================================

/// Include a document from `graphql/storefront/`.
macro_rules! document {
    ($path:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/graphql/storefront/",
            $path
        ))
    };
}

/// Implement [`GraphQLQuery`] for an operation struct.
macro_rules! graphql_operation {
    ($name:ident, $module:ident, $document:expr) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: stringify!($name),
                }
            }
        }
    };
}

// =============================================================================
// Shared wire types
// =============================================================================

/// `{ nodes: [...] }` connection shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyFields {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFields {
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedOptionFields {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantProductFields {
    pub handle: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantFields {
    pub id: VariantGid,
    pub title: String,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOptionFields>,
    pub price: MoneyFields,
    pub compare_at_price: Option<MoneyFields>,
    pub image: Option<ImageFields>,
    pub product: VariantProductFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeFields {
    pub min_variant_price: MoneyFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCardFields {
    pub id: ProductGid,
    pub handle: String,
    pub title: String,
    pub featured_image: Option<ImageFields>,
    pub price_range: PriceRangeFields,
    pub variants: Nodes<VariantFields>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfoFields {
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConnectionFields {
    pub nodes: Vec<ProductCardFields>,
    pub page_info: PageInfoFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionFields {
    pub id: CollectionGid,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image: Option<ImageFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemFields {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    #[serde(default)]
    pub items: Vec<MenuItemFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuFields {
    pub id: String,
    pub items: Vec<MenuItemFields>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCostFields {
    pub total_amount: MoneyFields,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartLineFields {
    pub id: CartLineGid,
    pub quantity: i64,
    pub cost: CartLineCostFields,
    pub merchandise: VariantFields,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCostFields {
    pub subtotal_amount: Option<MoneyFields>,
    pub total_amount: Option<MoneyFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartDiscountCodeFields {
    pub code: String,
    pub applicable: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartFields {
    pub id: CartGid,
    pub checkout_url: Option<String>,
    pub total_quantity: i64,
    pub cost: CartCostFields,
    pub discount_codes: Vec<CartDiscountCodeFields>,
    pub lines: Nodes<CartLineFields>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartUserErrorFields {
    pub field: Option<Vec<String>>,
    pub message: String,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartFields>,
    pub user_errors: Vec<CartUserErrorFields>,
}

/// Pagination arguments shared by paginated product connections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInputFields {
    pub merchandise_id: VariantGid,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineUpdateInputFields {
    pub id: CartLineGid,
    pub quantity: i64,
}

// =============================================================================
// Collection queries
// =============================================================================

graphql_operation!(
    FeaturedCollection,
    featured_collection,
    concat!(
        document!("queries/featured_collection.graphql"),
        document!("fragments/collection.graphql"),
        document!("fragments/image.graphql")
    )
);

pub mod featured_collection {
    use super::{CollectionFields, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionFields>,
    }
}

graphql_operation!(
    CollectionProducts,
    collection_products,
    concat!(
        document!("queries/collection_products.graphql"),
        document!("fragments/collection.graphql"),
        document!("fragments/product_card.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/page_info.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod collection_products {
    use super::{CollectionFields, Deserialize, PaginationArgs, ProductConnectionFields, Serialize};

    #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
    pub struct ProductFilterInput {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub tag: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub filters: Option<Vec<ProductFilterInput>>,
        #[serde(flatten)]
        pub pagination: PaginationArgs,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CollectionWithProducts {
        #[serde(flatten)]
        pub collection: CollectionFields,
        pub products: ProductConnectionFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionWithProducts>,
    }
}

graphql_operation!(
    Collections,
    collections,
    concat!(
        document!("queries/collections.graphql"),
        document!("fragments/collection.graphql"),
        document!("fragments/image.graphql")
    )
);

pub mod collections {
    use super::{CollectionFields, Deserialize, Nodes, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: Nodes<CollectionFields>,
    }
}

// =============================================================================
// Product queries
// =============================================================================

graphql_operation!(
    RecommendedProducts,
    recommended_products,
    concat!(
        document!("queries/recommended_products.graphql"),
        document!("fragments/product_card.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod recommended_products {
    use super::{Deserialize, Nodes, ProductCardFields, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Nodes<ProductCardFields>,
    }
}

graphql_operation!(
    Catalog,
    catalog,
    concat!(
        document!("queries/catalog.graphql"),
        document!("fragments/product_card.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/page_info.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod catalog {
    use super::{Deserialize, PaginationArgs, ProductConnectionFields, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub query: Option<String>,
        #[serde(flatten)]
        pub pagination: PaginationArgs,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: ProductConnectionFields,
    }
}

graphql_operation!(
    SearchProducts,
    search_products,
    concat!(
        document!("queries/search_products.graphql"),
        document!("fragments/product_card.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod search_products {
    use super::{Deserialize, Nodes, ProductCardFields, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub query: String,
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Nodes<ProductCardFields>,
    }
}

graphql_operation!(
    Product,
    product,
    concat!(
        document!("queries/product.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod product {
    use super::{
        Deserialize, ImageFields, Nodes, PriceRangeFields, ProductGid, Serialize, VariantFields,
    };

    #[derive(Debug, Clone, Serialize)]
    pub struct SelectedOptionInput {
        pub name: String,
        pub value: String,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub handle: String,
        pub selected_options: Vec<SelectedOptionInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct OptionValueFields {
        pub name: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductOptionFields {
        pub name: String,
        pub option_values: Vec<OptionValueFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductFields {
        pub id: ProductGid,
        pub handle: String,
        pub title: String,
        #[serde(default)]
        pub vendor: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub description_html: String,
        pub featured_image: Option<ImageFields>,
        pub images: Nodes<ImageFields>,
        pub options: Vec<ProductOptionFields>,
        pub price_range: PriceRangeFields,
        pub selected_variant: Option<VariantFields>,
        pub variants: Nodes<VariantFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<ProductFields>,
    }
}

// =============================================================================
// Layout query
// =============================================================================

graphql_operation!(
    Layout,
    layout,
    concat!(
        document!("queries/layout.graphql"),
        document!("fragments/menu.graphql")
    )
);

pub mod layout {
    use super::{Deserialize, MenuFields, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub header_menu_handle: String,
        pub footer_menu_handle: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct DomainFields {
        pub url: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ShopFields {
        pub name: String,
        pub primary_domain: DomainFields,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub shop: ShopFields,
        pub header: Option<MenuFields>,
        pub footer: Option<MenuFields>,
    }
}

// =============================================================================
// Cart queries and mutations
// =============================================================================

graphql_operation!(
    Cart,
    cart,
    concat!(
        document!("queries/cart.graphql"),
        document!("fragments/cart.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod cart {
    use super::{CartFields, CartGid, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartGid,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<CartFields>,
    }
}

graphql_operation!(
    CartCreate,
    cart_create,
    concat!(
        document!("queries/cart_create.graphql"),
        document!("fragments/cart.graphql"),
        document!("fragments/cart_user_error.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod cart_create {
    use super::{CartLineInputFields, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct CartInput {
        pub lines: Vec<CartLineInputFields>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub input: CartInput,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartMutationPayload>,
    }
}

graphql_operation!(
    CartLinesAdd,
    cart_lines_add,
    concat!(
        document!("queries/cart_lines_add.graphql"),
        document!("fragments/cart.graphql"),
        document!("fragments/cart_user_error.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod cart_lines_add {
    use super::{CartGid, CartLineInputFields, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartGid,
        pub lines: Vec<CartLineInputFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartMutationPayload>,
    }
}

graphql_operation!(
    CartLinesUpdate,
    cart_lines_update,
    concat!(
        document!("queries/cart_lines_update.graphql"),
        document!("fragments/cart.graphql"),
        document!("fragments/cart_user_error.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod cart_lines_update {
    use super::{CartGid, CartLineUpdateInputFields, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartGid,
        pub lines: Vec<CartLineUpdateInputFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartMutationPayload>,
    }
}

graphql_operation!(
    CartLinesRemove,
    cart_lines_remove,
    concat!(
        document!("queries/cart_lines_remove.graphql"),
        document!("fragments/cart.graphql"),
        document!("fragments/cart_user_error.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod cart_lines_remove {
    use super::{CartGid, CartLineGid, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartGid,
        pub line_ids: Vec<CartLineGid>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartMutationPayload>,
    }
}

graphql_operation!(
    CartDiscountCodesUpdate,
    cart_discount_codes_update,
    concat!(
        document!("queries/cart_discount_codes_update.graphql"),
        document!("fragments/cart.graphql"),
        document!("fragments/cart_user_error.graphql"),
        document!("fragments/product_variant.graphql"),
        document!("fragments/image.graphql"),
        document!("fragments/money.graphql")
    )
);

pub mod cart_discount_codes_update {
    use super::{CartGid, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartGid,
        pub discount_codes: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_discount_codes_update: Option<CartMutationPayload>,
    }
}
