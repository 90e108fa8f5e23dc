//! Product type conversion functions.

use crate::shopify::types::{
    Image, Money, PageInfo, Product, ProductOption, ProductPage, ProductVariant, SelectedOption,
};

use super::super::queries::{
    ImageFields, MoneyFields, PageInfoFields, ProductConnectionFields, ProductCardFields,
    VariantFields, product,
};

pub fn convert_money(money: MoneyFields) -> Money {
    Money {
        amount: money.amount,
        currency_code: money.currency_code,
    }
}

pub fn convert_image(image: ImageFields) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text.filter(|alt| !alt.trim().is_empty()),
        width: image.width,
        height: image.height,
    }
}

pub fn convert_variant(variant: VariantFields) -> ProductVariant {
    ProductVariant {
        id: variant.id,
        title: variant.title,
        available_for_sale: variant.available_for_sale,
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|opt| SelectedOption {
                name: opt.name,
                value: opt.value,
            })
            .collect(),
        price: convert_money(variant.price),
        compare_at_price: variant.compare_at_price.map(convert_money),
        image: variant.image.map(convert_image),
        product_handle: variant.product.handle,
        product_title: variant.product.title,
    }
}

pub fn convert_page_info(page_info: PageInfoFields) -> PageInfo {
    PageInfo {
        has_next_page: page_info.has_next_page,
        has_previous_page: page_info.has_previous_page,
        start_cursor: page_info.start_cursor,
        end_cursor: page_info.end_cursor,
    }
}

/// Convert a grid/listing product. Detail-only fields are left empty.
pub fn convert_product_card(card: ProductCardFields) -> Product {
    Product {
        id: card.id,
        handle: card.handle,
        title: card.title,
        vendor: String::new(),
        description: String::new(),
        description_html: String::new(),
        featured_image: card.featured_image.map(convert_image),
        images: Vec::new(),
        options: Vec::new(),
        min_price: convert_money(card.price_range.min_variant_price),
        selected_variant: None,
        variants: card.variants.nodes.into_iter().map(convert_variant).collect(),
    }
}

pub fn convert_product_page(connection: ProductConnectionFields) -> ProductPage {
    ProductPage {
        products: connection
            .nodes
            .into_iter()
            .map(convert_product_card)
            .collect(),
        page_info: convert_page_info(connection.page_info),
    }
}

/// Convert a product detail response.
pub fn convert_product(product: product::ProductFields) -> Product {
    Product {
        id: product.id,
        handle: product.handle,
        title: product.title,
        vendor: product.vendor,
        description: product.description,
        description_html: product.description_html,
        featured_image: product.featured_image.map(convert_image),
        images: product.images.nodes.into_iter().map(convert_image).collect(),
        options: product
            .options
            .into_iter()
            .map(|opt| ProductOption {
                name: opt.name,
                values: opt.option_values.into_iter().map(|v| v.name).collect(),
            })
            .collect(),
        min_price: convert_money(product.price_range.min_variant_price),
        selected_variant: product.selected_variant.map(convert_variant),
        variants: product
            .variants
            .nodes
            .into_iter()
            .map(convert_variant)
            .collect(),
    }
}
