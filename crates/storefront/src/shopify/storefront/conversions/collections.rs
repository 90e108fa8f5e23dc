//! Collection type conversion functions.

use crate::shopify::types::{Collection, CollectionPage};

use super::super::queries::{CollectionFields, collection_products};
use super::products::{convert_image, convert_product_page};

pub fn convert_collection(collection: CollectionFields) -> Collection {
    Collection {
        id: collection.id,
        handle: collection.handle,
        title: collection.title,
        description: collection.description,
        image: collection.image.map(convert_image),
    }
}

pub fn convert_collection_page(
    collection: collection_products::CollectionWithProducts,
) -> CollectionPage {
    CollectionPage {
        collection: convert_collection(collection.collection),
        products: convert_product_page(collection.products),
    }
}
