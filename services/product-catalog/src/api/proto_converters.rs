//! Domain to Proto conversions

use cuba_common::PagedResult;

use crate::domain::entities::{Product, ProductPrice};
use crate::proto;

pub fn product_to_proto(product: Product) -> proto::Product {
    proto::Product {
        id: product.id.into_inner(),
        name: product.name,
        description: product.description,
        price: product.price,
        stock: product.stock,
    }
}

pub fn product_price_to_proto(price: ProductPrice) -> proto::ProductPrice {
    proto::ProductPrice {
        id: price.id.into_inner(),
        price: price.price,
        stock: price.stock,
    }
}

/// 总数超出 i32 范围时截断为 `i32::MAX`
pub fn paged_products_to_proto(result: PagedResult<Product>) -> proto::ListProductsResponse {
    proto::ListProductsResponse {
        total: i32::try_from(result.total).unwrap_or(i32::MAX),
        products: result.items.into_iter().map(product_to_proto).collect(),
    }
}
