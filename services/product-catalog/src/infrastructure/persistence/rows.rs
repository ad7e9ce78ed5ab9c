//! 数据库行映射结构

use sqlx::FromRow;

use crate::domain::entities::Product;
use crate::domain::value_objects::ProductId;

/// 商品数据库行
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId(row.id),
            name: row.name,
            description: row.description.unwrap_or_default(),
            price: row.price,
            stock: row.stock,
        }
    }
}

/// 价格与库存数据库行
#[derive(Debug, FromRow)]
pub struct ProductPriceRow {
    pub price: f64,
    pub stock: i32,
}
