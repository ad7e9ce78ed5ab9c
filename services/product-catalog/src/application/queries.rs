//! Product queries

use crate::domain::value_objects::ProductId;

/// 获取商品查询
#[derive(Debug, Clone)]
pub struct GetProductQuery {
    pub id: ProductId,
}

/// 商品列表查询，分页参数为客户端原始值，由 handler 规范化
#[derive(Debug, Clone)]
pub struct ListProductsQuery {
    pub page: i32,
    pub page_size: i32,
}

/// 获取商品价格查询
#[derive(Debug, Clone)]
pub struct GetProductPriceQuery {
    pub id: ProductId,
}
