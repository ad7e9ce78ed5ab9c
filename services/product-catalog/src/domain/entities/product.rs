//! 商品实体

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::ProductId;

/// 商品
///
/// 只能通过创建产生，没有更新和删除。名称、价格、库存在这一层不做校验，
/// 空名称或负数原样保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}

impl Product {
    /// 创建新商品，ID 由服务端生成
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64, stock: i32) -> Self {
        Self {
            id: ProductId::generate(),
            name: name.into(),
            description: description.into(),
            price,
            stock,
        }
    }
}

/// 商品价格与库存
///
/// 结算、库存校验等热路径只需要这两个字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub id: ProductId,
    pub price: f64,
    pub stock: i32,
}
