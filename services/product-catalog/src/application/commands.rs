//! Product commands

/// 创建商品命令
///
/// 字段原样落库，不做校验
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i32,
}
