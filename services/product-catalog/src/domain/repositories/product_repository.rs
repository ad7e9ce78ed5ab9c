//! 商品仓储接口

use async_trait::async_trait;
use cuba_errors::AppResult;

use crate::domain::entities::{Product, ProductPrice};
use crate::domain::value_objects::ProductId;

/// 商品仓储接口
///
/// 查询不到记录返回 `Ok(None)`，与存储错误 `Err` 区分开
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 根据 ID 查找商品
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>>;

    /// 只查询价格和库存
    async fn find_price(&self, id: &ProductId) -> AppResult<Option<ProductPrice>>;

    /// 按 ID 升序分页
    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Product>>;

    /// 全表记录数
    async fn count(&self) -> AppResult<i64>;

    /// 保存商品（新建），ID 冲突返回存储错误
    async fn save(&self, product: &Product) -> AppResult<()>;
}
