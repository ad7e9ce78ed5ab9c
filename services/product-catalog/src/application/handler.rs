//! Business logic handler

use std::sync::Arc;

use cuba_common::{PagedResult, Pagination};
use cuba_errors::{AppError, AppResult};
use tracing::{debug, info, instrument, warn};

use crate::domain::entities::{Product, ProductPrice};
use crate::domain::repositories::ProductRepository;

use super::commands::*;
use super::context::RequestContext;
use super::queries::*;

pub struct ServiceHandler {
    product_repo: Arc<dyn ProductRepository>,
}

impl ServiceHandler {
    pub fn new(product_repo: Arc<dyn ProductRepository>) -> Self {
        Self { product_repo }
    }

    /// 获取商品
    #[instrument(skip(self, ctx), fields(product_id = %query.id))]
    pub async fn get_product(
        &self,
        ctx: &RequestContext,
        query: GetProductQuery,
    ) -> AppResult<Product> {
        ctx.run("get_product", self.product_repo.find_by_id(&query.id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("product {} not found", query.id)))
    }

    /// 商品列表
    ///
    /// 分页数据读取失败直接返回错误；总数只是附带信息，统计失败时记 0 继续返回
    #[instrument(skip(self, ctx))]
    pub async fn list_products(
        &self,
        ctx: &RequestContext,
        query: ListProductsQuery,
    ) -> AppResult<PagedResult<Product>> {
        let pagination = Pagination::normalize(query.page, query.page_size);
        debug!(
            page = pagination.page,
            page_size = pagination.page_size,
            "Pagination normalized"
        );

        let items = ctx
            .run(
                "list_products",
                self.product_repo.list(pagination.limit(), pagination.offset()),
            )
            .await?;

        let total = match ctx.run("count_products", self.product_repo.count()).await {
            Ok(total) => u64::try_from(total).unwrap_or(0),
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Failed to count products, returning total = 0");
                0
            }
        };

        Ok(PagedResult::new(items, total, &pagination))
    }

    /// 创建商品
    #[instrument(skip(self, ctx, cmd), fields(name = %cmd.name))]
    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        cmd: CreateProductCommand,
    ) -> AppResult<Product> {
        let product = Product::new(cmd.name, cmd.description, cmd.price, cmd.stock);

        ctx.run("create_product", self.product_repo.save(&product))
            .await?;

        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// 获取商品价格与库存
    #[instrument(skip(self, ctx), fields(product_id = %query.id))]
    pub async fn get_product_price(
        &self,
        ctx: &RequestContext,
        query: GetProductPriceQuery,
    ) -> AppResult<ProductPrice> {
        ctx.run("get_product_price", self.product_repo.find_price(&query.id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("product {} not found", query.id)))
    }
}
