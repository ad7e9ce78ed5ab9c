//! gRPC service implementation

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tonic::{Request, Response, Status};

use crate::application::{
    CreateProductCommand, GetProductPriceQuery, GetProductQuery, ListProductsQuery, ServiceHandler,
};
use crate::proto::product_service_server::ProductService;
use crate::proto::{
    CreateProductRequest, GetProductPriceRequest, GetProductRequest, ListProductsRequest,
    ListProductsResponse, Product, ProductPrice,
};

use super::conversions::request_context;
use super::proto_converters::*;

pub struct ProductServiceImpl {
    handler: Arc<ServiceHandler>,
    shutdown: CancellationToken,
}

impl ProductServiceImpl {
    /// `shutdown` 为进程级令牌，每个请求从它派生子令牌
    pub fn new(handler: Arc<ServiceHandler>, shutdown: CancellationToken) -> Self {
        Self { handler, shutdown }
    }
}

#[tonic::async_trait]
impl ProductService for ProductServiceImpl {
    async fn get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> Result<Response<Product>, Status> {
        let ctx = request_context(request.metadata(), &self.shutdown);
        let _guard = ctx.cancel_on_drop();
        let req = request.into_inner();

        let product = self
            .handler
            .get_product(&ctx, GetProductQuery { id: req.id.into() })
            .await?;

        Ok(Response::new(product_to_proto(product)))
    }

    async fn list_products(
        &self,
        request: Request<ListProductsRequest>,
    ) -> Result<Response<ListProductsResponse>, Status> {
        let ctx = request_context(request.metadata(), &self.shutdown);
        let _guard = ctx.cancel_on_drop();
        let req = request.into_inner();

        let result = self
            .handler
            .list_products(
                &ctx,
                ListProductsQuery {
                    page: req.page,
                    page_size: req.page_size,
                },
            )
            .await?;

        Ok(Response::new(paged_products_to_proto(result)))
    }

    async fn create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<Product>, Status> {
        let ctx = request_context(request.metadata(), &self.shutdown);
        let _guard = ctx.cancel_on_drop();
        let req = request.into_inner();

        let cmd = CreateProductCommand {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
        };
        let product = self.handler.create_product(&ctx, cmd).await?;

        Ok(Response::new(product_to_proto(product)))
    }

    async fn get_product_price(
        &self,
        request: Request<GetProductPriceRequest>,
    ) -> Result<Response<ProductPrice>, Status> {
        let ctx = request_context(request.metadata(), &self.shutdown);
        let _guard = ctx.cancel_on_drop();
        let req = request.into_inner();

        let price = self
            .handler
            .get_product_price(&ctx, GetProductPriceQuery { id: req.id.into() })
            .await?;

        Ok(Response::new(product_price_to_proto(price)))
    }
}
