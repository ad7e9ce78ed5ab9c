use std::sync::Arc;

use cuba_bootstrap::{Infrastructure, build_reflection, run_server};
use cuba_errors::AppError;
use tonic::transport::Server;
use tracing::info;

use product_catalog::FILE_DESCRIPTOR_SET;
use product_catalog::api::ProductServiceImpl;
use product_catalog::application::ServiceHandler;
use product_catalog::infrastructure::persistence::{SqliteProductRepository, ensure_schema};
use product_catalog::proto::product_service_server::ProductServiceServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server("config", |infra: Infrastructure, mut server: Server| async move {
        info!("Initializing product-catalog service...");

        let pool = infra.sqlite_pool();
        ensure_schema(&pool).await?;

        let product_repo = Arc::new(SqliteProductRepository::new(pool));
        let handler = Arc::new(ServiceHandler::new(product_repo));
        let service = ProductServiceImpl::new(handler, infra.shutdown_token());

        let reflection_service = build_reflection(&[FILE_DESCRIPTOR_SET])
            .map_err(|e| AppError::internal(format!("Failed to build reflection service: {}", e)))?;

        Ok(server
            .add_service(ProductServiceServer::new(service))
            .add_service(reflection_service))
    })
    .await
}
