mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::get_test_pool;
use cuba_bootstrap::{ShutdownController, serve_until_drained};
use cuba_errors::{AppError, AppResult};
use product_catalog::api::ProductServiceImpl;
use product_catalog::application::ServiceHandler;
use product_catalog::domain::entities::{Product, ProductPrice};
use product_catalog::domain::repositories::ProductRepository;
use product_catalog::domain::value_objects::ProductId;
use product_catalog::infrastructure::persistence::SqliteProductRepository;
use product_catalog::proto::product_service_client::ProductServiceClient;
use product_catalog::proto::product_service_server::{ProductService, ProductServiceServer};
use product_catalog::proto::{
    CreateProductRequest, GetProductPriceRequest, GetProductRequest, ListProductsRequest,
};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::sync::{Notify, oneshot};
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Server};
use tonic::{Code, Request};

fn service(pool: SqlitePool, shutdown: CancellationToken) -> ProductServiceImpl {
    let repo = Arc::new(SqliteProductRepository::new(pool));
    ProductServiceImpl::new(Arc::new(ServiceHandler::new(repo)), shutdown)
}

async fn test_service() -> ProductServiceImpl {
    service(get_test_pool().await, CancellationToken::new())
}

fn widget_request() -> CreateProductRequest {
    CreateProductRequest {
        name: "Widget".to_string(),
        description: "A widget".to_string(),
        price: 9.99,
        stock: 5,
    }
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let svc = test_service().await;

    let created = svc
        .create_product(Request::new(widget_request()))
        .await
        .unwrap()
        .into_inner();
    assert!(!created.id.is_empty());
    assert_eq!(created.name, "Widget");
    assert_eq!(created.description, "A widget");
    assert_eq!(created.price, 9.99);
    assert_eq!(created.stock, 5);

    let fetched = svc
        .get_product(Request::new(GetProductRequest {
            id: created.id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_widget_scenario_listed_with_total() {
    let svc = test_service().await;
    let created = svc
        .create_product(Request::new(widget_request()))
        .await
        .unwrap()
        .into_inner();

    let listed = svc
        .list_products(Request::new(ListProductsRequest {
            page: 1,
            page_size: 10,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(listed.products, vec![created]);
    assert!(listed.total >= 1);
}

#[tokio::test]
async fn test_empty_catalog() {
    let svc = test_service().await;

    let listed = svc
        .list_products(Request::new(ListProductsRequest {
            page: 1,
            page_size: 10,
        }))
        .await
        .unwrap()
        .into_inner();
    assert!(listed.products.is_empty());
    assert_eq!(listed.total, 0);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let svc = test_service().await;

    let status = svc
        .get_product(Request::new(GetProductRequest {
            id: "nonexistent-id".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    let status = svc
        .get_product_price(Request::new(GetProductPriceRequest {
            id: "nonexistent-id".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
}

#[tokio::test]
async fn test_get_price_matches_stored_row() {
    let svc = test_service().await;
    let created = svc
        .create_product(Request::new(CreateProductRequest {
            name: "Gadget".to_string(),
            description: String::new(),
            price: 12.25,
            stock: 40,
        }))
        .await
        .unwrap()
        .into_inner();

    let price = svc
        .get_product_price(Request::new(GetProductPriceRequest {
            id: created.id.clone(),
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(price.id, created.id);
    assert_eq!(price.price, 12.25);
    assert_eq!(price.stock, 40);
}

#[tokio::test]
async fn test_pages_are_stable_and_non_overlapping() {
    let svc = test_service().await;
    for i in 0..12 {
        svc.create_product(Request::new(CreateProductRequest {
            name: format!("Product {}", i),
            description: String::new(),
            price: i as f64,
            stock: i,
        }))
        .await
        .unwrap();
    }

    let everything = svc
        .list_products(Request::new(ListProductsRequest {
            page: 1,
            page_size: 100,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(everything.products.len(), 12);
    assert_eq!(everything.total, 12);

    let mut concatenated = Vec::new();
    for page in 1..=3 {
        let listed = svc
            .list_products(Request::new(ListProductsRequest { page, page_size: 4 }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(listed.total, 12);
        concatenated.extend(listed.products);
    }
    assert_eq!(concatenated, everything.products);

    let mut ids: Vec<_> = concatenated.iter().map(|p| p.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 12);
}

#[tokio::test]
async fn test_out_of_range_pagination_is_clamped() {
    let svc = test_service().await;
    for i in 0..15 {
        svc.create_product(Request::new(CreateProductRequest {
            name: format!("Product {}", i),
            description: String::new(),
            price: 1.0,
            stock: 1,
        }))
        .await
        .unwrap();
    }

    let list = |page: i32, page_size: i32| {
        svc.list_products(Request::new(ListProductsRequest { page, page_size }))
    };

    let oversized = list(1, 200).await.unwrap().into_inner();
    let default_size = list(1, 10).await.unwrap().into_inner();
    assert_eq!(oversized.products.len(), 10);
    assert_eq!(oversized, default_size);

    let page_zero = list(0, 5).await.unwrap().into_inner();
    let page_one = list(1, 5).await.unwrap().into_inner();
    assert_eq!(page_zero, page_one);

    let beyond = list(99, 10).await.unwrap().into_inner();
    assert!(beyond.products.is_empty());
    assert_eq!(beyond.total, 15);
}

/// 只让 COUNT 失败的仓储包装
struct FailingCountRepository {
    inner: SqliteProductRepository,
}

#[async_trait]
impl ProductRepository for FailingCountRepository {
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        self.inner.find_by_id(id).await
    }

    async fn find_price(&self, id: &ProductId) -> AppResult<Option<ProductPrice>> {
        self.inner.find_price(id).await
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Product>> {
        self.inner.list(limit, offset).await
    }

    async fn count(&self) -> AppResult<i64> {
        Err(AppError::database("database is locked"))
    }

    async fn save(&self, product: &Product) -> AppResult<()> {
        self.inner.save(product).await
    }
}

#[tokio::test]
async fn test_count_failure_still_returns_page() {
    let repo = FailingCountRepository {
        inner: SqliteProductRepository::new(get_test_pool().await),
    };
    let svc = ProductServiceImpl::new(
        Arc::new(ServiceHandler::new(Arc::new(repo))),
        CancellationToken::new(),
    );
    let created = svc
        .create_product(Request::new(widget_request()))
        .await
        .unwrap()
        .into_inner();

    let listed = svc
        .list_products(Request::new(ListProductsRequest {
            page: 1,
            page_size: 10,
        }))
        .await
        .unwrap()
        .into_inner();
    assert_eq!(listed.products, vec![created]);
    assert_eq!(listed.total, 0);
}

#[tokio::test]
async fn test_page_failure_is_internal() {
    let pool = get_test_pool().await;
    let svc = service(pool.clone(), CancellationToken::new());
    sqlx::query("DROP TABLE products").execute(&pool).await.unwrap();

    let status = svc
        .list_products(Request::new(ListProductsRequest {
            page: 1,
            page_size: 10,
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Internal);

    let status = svc
        .get_product(Request::new(GetProductRequest {
            id: "any".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Internal);
}

#[tokio::test]
async fn test_cancelled_process_token_rejects_requests() {
    let shutdown = CancellationToken::new();
    let svc = service(get_test_pool().await, shutdown.clone());
    shutdown.cancel();

    let status = svc
        .get_product(Request::new(GetProductRequest {
            id: "any".to_string(),
        }))
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Cancelled);
}

#[tokio::test]
async fn test_end_to_end_over_grpc() {
    let pool = get_test_pool().await;
    let shutdown = CancellationToken::new();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.clone();
    let server = tokio::spawn(
        Server::builder()
            .add_service(ProductServiceServer::new(service(pool, shutdown.clone())))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                server_shutdown.cancelled().await
            }),
    );

    let channel = Channel::from_shared(format!("http://{}", addr))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let mut client = ProductServiceClient::new(channel);

    let created = client
        .create_product(widget_request())
        .await
        .unwrap()
        .into_inner();
    let fetched = client
        .get_product(GetProductRequest {
            id: created.id.clone(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(fetched, created);

    let status = client
        .get_product(GetProductRequest {
            id: "nonexistent-id".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);

    shutdown.cancel();
    server.await.unwrap().unwrap();
}

/// 保存时先挂起，直到测试放行
struct GatedSaveRepository {
    inner: SqliteProductRepository,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl ProductRepository for GatedSaveRepository {
    async fn find_by_id(&self, id: &ProductId) -> AppResult<Option<Product>> {
        self.inner.find_by_id(id).await
    }

    async fn find_price(&self, id: &ProductId) -> AppResult<Option<ProductPrice>> {
        self.inner.find_price(id).await
    }

    async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<Product>> {
        self.inner.list(limit, offset).await
    }

    async fn count(&self) -> AppResult<i64> {
        self.inner.count().await
    }

    async fn save(&self, product: &Product) -> AppResult<()> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.save(product).await
    }
}

#[tokio::test]
async fn test_shutdown_drains_in_flight_create() {
    let pool = get_test_pool().await;
    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let repo = GatedSaveRepository {
        inner: SqliteProductRepository::new(pool.clone()),
        entered: entered.clone(),
        release: release.clone(),
    };

    let controller = ShutdownController::new();
    let svc = ProductServiceImpl::new(
        Arc::new(ServiceHandler::new(Arc::new(repo))),
        controller.token(),
    );
    let router = Server::builder().add_service(ProductServiceServer::new(svc));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (signal_tx, signal_rx) = oneshot::channel::<()>();
    let server_controller = controller.clone();
    let server = tokio::spawn(async move {
        serve_until_drained(
            router,
            TcpListenerStream::new(listener),
            async {
                let _ = signal_rx.await;
            },
            &server_controller,
        )
        .await
    });

    let mut client = ProductServiceClient::connect(format!("http://{}", addr))
        .await
        .unwrap();
    let call = tokio::spawn(async move { client.create_product(widget_request()).await });

    entered.notified().await;
    signal_tx.send(()).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // 排空期间进程级令牌保持有效
    assert!(!controller.token().is_cancelled());

    release.notify_one();
    let created = call.await.unwrap().unwrap().into_inner();
    assert_eq!(created.name, "Widget");

    server.await.unwrap().unwrap();
    assert!(controller.token().is_cancelled());

    let repo = SqliteProductRepository::new(pool);
    let stored = repo.find_by_id(&ProductId::from(created.id.as_str())).await.unwrap();
    assert!(stored.is_some());
}
