//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use cuba_config::AppConfig;
use cuba_errors::AppResult;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_stream::Stream;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::transport::server::{Connected, Router};
use tracing::{error, info};

use crate::health::{HealthChecker, HealthServer};
use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};
use crate::shutdown::ShutdownController;

/// 运行 gRPC 服务
///
/// 这是所有微服务的统一入口点。它负责：
/// 1. 加载配置
/// 2. 初始化运行时（日志）
/// 3. 创建基础设施资源（数据库连接池）
/// 4. 调用用户提供的闭包注册 gRPC 服务，闭包返回错误时进程直接退出
/// 5. 启动健康检查 HTTP 服务器
/// 6. 启动 gRPC 服务器，收到信号后排空在途请求再退出
///
/// # 示例
///
/// ```ignore
/// use cuba_bootstrap::run_server;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_server("config", |infra, mut server| async move {
///         let service = MyServiceImpl::new(infra.sqlite_pool());
///         Ok(server.add_service(MyServiceServer::new(service)))
///     })
///     .await
/// }
/// ```
pub async fn run_server<F, Fut>(
    config_dir: &str,
    server_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure, Server) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    // 3. 创建基础设施
    let shutdown = ShutdownController::new();
    let infra = Infrastructure::from_config(&config, shutdown.clone()).await?;
    let addr: SocketAddr = config.listen_addr().parse()?;

    // 4. 构建 gRPC 服务（在监听端口之前完成，失败即退出）
    let router = server_builder(infra.clone(), Server::builder()).await?;

    // 5. 启动健康检查 HTTP 服务器
    let health_checker = Arc::new(HealthChecker::new(infra.sqlite_pool()));
    let health_server = HealthServer::new(health_checker, config.health_port());
    let health_shutdown = shutdown.token();
    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.serve(health_shutdown).await {
            error!("Health server error: {}", e);
        }
    });

    // 6. 启动服务器
    info!(%addr, "gRPC server starting");

    let listener = TcpListener::bind(addr).await?;
    serve_until_drained(
        router,
        TcpListenerStream::new(listener),
        shutdown_signal(),
        &shutdown,
    )
    .await?;

    // 7. 清理
    let _ = health_handle.await;
    infra.sqlite_pool().close().await;

    info!("Service stopped");

    Ok(())
}

/// 在 `incoming` 上提供 gRPC 服务直到 `signal` 触发
///
/// 信号到达后不再接受新请求，等在途请求全部完成才返回；
/// 进程级令牌在排空之后才取消，在途调用不会因关闭而被中止
pub async fn serve_until_drained<I, IO, IE, S>(
    router: Router,
    incoming: I,
    signal: S,
    shutdown: &ShutdownController,
) -> Result<(), tonic::transport::Error>
where
    I: Stream<Item = Result<IO, IE>>,
    IO: AsyncRead + AsyncWrite + Connected + Unpin + Send + 'static,
    IE: Into<Box<dyn std::error::Error + Send + Sync>>,
    S: Future<Output = ()>,
{
    let result = router.serve_with_incoming_shutdown(incoming, signal).await;
    info!("In-flight requests drained");
    shutdown.shutdown();
    result
}
