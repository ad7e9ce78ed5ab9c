//! Graceful Shutdown

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Shutdown 控制器
///
/// 进程级取消令牌，每个请求从它派生子令牌；gRPC 服务排空后才触发
#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// 触发关闭
    pub fn shutdown(&self) {
        info!("Triggering shutdown");
        self.token.cancel();
    }

    /// 进程级令牌
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}
