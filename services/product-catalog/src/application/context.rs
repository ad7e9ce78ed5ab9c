//! 请求上下文
//!
//! 每次调用携带一个取消令牌和可选的截止时间，存储调用与两者竞争，
//! 任意一个先触发就丢弃存储 future 并返回取消类错误

use std::future::Future;
use std::time::Duration;

use cuba_errors::{AppError, AppResult};
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// 从现在起 `timeout` 后到期
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// 守卫被 drop 时取消本次调用的令牌
    ///
    /// 传输层丢弃 handler future（客户端断开）时，守卫随之 drop
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.cancel.clone().drop_guard()
    }

    /// 在取消/超时约束下执行一次存储调用
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                Err(AppError::cancelled(format!("{} cancelled by caller", operation)))
            }
            _ = deadline => {
                Err(AppError::deadline_exceeded(format!("{} deadline exceeded", operation)))
            }
            result = fut => result,
        }
    }
}
