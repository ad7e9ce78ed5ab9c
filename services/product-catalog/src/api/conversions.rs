//! gRPC metadata -> 请求上下文

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tonic::metadata::MetadataMap;

use crate::application::RequestContext;

const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// 为一次调用构建上下文
///
/// 取消令牌从服务级令牌派生，进程关闭时在途调用随之取消；
/// 客户端通过 `grpc-timeout` 传入的截止时间一并生效
pub fn request_context(metadata: &MetadataMap, parent: &CancellationToken) -> RequestContext {
    let ctx = RequestContext::new(parent.child_token());
    match parse_grpc_timeout(metadata) {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx,
    }
}

/// 解析 `grpc-timeout` 头，格式为最多 8 位数字加单位（H/M/S/m/u/n）
///
/// 缺失或格式错误时返回 `None`，按无截止时间处理
pub fn parse_grpc_timeout(metadata: &MetadataMap) -> Option<Duration> {
    let value = metadata.get(GRPC_TIMEOUT_HEADER)?.to_str().ok()?;
    if value.len() < 2 || value.len() > 9 {
        return None;
    }

    let (digits, unit) = value.split_at(value.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    let timeout = match unit {
        "H" => Duration::from_secs(amount * 60 * 60),
        "M" => Duration::from_secs(amount * 60),
        "S" => Duration::from_secs(amount),
        "m" => Duration::from_millis(amount),
        "u" => Duration::from_micros(amount),
        "n" => Duration::from_nanos(amount),
        _ => return None,
    };
    Some(timeout)
}
