//! 通用类型定义

use serde::{Deserialize, Serialize};

/// 默认每页条数
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// 每页条数上限，超出时回落到默认值而不是截断到上限
pub const MAX_PAGE_SIZE: u32 = 100;

/// 分页参数
///
/// 通过 [`Pagination::normalize`] 构造的值总是落在合法范围内：
/// `page >= 1`，`1 <= page_size <= MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// 规范化客户端传入的分页参数，从不拒绝请求
    ///
    /// - `page < 1` 视为 1
    /// - `page_size < 1` 或 `page_size > MAX_PAGE_SIZE` 视为 `DEFAULT_PAGE_SIZE`
    pub fn normalize(page: i32, page_size: i32) -> Self {
        let page = if page < 1 { 1 } else { page as u32 };
        let page_size = if page_size < 1 || page_size as u32 > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            page_size as u32
        };

        Self { page, page_size }
    }

    /// 偏移量，64 位计算避免大页码溢出
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.page_size as i64
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: &Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        }
    }
}
