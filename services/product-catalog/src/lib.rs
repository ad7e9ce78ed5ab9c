//! product-catalog - 商品目录服务
//!
//! 存储商品记录并通过 gRPC 提供查询、分页、创建和价格查询

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

pub mod proto {
    tonic::include_proto!("product");
}

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("product_descriptor");
