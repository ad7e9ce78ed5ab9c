//! API layer - gRPC service implementations

mod conversions;
mod grpc_service;
mod proto_converters;

pub use conversions::{parse_grpc_timeout, request_context};
pub use grpc_service::ProductServiceImpl;
