//! Application layer

pub mod commands;
pub mod context;
pub mod handler;
pub mod queries;

pub use commands::*;
pub use context::RequestContext;
pub use handler::ServiceHandler;
pub use queries::*;
