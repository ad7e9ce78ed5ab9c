//! cuba-bootstrap - 统一服务启动骨架
//!
//! 所有服务复用的启动逻辑

mod health;
mod infrastructure;
mod reflection;
mod runtime;
mod shutdown;
mod starter;

pub use health::*;
pub use infrastructure::*;
pub use reflection::*;
pub use runtime::*;
pub use shutdown::*;
pub use starter::*;
