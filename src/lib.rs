//! Wimbledon finals API library.

pub mod config;
pub mod dataset;
pub mod http;
pub mod lifecycle;
pub mod lookup;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
