//! HTTP surface of Notela: REST handlers, configuration and the serve loop.

pub mod api;
pub mod config;
pub mod server;

pub use api::{ApiError, ApiRequest, ApiResponse, App, Method};
pub use config::ServerConfig;
