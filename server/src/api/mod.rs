//! HTTP adapter: axum server, response types and the conversion log stream.

pub mod logs;
pub mod server;
pub mod types;
