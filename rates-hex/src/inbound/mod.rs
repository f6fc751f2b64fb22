//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod handlers;
pub mod params;
pub mod response;
mod server;

pub use server::HttpServer;
