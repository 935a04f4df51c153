//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the transcript, health and version endpoints
//! - Transcript request handler and error responses
//! - Request logging middleware
//! - CORS middleware

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
