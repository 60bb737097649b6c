//! API Module
//!
//! HTTP handlers and routing for the shortener REST API.
//!
//! # Endpoints
//! - `POST /save` - Store a short link
//! - `GET /:alias` - Resolve an alias and redirect
//! - `GET /u/:owner/:alias` - Resolve in an explicit owner namespace
//! - `PUT /rename` - Move a link to a new alias
//! - `DELETE /:alias` - Delete a link
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
