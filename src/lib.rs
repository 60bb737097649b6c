//! Shortlink - a URL shortener service core
//!
//! A bounded, least-used-evicting lookup cache in front of a durable
//! SQLite store of record, exposed through a small REST API.

pub mod alias;
pub mod api;
pub mod cache;
pub mod config;
pub mod deadline;
pub mod error;
pub mod models;
pub mod storage;

pub use api::AppState;
pub use config::Config;
pub use deadline::Deadline;
