//! Models Module
//!
//! Request and response DTOs for the shortener REST API.

pub mod requests;
pub mod responses;

pub use requests::{RenameRequest, SaveRequest};
pub use responses::{
    DeleteResponse, ErrorResponse, HealthResponse, RenameResponse, SaveResponse,
};
