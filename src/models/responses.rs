//! Response DTOs for the shortener API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for the save operation (POST /save)
#[derive(Debug, Clone, Serialize)]
pub struct SaveResponse {
    /// The alias the link was stored under
    pub alias: String,
    /// The path the short link is served from
    pub short_path: String,
}

impl SaveResponse {
    /// Creates a new SaveResponse for the stored alias.
    pub fn new(owner: &str, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        let short_path = if owner.is_empty() {
            format!("/{}", alias)
        } else {
            format!("/u/{}/{}", owner, alias)
        };
        Self { alias, short_path }
    }
}

/// Response body for the rename operation (PUT /rename)
#[derive(Debug, Clone, Serialize)]
pub struct RenameResponse {
    /// Success message
    pub message: String,
    /// The alias the link now lives under
    pub new_alias: String,
}

impl RenameResponse {
    /// Creates a new RenameResponse.
    pub fn new(new_alias: impl Into<String>) -> Self {
        let new_alias = new_alias.into();
        Self {
            message: format!("Alias renamed to '{}'", new_alias),
            new_alias,
        }
    }
}

/// Response body for the delete operation (DELETE /:alias)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The alias that was deleted
    pub alias: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse.
    pub fn new(alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            message: format!("Alias '{}' deleted successfully", alias),
            alias,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_response_global_path() {
        let resp = SaveResponse::new("", "promo");
        assert_eq!(resp.short_path, "/promo");
    }

    #[test]
    fn test_save_response_owner_path() {
        let resp = SaveResponse::new("alice", "promo");
        assert_eq!(resp.short_path, "/u/alice/promo");
    }

    #[test]
    fn test_rename_response_serialize() {
        let resp = RenameResponse::new("fresh");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("fresh"));
    }

    #[test]
    fn test_delete_response_serialize() {
        let resp = DeleteResponse::new("gone");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("gone"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
    }
}
