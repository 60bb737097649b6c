//! Request DTOs for the shortener API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use url::Url;

// == Limits ==
/// Maximum allowed alias length in characters
pub const MAX_ALIAS_LENGTH: usize = 64;

/// Maximum allowed target URL length in characters
pub const MAX_URL_LENGTH: usize = 2048;

fn validate_alias(alias: &str) -> Option<String> {
    if alias.is_empty() {
        return Some("Alias cannot be empty".to_string());
    }
    if alias.len() > MAX_ALIAS_LENGTH {
        return Some(format!(
            "Alias exceeds maximum length of {} characters",
            MAX_ALIAS_LENGTH
        ));
    }
    if !alias.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Some("Alias may only contain letters, digits, '-' and '_'".to_string());
    }
    None
}

/// Request body for the save operation (POST /save)
///
/// # Fields
/// - `url`: The target URL the alias should resolve to
/// - `alias`: Optional short alias (a random one is generated if omitted)
#[derive(Debug, Clone, Deserialize)]
pub struct SaveRequest {
    /// The target URL
    pub url: String,
    /// Optional alias
    #[serde(default)]
    pub alias: Option<String>,
}

impl SaveRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.is_empty() {
            return Some("Url cannot be empty".to_string());
        }
        if self.url.len() > MAX_URL_LENGTH {
            return Some(format!(
                "Url exceeds maximum length of {} characters",
                MAX_URL_LENGTH
            ));
        }
        if Url::parse(&self.url).is_err() {
            return Some("Url is not a valid absolute URL".to_string());
        }
        if let Some(alias) = &self.alias {
            return validate_alias(alias);
        }
        None
    }
}

/// Request body for the rename operation (PUT /rename)
///
/// # Fields
/// - `alias`: The existing alias to move
/// - `new_alias`: Optional target alias (a random one is generated if omitted)
#[derive(Debug, Clone, Deserialize)]
pub struct RenameRequest {
    /// The existing alias
    pub alias: String,
    /// Optional new alias
    #[serde(default)]
    pub new_alias: Option<String>,
}

impl RenameRequest {
    /// Validates the request data.
    pub fn validate(&self) -> Option<String> {
        if let Some(message) = validate_alias(&self.alias) {
            return Some(message);
        }
        if let Some(new_alias) = &self.new_alias {
            return validate_alias(new_alias);
        }
        None
    }
}
