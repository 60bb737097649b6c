//! Alias Generation
//!
//! Random short aliases for requests that do not supply one.

use rand::Rng;

/// Length of generated aliases.
pub const DEFAULT_ALIAS_LENGTH: usize = 16;

const SYMBOLS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a random alphanumeric alias of the given length.
pub fn generate(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| SYMBOLS[rng.gen_range(0..SYMBOLS.len())] as char)
        .collect()
}

/// Generates an alias of the default length.
pub fn default_alias() -> String {
    generate(DEFAULT_ALIAS_LENGTH)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length() {
        assert_eq!(generate(8).len(), 8);
        assert_eq!(default_alias().len(), DEFAULT_ALIAS_LENGTH);
    }

    #[test]
    fn test_generate_alphanumeric_only() {
        let alias = generate(64);
        assert!(alias.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_zero_length() {
        assert_eq!(generate(0), "");
    }

    #[test]
    fn test_generated_aliases_vary() {
        // Collisions over 16 alphanumeric characters are vanishingly rare.
        assert_ne!(default_alias(), default_alias());
    }
}
