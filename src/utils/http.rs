// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::ApiConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Short description of a response body for error messages.
pub fn body_excerpt(body: &str) -> String {
    const LIMIT: usize = 120;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_from_defaults() {
        assert!(create_async_client(&ApiConfig::default()).is_ok());
    }

    #[test]
    fn test_body_excerpt_truncates_on_char_boundary() {
        let long = "ሀ".repeat(200);
        let excerpt = body_excerpt(&long);
        assert_eq!(excerpt.chars().count(), 121);
        assert!(excerpt.ends_with('…'));
        assert_eq!(body_excerpt("  ok  "), "ok");
    }
}
