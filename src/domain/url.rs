// src/domain/url.rs
//
// The catalog API hands out protocol-relative links (`//host/path`) for
// posters and embedded players.

/// Upgrade a protocol-relative URL to https; other values pass through.
pub fn normalize_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("//cdn.example/poster.jpg"),
            "https://cdn.example/poster.jpg"
        );
        assert_eq!(
            normalize_url("https://cdn.example/poster.jpg"),
            "https://cdn.example/poster.jpg"
        );
        assert_eq!(normalize_url("/relative/path.jpg"), "/relative/path.jpg");
        assert_eq!(normalize_url(""), "");
    }
}
