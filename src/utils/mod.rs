//! Utility functions and helpers.

pub mod http;
pub mod json;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Resolve a URL string against a base URL string.
///
/// Absolute `href`s are returned unchanged; an empty or unparsable base
/// leaves `href` as is.
pub fn resolve(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    match Url::parse(base_url) {
        Ok(base) => resolve_url(&base, href),
        Err(_) => format!("{base_url}{href}"),
    }
}

/// Extract the lower-cased host from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_lowercase()))
}

/// True if the URL's host is, or is a subdomain of, one of the blocked domains.
pub fn is_blocked_domain(url_str: &str, blocked: &[String]) -> bool {
    let Some(host) = get_domain(url_str) else {
        return false;
    };
    blocked.iter().any(|b| {
        let b = b.trim().to_lowercase();
        !b.is_empty() && (host == b || host.ends_with(&format!(".{b}")))
    })
}

/// URL-encode a search term for use inside a query string.
pub fn encode_query(term: &str) -> String {
    url::form_urlencoded::byte_serialize(term.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/path/").unwrap();
        assert_eq!(
            resolve_url(&base, "page.html"),
            "https://example.com/path/page.html"
        );
        assert_eq!(
            resolve_url(&base, "/root.html"),
            "https://example.com/root.html"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_resolve_with_string_base() {
        assert_eq!(
            resolve("https://www.amazon.jobs", "/en/jobs/123"),
            "https://www.amazon.jobs/en/jobs/123"
        );
        assert_eq!(resolve("", "/en/jobs/123"), "/en/jobs/123");
        assert_eq!(
            resolve("https://a.com", "https://b.com/1"),
            "https://b.com/1"
        );
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://Example.com/path"),
            Some("example.com".to_string())
        );
        assert_eq!(
            get_domain("https://sub.example.com:8080/path"),
            Some("sub.example.com".to_string())
        );
        assert_eq!(get_domain("not a url"), None);
    }

    #[test]
    fn test_is_blocked_domain() {
        let blocked = vec!["linkedin.com".to_string()];
        assert!(is_blocked_domain("https://www.linkedin.com/jobs/1", &blocked));
        assert!(is_blocked_domain("https://linkedin.com/", &blocked));
        assert!(!is_blocked_domain("https://notlinkedin.com/", &blocked));
        assert!(!is_blocked_domain("https://acme.com/careers", &blocked));
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("machine learning"), "machine+learning");
        assert_eq!(encode_query("c++"), "c%2B%2B");
    }
}
