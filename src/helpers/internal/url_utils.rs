//! URL validation utilities

/// Allowed URL schemes for archive downloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlScheme {
    Http,
    Https,
}

impl UrlScheme {
    /// Get the scheme prefix string
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Http => "http://",
            Self::Https => "https://",
        }
    }
}

/// Validate that a URL uses one of the allowed schemes and has a host.
pub fn validate_url_scheme(url: &str, allowed: &[UrlScheme]) -> Result<(), String> {
    let url_lower = url.to_lowercase();

    for scheme in allowed {
        if let Some(rest) = url_lower.strip_prefix(scheme.prefix()) {
            if rest.is_empty() || rest.starts_with('/') {
                return Err(format!("URL has no host: {}", url));
            }
            return Ok(());
        }
    }

    let allowed_str: Vec<_> = allowed.iter().map(|s| s.prefix()).collect();
    Err(format!("URL must use one of: {:?}\n  got: {}", allowed_str, url))
}

/// Strip any userinfo and query string from a URL for display.
pub fn redact_url(url: &str) -> String {
    let clean = url.split(['?', '#']).next().unwrap_or(url);
    let Some((scheme, rest)) = clean.split_once("://") else {
        return clean.to_string();
    };
    let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
    let host = authority.rsplit('@').next().unwrap_or(authority);
    format!("{}://{}{}", scheme, host, path)
}
