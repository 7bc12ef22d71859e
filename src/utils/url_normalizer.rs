//! Destination URL normalization.
//!
//! Submitted destinations are free text. They are turned into an absolute
//! HTTP(S) URL before being stored, so the redirect `Location` header is
//! always well-formed.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS destinations are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a submitted destination to a canonical absolute URL.
///
/// # Normalization Rules
///
/// 1. **Whitespace**: Leading and trailing whitespace is trimmed
/// 2. **Scheme**: Input without `://` is treated as `https://<input>`
/// 3. **Protocol**: Only HTTP and HTTPS are allowed
/// 4. **Hostname**: Converted to lowercase
/// 5. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 6. **Path, query and fragment**: Preserved as-is
///
/// Rejects `javascript:`, `data:`, `file:` and other non-web schemes.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("example.com").unwrap(), "https://example.com/");
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path#top").unwrap(),
///     "https://example.com/Path#top"
/// );
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let mut url =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or(UrlNormalizationError::MissingHost)?
        .to_ascii_lowercase();
    url.set_host(Some(&host)).map_err(|_| {
        UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
    })?;

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(url.to_string())
}

/// True for `scheme://...` and for opaque schemes such as `javascript:` or `mailto:`.
fn has_scheme(input: &str) -> bool {
    if input.contains("://") {
        return true;
    }

    match input.split_once(':') {
        Some((scheme, rest)) => {
            let looks_like_port = rest.chars().next().is_some_and(|c| c.is_ascii_digit());
            !scheme.is_empty()
                && !looks_like_port
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
