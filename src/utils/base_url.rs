//! Base URL extraction from HTTP request headers.
//!
//! The QR payload is `<base>/r/<code>`. When no public base URL is
//! configured the base is rebuilt from the request, keeping the port
//! (`http://localhost:5000`).

use crate::AppError;
use axum::http::{HeaderMap, Uri, header};
use serde_json::json;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Builds `<scheme>://<host[:port]>` for the current request.
///
/// `X-Forwarded-Proto` and `X-Forwarded-Host` are honoured only when
/// `behind_proxy` is true; otherwise the scheme is `http` and the host comes
/// from the `Host` header, or from the request URI authority for HTTP/2
/// requests that carry only `:authority`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if:
/// - Neither a `Host` header nor a URI authority is present
/// - The header value is not valid UTF-8 or contains characters outside a host name
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "example.com:8080".parse().unwrap());
///
/// let base = base_url_from_headers(&headers, &Uri::from_static("/"), false).unwrap();
/// assert_eq!(base, "http://example.com:8080");
/// ```
pub fn base_url_from_headers(
    headers: &HeaderMap,
    uri: &Uri,
    behind_proxy: bool,
) -> Result<String, AppError> {
    let forwarded = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let host = match (behind_proxy, forwarded(FORWARDED_HOST)) {
        (true, Some(h)) => h,
        _ => match headers.get(header::HOST) {
            Some(value) => value
                .to_str()
                .map_err(|_| AppError::bad_request("Invalid Host header", json!({})))?,
            None => uri
                .authority()
                .map(|a| a.as_str())
                .ok_or_else(|| AppError::bad_request("Missing Host header", json!({})))?,
        },
    };

    if !is_valid_host(host) {
        return Err(AppError::bad_request(
            "Invalid Host header",
            json!({ "host": host }),
        ));
    }

    let scheme = match (behind_proxy, forwarded(FORWARDED_PROTO)) {
        (true, Some(p)) if p.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };

    Ok(format!("{}://{}", scheme, host))
}

/// Joins a base URL and a short code into the redirect URL.
pub fn redirect_url(base: &str, code: &str) -> String {
    format!("{}/r/{}", base.trim_end_matches('/'), code)
}

fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'))
}
