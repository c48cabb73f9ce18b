use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract the originating client IP from proxy headers
///
/// Checks the first entry of `X-Forwarded-For`, then `X-Real-IP`.
///
/// # Examples
///
/// ```
/// use axum::http::HeaderMap;
/// use segment_tts_server::utils::header_utils::extract_client_ip;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
/// assert_eq!(extract_client_ip(&headers), Some("203.0.113.7".parse().unwrap()));
/// ```
pub fn extract_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(value) = forwarded.to_str() {
            if let Some(ip) = value
                .split(',')
                .next()
                .and_then(|first| first.trim().parse().ok())
            {
                return Some(ip);
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
