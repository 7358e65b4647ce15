//! Request ID middleware for tracing and correlation.
//!
//! Every request gets an id: the `x-request-id` header when a reverse
//! proxy already assigned one, a fresh UUID v4 otherwise. The id is
//! recorded on the current tracing span, tagged on the Sentry scope, and
//! echoed back in the response headers.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The incoming request id, or a freshly generated one.
///
/// A header that is not valid UTF-8 is treated as absent.
fn incoming_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

/// Middleware that ensures every request carries a request id.
///
/// The span record targets a `request_id` field declared by the trace
/// layer's span; without one the record is a no-op.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(request.headers());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    // Echo so clients can quote the id in bug reports
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_provided_header_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-abc-123"));
        assert_eq!(incoming_request_id(&headers), "req-abc-123");
    }

    #[test]
    fn test_missing_header_generates_uuid() {
        let id = incoming_request_id(&HeaderMap::new());
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_non_utf8_header_generates_uuid() {
        let mut headers = HeaderMap::new();
        headers.insert(
            REQUEST_ID_HEADER,
            HeaderValue::from_bytes(&[0xff, 0xfe]).unwrap(),
        );
        assert!(Uuid::parse_str(&incoming_request_id(&headers)).is_ok());
    }
}
