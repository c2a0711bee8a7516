//! Permissive CORS headers.
//!
//! Every response, whatever its status, carries the same fixed set of CORS
//! headers. `OPTIONS` preflight requests are answered directly with
//! `204 No Content`.

use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
        },
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Methods clients may use across origins.
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, OPTIONS";

/// Add CORS headers to all responses and short-circuit preflights.
///
/// Headers applied:
/// - `Access-Control-Allow-Origin: *`
/// - `Access-Control-Allow-Methods: GET, POST, PUT, OPTIONS`
/// - `Access-Control-Allow-Headers: Content-Type`
/// - `Access-Control-Expose-Headers: Location` - so browsers can read the
///   URL of a newly created cart
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    apply_cors_headers(response.headers_mut());
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Location"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_overrides_existing_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("https://example.com"),
        );

        apply_cors_headers(&mut headers);

        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
        assert_eq!(headers[ACCESS_CONTROL_EXPOSE_HEADERS], "Location");
        assert_eq!(headers.len(), 4);
    }
}
