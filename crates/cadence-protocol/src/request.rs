//! Incoming asset requests, built from a raw URI or an `http::Request`.

use http::Method;

use crate::error::{ProtocolError, ProtocolResult};

/// An incoming asset request. Every field is untrusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// HTTP method of the request.
    pub method: Method,
    /// Host part of the URI; selects the bundle.
    pub host: String,
    /// Decoded path part of the URI.
    pub pathname: String,
}

impl ResourceRequest {
    /// Build a request from already-split parts.
    #[must_use]
    pub fn new(method: Method, host: impl Into<String>, pathname: impl Into<String>) -> Self {
        Self {
            method,
            host: host.into(),
            pathname: pathname.into(),
        }
    }

    /// Shorthand for a `GET` request.
    #[must_use]
    pub fn get(host: impl Into<String>, pathname: impl Into<String>) -> Self {
        Self::new(Method::GET, host, pathname)
    }

    /// Parse a full `<scheme>://<host>/<path>` URI.
    ///
    /// Dot segments are collapsed by the URL parser; the remaining path is
    /// then percent-decoded so that encoded separators such as `..%2f`
    /// reach the sandbox guard in their literal form. Query and fragment
    /// are discarded.
    ///
    /// # Errors
    ///
    /// Fails if the URI does not parse, uses another scheme, has no host,
    /// or its path does not decode to UTF-8.
    pub fn from_uri(scheme: &str, method: Method, uri: &str) -> ProtocolResult<Self> {
        let url = url::Url::parse(uri)
            .map_err(|e| ProtocolError::MalformedRequest(format!("{uri}: {e}")))?;

        if !url.scheme().eq_ignore_ascii_case(scheme) {
            return Err(ProtocolError::SchemeMismatch {
                expected: scheme.to_owned(),
                found: url.scheme().to_owned(),
            });
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ProtocolError::MalformedRequest(format!("{uri}: missing host")))?;

        let pathname = decode_path(url.path())?;
        Ok(Self::new(method, host, pathname))
    }

    /// Convert a request handed over by a webview's custom-protocol hook.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ResourceRequest::from_uri`].
    pub fn from_http<B>(scheme: &str, request: &http::Request<B>) -> ProtocolResult<Self> {
        Self::from_uri(scheme, request.method().clone(), &request.uri().to_string())
    }
}

fn decode_path(raw: &str) -> ProtocolResult<String> {
    urlencoding::decode(raw)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ProtocolError::MalformedRequest(format!("path is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_uri() {
        let req = ResourceRequest::from_uri("app", Method::GET, "app://main/js/app.js").unwrap();
        assert_eq!(req.host, "main");
        assert_eq!(req.pathname, "/js/app.js");
        assert_eq!(req.method, Method::GET);
    }

    #[test]
    fn test_query_and_fragment_dropped() {
        let req =
            ResourceRequest::from_uri("app", Method::GET, "app://settings/?tab=audio#top").unwrap();
        assert_eq!(req.host, "settings");
        assert_eq!(req.pathname, "/");
    }

    #[test]
    fn test_missing_path() {
        let req = ResourceRequest::from_uri("app", Method::GET, "app://main").unwrap();
        assert_eq!(req.pathname, "");
    }

    #[test]
    fn test_encoded_separator_is_decoded() {
        let req =
            ResourceRequest::from_uri("app", Method::GET, "app://main/..%2f..%2fetc%2fpasswd")
                .unwrap();
        assert_eq!(req.pathname, "/../../etc/passwd");
    }

    #[test]
    fn test_dot_segments_collapse_at_parse() {
        let req =
            ResourceRequest::from_uri("app", Method::GET, "app://main/%2e%2e/%2e%2e/etc/passwd")
                .unwrap();
        assert_eq!(req.pathname, "/etc/passwd");
    }

    #[test]
    fn test_encoded_space() {
        let req = ResourceRequest::from_uri("app", Method::GET, "app://main/My%20Song.png").unwrap();
        assert_eq!(req.pathname, "/My Song.png");
    }

    #[test]
    fn test_scheme_mismatch() {
        let result = ResourceRequest::from_uri("app", Method::GET, "file:///etc/passwd");
        assert!(matches!(result, Err(ProtocolError::SchemeMismatch { .. })));
    }

    #[test]
    fn test_garbage_uri() {
        let result = ResourceRequest::from_uri("app", Method::GET, "not a uri");
        assert!(matches!(result, Err(ProtocolError::MalformedRequest(_))));
    }

    #[test]
    fn test_invalid_utf8_path() {
        let result = ResourceRequest::from_uri("app", Method::GET, "app://main/%ff%fe");
        assert!(matches!(result, Err(ProtocolError::MalformedRequest(_))));
    }

    #[test]
    fn test_from_http_request() {
        let request = http::Request::builder()
            .method(Method::HEAD)
            .uri("app://titlebar/index.html")
            .body(())
            .unwrap();
        let req = ResourceRequest::from_http("app", &request).unwrap();
        assert_eq!(req.method, Method::HEAD);
        assert_eq!(req.host, "titlebar");
        assert_eq!(req.pathname, "/index.html");
    }
}
