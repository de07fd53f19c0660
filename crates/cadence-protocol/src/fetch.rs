//! The file-fetch primitive the router delegates to once a path is
//! authorized.

use std::path::Path;

use async_trait::async_trait;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderValue, Response, StatusCode};
use tracing::{debug, warn};

/// Response type of the internal scheme.
pub type ProtocolResponse = Response<Vec<u8>>;

/// Reads an already authorized file and turns it into a response.
///
/// Implementations must not re-interpret the path: it has been checked by
/// the sandbox guard and is final.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Produce the response for `path`.
    async fn fetch(&self, path: &Path) -> ProtocolResponse;
}

/// Build a plain-text response with the given status.
#[must_use]
pub fn text_response(status: StatusCode, body: &'static str) -> ProtocolResponse {
    let mut response = Response::new(body.as_bytes().to_vec());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

/// Serves files from the local disk with a guessed `Content-Type`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFetcher;

#[async_trait]
impl FileFetcher for DiskFetcher {
    async fn fetch(&self, path: &Path) -> ProtocolResponse {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => {
                debug!(path = %path.display(), "refusing to serve a directory");
                return text_response(StatusCode::NOT_FOUND, "Not Found");
            },
            Ok(_) => {},
            Err(e) => return io_error_response(path, &e),
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => return io_error_response(path, &e),
        };

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let content_type = HeaderValue::from_str(mime.as_ref())
            .unwrap_or(HeaderValue::from_static("application/octet-stream"));
        let len = HeaderValue::from(bytes.len());

        let mut response = Response::new(bytes);
        response.headers_mut().insert(CONTENT_TYPE, content_type);
        response.headers_mut().insert(CONTENT_LENGTH, len);
        response
    }
}

fn io_error_response(path: &Path, error: &std::io::Error) -> ProtocolResponse {
    match error.kind() {
        std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "asset not found");
            text_response(StatusCode::NOT_FOUND, "Not Found")
        },
        std::io::ErrorKind::PermissionDenied => {
            warn!(path = %path.display(), "asset not readable");
            text_response(StatusCode::FORBIDDEN, "Forbidden")
        },
        _ => {
            warn!(path = %path.display(), error = %error, "failed to read asset");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        },
    }
}
