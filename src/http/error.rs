use crate::http::response::StatusCode;

/// Everything that can go wrong while handling one request.
///
/// Every variant is terminal for the connection: the corresponding status
/// response is emitted and the connection transitions to its done phase.
/// There is no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// The request line could not be parsed (400).
    BadRequest,
    /// Any method other than GET (405).
    MethodNotAllowed,
    /// The resolved path contains a traversal sequence (403).
    Traversal,
    /// The resolved path is a directory; listing is unsupported (403).
    Directory,
    /// The resolved path does not exist (404).
    NotFound,
    /// The file exists but could not be opened for reading (500).
    Internal,
}

impl RequestError {
    /// Status code sent for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::BadRequest => StatusCode::BadRequest,
            RequestError::MethodNotAllowed => StatusCode::MethodNotAllowed,
            RequestError::Traversal | RequestError::Directory => StatusCode::Forbidden,
            RequestError::NotFound => StatusCode::NotFound,
            RequestError::Internal => StatusCode::InternalServerError,
        }
    }

    /// Content type of the canned body.
    pub fn content_type(&self) -> &'static str {
        match self {
            RequestError::BadRequest
            | RequestError::MethodNotAllowed
            | RequestError::Traversal => "text/plain",
            RequestError::Directory | RequestError::NotFound | RequestError::Internal => {
                "text/html"
            }
        }
    }

    /// Canned response body.
    pub fn body(&self) -> &'static [u8] {
        match self {
            RequestError::BadRequest => b"Bad Request",
            RequestError::MethodNotAllowed => b"Method Not Allowed",
            RequestError::Traversal => b"Forbidden",
            RequestError::Directory => b"<h1>Directory listing not supported</h1>",
            RequestError::NotFound => b"<h1>404 Not Found</h1>",
            RequestError::Internal => b"<h1>500 Internal Server Error</h1>",
        }
    }
}
