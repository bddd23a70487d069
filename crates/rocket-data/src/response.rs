//! HTTP response handling.

use serde::de::DeserializeOwned;

use crate::FetchError;

/// A buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response body.
    pub body: Vec<u8>,
    /// The request URL, kept for error messages.
    pub url: String,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>, url: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            url: url.into(),
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    ///
    /// An empty body is reported as a parse error rather than decoded.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Err(FetchError::ParseError(format!("empty body from {}", self.url)));
        }
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        if self.status == 404 {
            return Err(FetchError::NotFound(self.url));
        }
        let message = self.text().unwrap_or_default();
        Err(FetchError::HttpError {
            status: self.status,
            message,
        })
    }
}
