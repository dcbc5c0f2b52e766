//! HTTP response value produced by the envelope helpers.

use std::collections::HashMap;

use crate::error::Result;

/// Content type of every envelope body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// An HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Encodes `data` as a JSON body with the given status.
    pub fn try_json<T: serde::Serialize>(status: u16, data: &T) -> Result<Self> {
        let body = serde_json::to_vec(data)?;
        Ok(Self::new(status)
            .header("Content-Type", JSON_CONTENT_TYPE)
            .body(body))
    }

    /// Encodes `data` as a JSON body, falling back to a bare 500 when the
    /// payload cannot be encoded.
    pub fn json<T: serde::Serialize>(status: u16, data: &T) -> Self {
        match Self::try_json(status, data) {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "failed to encode response body");
                Self::internal_server_error()
            }
        }
    }

    /// Creates a plain 500 Internal Server Error response.
    pub fn internal_server_error() -> Self {
        Self::new(500).body(b"Internal Server Error".to_vec())
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the status code.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the body as a string.
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Decodes the body as JSON.
    pub fn body_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Returns the status text for the current status code.
    pub fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_json() {
        let res = Response::json(200, &serde_json::json!({"name": "test"}));
        assert_eq!(res.status, 200);
        assert_eq!(
            res.headers.get("Content-Type"),
            Some(&JSON_CONTENT_TYPE.to_string())
        );
        assert_eq!(res.body_string(), Some(r#"{"name":"test"}"#.to_string()));
    }

    #[test]
    fn test_response_json_encoding_failure() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(vec![1u8], 1);
        assert!(Response::try_json(200, &map).is_err());

        let res = Response::json(200, &map);
        assert_eq!(res.status, 500);
        assert_eq!(res.status_text(), "Internal Server Error");
    }

    #[test]
    fn test_response_builder() {
        let res = Response::default()
            .header("X-Request-Id", "abc")
            .status(404)
            .body("missing");

        assert_eq!(res.status, 404);
        assert_eq!(res.status_text(), "Not Found");
        assert_eq!(res.headers.get("X-Request-Id"), Some(&"abc".to_string()));
        assert_eq!(res.body_string(), Some("missing".to_string()));
    }
}
