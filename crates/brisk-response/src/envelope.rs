//! The `{error_code, data, message}` envelope every handler answers with.
//!
//! Business failures travel with HTTP 200 and a non-zero `error_code`;
//! only [`server_error`] changes the HTTP status.
//!
//! ```
//! use brisk_response::{success, fail};
//!
//! let res = success(vec![1, 2, 3]);
//! assert_eq!(res.status, 200);
//! assert_eq!(
//!     res.body_string().unwrap(),
//!     r#"{"error_code":0,"data":[1,2,3],"message":"ok"}"#
//! );
//!
//! let res = fail(10001, "name already taken");
//! assert_eq!(res.status, 200);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::response::Response;

/// `error_code` of a successful envelope.
pub const SUCCESS_CODE: i32 = 0;
/// `message` of a successful envelope.
pub const SUCCESS_MESSAGE: &str = "ok";
/// `error_code` reported when the caller's token is missing or invalid.
pub const TOKEN_FAIL_CODE: i32 = 401;
/// `message` reported when the caller's token is missing or invalid.
pub const TOKEN_FAIL_MESSAGE: &str = "未授权";
/// `error_code` of an unexpected failure.
pub const SERVER_ERROR_CODE: i32 = 500;
/// `message` of an unexpected failure outside development.
pub const SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// The JSON body shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub error_code: i32,
    pub data: Option<T>,
    pub message: String,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            error_code: SUCCESS_CODE,
            data: Some(data),
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    /// A failed envelope with no payload.
    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            error_code: code,
            data: None,
            message: message.into(),
        }
    }

    /// Whether this envelope reports success.
    pub fn is_success(&self) -> bool {
        self.error_code == SUCCESS_CODE
    }
}

impl<T: Serialize> Envelope<T> {
    /// Renders the envelope with the given HTTP status.
    pub fn into_response(self, status: u16) -> Response {
        Response::json(status, &self)
    }
}

/// Deployment environment, as far as error disclosure is concerned.
///
/// Anything not recognised counts as production, so error details are only
/// disclosed when a development-like environment is named explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Production,
    Development,
    Local,
    Testing,
}

impl Environment {
    /// Parses an environment name, treating unknown names as production.
    pub fn detect(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Whether error details may be shown to clients.
    pub fn discloses_errors(self) -> bool {
        !matches!(self, Self::Production)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Local => "local",
            Self::Testing => "testing",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown environment name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown environment: {0}")]
pub struct UnknownEnvironment(pub String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "release" => Ok(Self::Production),
            "development" | "dev" | "debug" => Ok(Self::Development),
            "local" => Ok(Self::Local),
            "testing" | "test" => Ok(Self::Testing),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}

/// HTTP 200, `{0, data, "ok"}`.
pub fn success<T: Serialize>(data: T) -> Response {
    Envelope::ok(data).into_response(200)
}

/// HTTP 200, `{code, null, message}`.
pub fn fail(code: i32, message: impl Into<String>) -> Response {
    Envelope::<()>::error(code, message).into_response(200)
}

/// HTTP 200, `{401, null, "未授权"}`.
pub fn token_fail() -> Response {
    fail(TOKEN_FAIL_CODE, TOKEN_FAIL_MESSAGE)
}

/// HTTP 500, `{500, null, message}`.
///
/// The error text is only exposed when `env` discloses errors; in
/// production the message is always the generic one. The error is logged
/// either way.
pub fn server_error<E: fmt::Display + ?Sized>(err: &E, env: Environment) -> Response {
    error!(error = %err, %env, "server error");
    let message = if env.discloses_errors() {
        err.to_string()
    } else {
        SERVER_ERROR_MESSAGE.to_string()
    };
    Envelope::<()>::error(SERVER_ERROR_CODE, message).into_response(500)
}
