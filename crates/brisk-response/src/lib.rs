//! # brisk-response
//!
//! Uniform JSON response envelope for HTTP handlers.
//!
//! Every answer has the shape `{"error_code": i32, "data": T | null,
//! "message": string}`:
//!
//! - [`success`]: HTTP 200, code 0, message `"ok"`
//! - [`fail`]: HTTP 200, caller-chosen code and message
//! - [`token_fail`]: HTTP 200, code 401
//! - [`server_error`]: HTTP 500; the error text is hidden in production

mod envelope;
mod error;
mod response;

pub use envelope::{
    Envelope, Environment, SERVER_ERROR_CODE, SERVER_ERROR_MESSAGE, SUCCESS_CODE,
    SUCCESS_MESSAGE, TOKEN_FAIL_CODE, TOKEN_FAIL_MESSAGE, UnknownEnvironment, fail,
    server_error, success, token_fail,
};
pub use error::{ResponseError, Result};
pub use response::{JSON_CONTENT_TYPE, Response};
