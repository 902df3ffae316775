//! HTTP-shaped responses.
//!
//! A transport layer answers `200 {"result": ...}` on success and
//! `{"error": "<message>"}` with the error's status code on failure.

use serde::Serialize;
use serde_json::Value as Json;

use crate::error::{DatabaseError, Result};

/// Response body: exactly one of `result` or `error`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseBody {
    Result(Json),
    Error(String),
}

/// A status code and body, ready to be written by a transport layer.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl QueryResponse {
    /// Builds a response from the outcome of a database operation.
    pub fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::ok(&value),
            Err(err) => Self::error(&err),
        }
    }

    /// A `200` response carrying `value`.
    pub fn ok<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Self {
                status: 200,
                body: ResponseBody::Result(json),
            },
            Err(err) => Self {
                status: 400,
                body: ResponseBody::Error(err.to_string()),
            },
        }
    }

    /// An error response with the error's status code.
    pub fn error(err: &DatabaseError) -> Self {
        Self {
            status: err.status_code(),
            body: ResponseBody::Error(err.to_string()),
        }
    }

    /// Returns true for a `200` response.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Returns the body as JSON.
    pub fn to_json(&self) -> Json {
        match &self.body {
            ResponseBody::Result(value) => serde_json::json!({ "result": value }),
            ResponseBody::Error(message) => serde_json::json!({ "error": message }),
        }
    }
}
