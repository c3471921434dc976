// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Response Interpreter
//!
//! Classifies a raw HTTP exchange into one of three outcomes:
//!
//! 1. HTTP status other than 200: [`WithingsError::Transport`]
//! 2. HTTP 200 with a vendor status other than `success`: [`WithingsError::Vendor`]
//! 3. HTTP 200 with vendor status `success`: the `body` payload
//!
//! Neither failure is retried here.

use crate::codes::StatusCode;
use crate::errors::{Result, WithingsError};
use serde::Deserialize;
use serde_json::Value;

/// The `{status, body?, error?}` object wrapping every vendor response
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    pub status: i64,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Vendor status resolved through the status table
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_code(self.status)
    }

    /// Unwrap the payload, or fail with the vendor's status
    ///
    /// A successful envelope without a body yields `Value::Null`.
    pub fn into_payload(self) -> Result<Value> {
        match self.status_code() {
            StatusCode::Success => Ok(self.body.unwrap_or(Value::Null)),
            status => Err(WithingsError::Vendor {
                status,
                error: self.error,
            }),
        }
    }
}

/// Interpret an HTTP status and raw body
pub fn interpret(http_status: u16, body: &str) -> Result<Value> {
    if http_status != 200 {
        return Err(WithingsError::Transport {
            status: http_status,
            body: body.to_string(),
        });
    }

    let envelope: ResponseEnvelope =
        serde_json::from_str(body).map_err(|source| WithingsError::Decode {
            context: "response envelope",
            source,
        })?;

    envelope.into_payload()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_unwraps_body() {
        let body = json!({"status": 0, "body": {"updatetime": 1704067200}}).to_string();
        let payload = interpret(200, &body).unwrap();
        assert_eq!(payload, json!({"updatetime": 1704067200}));
    }

    #[test]
    fn test_success_without_body() {
        let payload = interpret(200, r#"{"status": 0}"#).unwrap();
        assert!(payload.is_null());
    }

    #[test]
    fn test_vendor_status_becomes_vendor_error() {
        let body = json!({"status": 247, "error": "Invalid userid"}).to_string();
        match interpret(200, &body) {
            Err(WithingsError::Vendor { status, error }) => {
                assert_eq!(status, StatusCode::BadUserId);
                assert_eq!(error.as_deref(), Some("Invalid userid"));
            }
            other => panic!("Expected Vendor error, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_vendor_status_is_preserved() {
        let body = json!({"status": 12345, "body": {}}).to_string();
        let error = interpret(200, &body).unwrap_err();
        assert_eq!(error.vendor_status(), Some(StatusCode::Unknown(12345)));
    }

    #[test]
    fn test_non_200_is_transport_error() {
        match interpret(503, "Service Unavailable") {
            Err(WithingsError::Transport { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "Service Unavailable");
            }
            other => panic!("Expected Transport error, got {:?}", other),
        }

        // Even a well-formed success envelope is ignored on a non-200 status
        let error = interpret(500, r#"{"status": 0, "body": {}}"#).unwrap_err();
        assert_eq!(error.http_status(), Some(500));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        assert!(matches!(
            interpret(200, "<html>oops</html>"),
            Err(WithingsError::Decode { context: "response envelope", .. })
        ));
    }
}
