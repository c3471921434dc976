// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error types for Withings API operations
//!
//! Failures fall into two tiers. Caller mistakes (`InvalidOptions`,
//! `UnknownSymbol`) are detected before any network traffic. Remote failures
//! are split between the HTTP layer (`Transport`) and the vendor's own status
//! field (`Vendor`). Every variant carries the structured detail needed to
//! branch on it without parsing the message.

use crate::codes::StatusCode;

/// Errors produced by the Withings client
#[derive(Debug, thiserror::Error)]
pub enum WithingsError {
    /// Caller supplied a disallowed combination of request options
    #[error("Invalid request options: {reason}")]
    InvalidOptions {
        /// Why the combination was rejected
        reason: &'static str,
    },

    /// Caller supplied a symbol that is not present in a code table
    #[error("Unknown {table} symbol '{symbol}'")]
    UnknownSymbol {
        /// Name of the code table that was searched
        table: &'static str,
        /// The symbol as supplied by the caller
        symbol: String,
    },

    /// The HTTP exchange completed with a status other than 200
    #[error("HTTP {status} from Withings API")]
    Transport {
        /// Raw HTTP status
        status: u16,
        /// Raw response body
        body: String,
    },

    /// HTTP 200, but the vendor status field reports a failure
    #[error("Withings API error {status}: {}", .error.as_deref().unwrap_or("no detail"))]
    Vendor {
        /// Resolved vendor status (raw integer when unrecognized)
        status: StatusCode,
        /// Vendor-supplied error string, if any
        error: Option<String>,
    },

    /// The request could not be sent or the body could not be read
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Failed to decode {context}")]
    Decode {
        /// What was being decoded
        context: &'static str,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// A decoded value could not be represented in the domain model
    #[error("Invalid payload value: {0}")]
    InvalidPayload(String),

    /// A configured URL could not be parsed
    #[error("Invalid URL")]
    Url(#[from] url::ParseError),
}

impl WithingsError {
    /// Vendor status carried by a `Vendor` error
    pub fn vendor_status(&self) -> Option<StatusCode> {
        match self {
            Self::Vendor { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// HTTP status carried by a `Transport` error
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, WithingsError>;
