// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Withings Client
//!
//! A client for the Withings health API: user profile, body measurements,
//! activity summaries, and sleep data.
//!
//! ## Features
//!
//! - **OAuth 1.0a**: three-legged handshake and HMAC-SHA1 request signing
//! - **Typed records**: vendor codes become enums, epochs become
//!   timezone-aware instants, fixed-point values become decimals with units
//! - **Forward compatible**: codes the client does not know yet are kept as
//!   raw integers instead of failing the call
//! - **Structured errors**: caller, transport and vendor failures are
//!   distinct variants of [`WithingsError`]
//!
//! ## Architecture
//!
//! - **Codes**: static code tables
//! - **Convert**: epoch, fixed-point and calendar-date converters
//! - **Request**: maps operations onto `{resource, action, params}`
//! - **Response**: classifies the response envelope
//! - **Api**: the [`WithingsApi`] trait and its HTTP implementation
//! - **OAuth**: request signing and the handshake
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use withings_client::oauth::{Consumer, OAuthHandshake};
//! use withings_client::request::BodyMeasurementOptions;
//! use withings_client::{WithingsApi, WithingsClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let handshake = OAuthHandshake::new(Consumer::new("key", "secret"));
//!     let temp_token = handshake.request_temp_token(None).await?;
//!     println!("Authorize at {}", handshake.authorize_url(&temp_token)?);
//!
//!     let credentials = handshake.exchange_access_token(&temp_token, None).await?;
//!     let client = WithingsClient::new(credentials);
//!
//!     let options = BodyMeasurementOptions::new().measure_type_symbol("weight")?;
//!     for group in client.body_measurements(&options).await?.groups {
//!         println!("{}: {:?}", group.date, group.weight());
//!     }
//!
//!     Ok(())
//! }
//! ```

/// Withings API trait and HTTP client
pub mod api;

/// Static code tables
pub mod codes;

/// Configuration management and persistence
pub mod config;

/// Endpoints, wire names and environment variables
pub mod constants;

/// Value converters
pub mod convert;

/// Error types
pub mod errors;

/// Logging and structured events
pub mod logging;

/// Domain records
pub mod models;

/// OAuth 1.0a signing and handshake
pub mod oauth;

/// Request builder
pub mod request;

/// Response interpreter
pub mod response;

/// HTTP transport
pub mod transport;

mod wire;

pub use api::{ClientConfig, WithingsApi, WithingsClient};
pub use errors::{Result, WithingsError};
