// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Vendor endpoints, wire names, and environment-based configuration values.

/// Default vendor endpoints
pub mod endpoints {
    /// Base URL of the data API
    pub const API_BASE_URL: &str = "https://wbsapi.withings.net";

    /// Base URL of the OAuth 1.0a endpoints
    pub const OAUTH_BASE_URL: &str = "https://oauth.withings.com/account";

    pub const REQUEST_TOKEN_PATH: &str = "request_token";
    pub const ACCESS_TOKEN_PATH: &str = "access_token";
    pub const AUTHORIZE_PATH: &str = "authorize";

    /// Default per-request timeout applied by the HTTP transport
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

/// Resource segment of the request path
pub mod resources {
    pub const USER: &str = "user";
    pub const MEASURE: &str = "measure";
    pub const SLEEP: &str = "sleep";
    pub const NOTIFY: &str = "notify";
}

/// Values of the `action` query parameter
pub mod actions {
    pub const GET_BY_USER_ID: &str = "getbyuserid";
    pub const GET_MEAS: &str = "getmeas";
    pub const GET_ACTIVITY: &str = "getactivity";
    pub const GET_INTRADAY_ACTIVITY: &str = "getintradayactivity";
    pub const GET_SUMMARY: &str = "getsummary";
    pub const GET: &str = "get";
    pub const SUBSCRIBE: &str = "subscribe";
    pub const LIST: &str = "list";
    pub const REVOKE: &str = "revoke";
}

/// Query parameter keys
pub mod params {
    pub const ACTION: &str = "action";
    pub const USER_ID: &str = "userid";
    pub const START_DATE: &str = "startdate";
    pub const END_DATE: &str = "enddate";
    pub const LAST_UPDATE: &str = "lastupdate";
    pub const MEASURE_TYPE: &str = "meastype";
    pub const CATEGORY: &str = "category";
    pub const LIMIT: &str = "limit";
    pub const OFFSET: &str = "offset";
    pub const DATE: &str = "date";
    pub const START_DATE_YMD: &str = "startdateymd";
    pub const END_DATE_YMD: &str = "enddateymd";
    pub const CALLBACK_URL: &str = "callbackurl";
    pub const COMMENT: &str = "comment";
    pub const APPLI: &str = "appli";
}

/// Environment-based configuration
pub mod env_config {
    use super::endpoints;
    use std::env;

    pub const API_BASE_URL_VAR: &str = "WITHINGS_API_BASE_URL";
    pub const OAUTH_BASE_URL_VAR: &str = "WITHINGS_OAUTH_BASE_URL";
    pub const REQUEST_TIMEOUT_VAR: &str = "WITHINGS_REQUEST_TIMEOUT_SECS";

    /// Get API base URL from environment or default
    pub fn api_base_url() -> String {
        env::var(API_BASE_URL_VAR).unwrap_or_else(|_| endpoints::API_BASE_URL.to_string())
    }

    /// Get OAuth base URL from environment or default
    pub fn oauth_base_url() -> String {
        env::var(OAUTH_BASE_URL_VAR).unwrap_or_else(|_| endpoints::OAUTH_BASE_URL.to_string())
    }

    /// Get request timeout from environment or default
    pub fn request_timeout_secs() -> u64 {
        env::var(REQUEST_TIMEOUT_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(endpoints::DEFAULT_TIMEOUT_SECS)
    }

    /// Get log level from environment or default
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    }
}
