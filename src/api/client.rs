// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! HTTP-backed Withings client.
//!
//! Every operation is one signed GET to `{base_url}/{resource}`:
//! - the request builder produces `{resource, action, params}`
//! - `action` and `userid` are merged into the params
//! - the signer's OAuth parameters are appended to the query string
//! - the response interpreter unwraps the payload, which is then converted
//!   into the operation's domain record

use super::WithingsApi;
use crate::codes::NotifyApplication;
use crate::config::Config;
use crate::constants::{endpoints, params};
use crate::errors::{Result, WithingsError};
use crate::logging::AppLogger;
use crate::models::{
    ActivitySummary, BodyMeasurements, IntradayActivity, SleepData, SleepSummary, Subscription,
    UserInfo,
};
use crate::oauth::{Credentials, HmacSha1Signer, OAuthSigner};
use crate::request::{ApiRequest, BodyMeasurementOptions, SleepDataQuery};
use crate::response::interpret;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::wire::{
    decode, ActivitiesBody, IntradayBody, MeasureBody, ProfilesBody, RawActivity,
    SleepBody, SleepSummaryBody, UsersBody,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Where to send requests and who is sending them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: Credentials,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }
}

/// Withings API client for one set of credentials
///
/// Holds no mutable state, so a single instance can serve concurrent calls.
pub struct WithingsClient<T = ReqwestTransport, S = HmacSha1Signer> {
    config: ClientConfig,
    transport: T,
    signer: S,
}

impl WithingsClient {
    /// Client for the production API
    pub fn new(credentials: Credentials) -> Self {
        Self::with_parts(
            ClientConfig::new(endpoints::API_BASE_URL, credentials),
            ReqwestTransport::new(),
            HmacSha1Signer,
        )
    }

    /// Client using the base URL and timeout from `config`
    pub fn from_config(config: &Config, credentials: Credentials) -> Result<Self> {
        let transport =
            ReqwestTransport::with_timeout(Duration::from_secs(config.request_timeout_secs))?;
        Ok(Self::with_parts(
            ClientConfig::new(config.api_base_url.as_str(), credentials),
            transport,
            HmacSha1Signer,
        ))
    }
}

impl<T: HttpTransport, S: OAuthSigner> WithingsClient<T, S> {
    pub fn with_parts(config: ClientConfig, transport: T, signer: S) -> Self {
        Self {
            config,
            transport,
            signer,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn merged_params(&self, request: &ApiRequest) -> BTreeMap<String, String> {
        let mut merged = request.params.clone();
        merged.insert(params::ACTION.to_string(), request.action.to_string());
        merged.insert(
            params::USER_ID.to_string(),
            self.config.credentials.user_id.clone(),
        );
        merged
    }

    /// Sign and send `request`, returning the unwrapped success payload
    pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let url = format!("{}/{}", self.config.base_url, request.resource);
        let merged = self.merged_params(&request);

        let credentials = &self.config.credentials;
        let mut query = self.signer.sign(
            &credentials.consumer,
            Some(&credentials.access_token),
            "GET",
            &url,
            &merged,
        )?;
        query.extend(merged);

        debug!(resource = request.resource, action = request.action, "Calling Withings API");
        let started = Instant::now();
        let response = self.transport.get(&url, &query).await?;
        AppLogger::log_api_request(
            request.resource,
            request.action,
            response.status,
            started.elapsed().as_millis() as u64,
            &credentials.user_id,
        );

        let result = interpret(response.status, &response.body);
        if let Err(WithingsError::Vendor { status, .. }) = &result {
            AppLogger::log_vendor_error(request.resource, request.action, *status);
        }
        result
    }
}

#[async_trait]
impl<T: HttpTransport, S: OAuthSigner> WithingsApi for WithingsClient<T, S> {
    async fn user_info(&self) -> Result<Vec<UserInfo>> {
        let payload = self.execute(ApiRequest::user_info()).await?;
        decode::<UsersBody>(payload, "user info")?.into_users()
    }

    async fn body_measurements(&self, options: &BodyMeasurementOptions) -> Result<BodyMeasurements> {
        let request = ApiRequest::body_measurements(options)?;
        let payload = self.execute(request).await?;
        decode::<MeasureBody>(payload, "body measurements")?.into_measurements()
    }

    async fn activity_summary(&self, date: NaiveDate) -> Result<ActivitySummary> {
        let payload = self.execute(ApiRequest::activity_summary(date)).await?;
        decode::<RawActivity>(payload, "activity summary")?.into_summary()
    }

    async fn activity_summaries(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ActivitySummary>> {
        let payload = self.execute(ApiRequest::activity_summaries(start, end)).await?;
        decode::<ActivitiesBody>(payload, "activity summaries")?.into_summaries()
    }

    async fn activity_data(&self, after: DateTime<Utc>, before: DateTime<Utc>) -> Result<Vec<IntradayActivity>> {
        let payload = self.execute(ApiRequest::activity_data(&after, &before)).await?;
        decode::<IntradayBody>(payload, "activity data")?.into_samples()
    }

    async fn sleep_summary(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SleepSummary>> {
        let payload = self.execute(ApiRequest::sleep_summary(start, end)).await?;
        decode::<SleepSummaryBody>(payload, "sleep summary")?.into_summaries()
    }

    async fn sleep_data(&self, query: &SleepDataQuery) -> Result<SleepData> {
        let payload = self.execute(ApiRequest::sleep_data(query)).await?;
        decode::<SleepBody>(payload, "sleep data")?.into_sleep_data()
    }

    async fn subscribe(&self, callback_url: &str, comment: &str, appli: NotifyApplication) -> Result<()> {
        self.execute(ApiRequest::notify_subscribe(callback_url, comment, appli))
            .await
            .map(|_| ())
    }

    async fn list_subscriptions(&self, appli: Option<NotifyApplication>) -> Result<Vec<Subscription>> {
        let payload = self.execute(ApiRequest::notify_list(appli)).await?;
        decode::<ProfilesBody>(payload, "subscriptions")?.into_subscriptions()
    }

    async fn revoke(&self, callback_url: &str, appli: NotifyApplication) -> Result<()> {
        self.execute(ApiRequest::notify_revoke(callback_url, appli))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{SleepState, StatusCode};
    use crate::oauth::{Consumer, Token};
    use crate::transport::HttpResponse;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Mutex;

    /// Transport returning a canned response and recording the last request
    struct MockTransport {
        response: HttpResponse,
        last_request: Mutex<Option<(String, BTreeMap<String, String>)>>,
    }

    impl MockTransport {
        fn new(status: u16, body: Value) -> Self {
            Self {
                response: HttpResponse {
                    status,
                    body: body.to_string(),
                },
                last_request: Mutex::new(None),
            }
        }

        fn last_request(&self) -> Option<(String, BTreeMap<String, String>)> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn get(&self, url: &str, query: &BTreeMap<String, String>) -> Result<HttpResponse> {
            *self.last_request.lock().unwrap() = Some((url.to_string(), query.clone()));
            Ok(self.response.clone())
        }
    }

    /// Signer with a fixed, recognizable output
    struct StaticSigner;

    impl OAuthSigner for StaticSigner {
        fn sign(
            &self,
            _consumer: &Consumer,
            _token: Option<&Token>,
            _method: &str,
            _url: &str,
            _params: &BTreeMap<String, String>,
        ) -> Result<BTreeMap<String, String>> {
            Ok(BTreeMap::from([(
                "oauth_signature".to_string(),
                "static".to_string(),
            )]))
        }
    }

    fn client(status: u16, body: Value) -> WithingsClient<MockTransport, StaticSigner> {
        let credentials = Credentials::new(
            Consumer::new("consumer-key", "consumer-secret"),
            Token::new("access-token", "access-secret"),
            "1234",
        );
        WithingsClient::with_parts(
            ClientConfig::new("https://wbsapi.example.test/", credentials),
            MockTransport::new(status, body),
            StaticSigner,
        )
    }

    #[tokio::test]
    async fn test_body_measurements_request_and_conversion() {
        let client = client(
            200,
            json!({"status": 0, "body": {
                "updatetime": 1704067200,
                "measuregrps": [{
                    "grpid": 1, "attrib": 0, "date": 1704067200, "category": 1,
                    "measures": [{"value": 7500, "type": 1, "unit": -2}]
                }]
            }}),
        );

        let options = BodyMeasurementOptions::new()
            .after(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .limit(10);
        let measurements = client.body_measurements(&options).await.unwrap();
        assert_eq!(measurements.groups[0].weight(), Some(dec!(75.00)));

        let (url, query) = client.transport.last_request().unwrap();
        assert_eq!(url, "https://wbsapi.example.test/measure");
        assert_eq!(query["startdate"], "1704067200");
        assert_eq!(query["limit"], "10");
        assert_eq!(query["action"], "getmeas");
        assert_eq!(query["userid"], "1234");
        assert_eq!(query["oauth_signature"], "static");
        assert!(!query.contains_key("enddate"));
        assert!(!query.contains_key("lastupdate"));
    }

    #[tokio::test]
    async fn test_invalid_options_never_reach_transport() {
        let client = client(200, json!({"status": 0, "body": {}}));
        let jan_first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let options = BodyMeasurementOptions::new()
            .before(jan_first)
            .updated_since(jan_first);

        let result = client.body_measurements(&options).await;
        assert!(matches!(result, Err(WithingsError::InvalidOptions { .. })));
        assert!(client.transport.last_request().is_none());
    }

    #[tokio::test]
    async fn test_vendor_status_247() {
        let client = client(200, json!({"status": 247, "error": "Invalid userid"}));
        let error = client.user_info().await.unwrap_err();
        assert_eq!(error.vendor_status(), Some(StatusCode::BadUserId));
    }

    #[tokio::test]
    async fn test_http_503() {
        let client = client(503, json!("unavailable"));
        let error = client.sleep_data(&SleepDataQuery::UpdatedSince(Utc::now())).await.unwrap_err();
        assert_eq!(error.http_status(), Some(503));
    }

    #[tokio::test]
    async fn test_activity_summary_single_day() {
        let client = client(
            200,
            json!({"status": 0, "body": {"date": "2024-01-01", "steps": 4200}}),
        );
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let summary = client.activity_summary(day).await.unwrap();
        assert_eq!(summary.steps, Some(4200));

        let (_, query) = client.transport.last_request().unwrap();
        assert_eq!(query["date"], "2024-01-01");
        assert_eq!(query["action"], "getactivity");
    }

    #[tokio::test]
    async fn test_sleep_data_unknown_state_passes_through() {
        let client = client(
            200,
            json!({"status": 0, "body": {"model": 32, "series": [
                {"startdate": 1704067200, "enddate": 1704067800, "state": 3},
                {"startdate": 1704067800, "enddate": 1704068400, "state": 9}
            ]}}),
        );

        let sleep = client
            .sleep_data(&SleepDataQuery::Between {
                start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                end: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            })
            .await
            .unwrap();

        let states: Vec<_> = sleep.points.iter().map(|p| p.state).collect();
        assert_eq!(states, vec![SleepState::Rem, SleepState::Unknown(9)]);
    }

    #[tokio::test]
    async fn test_subscribe_accepts_empty_body() {
        let client = client(200, json!({"status": 0}));
        client
            .subscribe("https://example.com/hook", "hook", NotifyApplication::Weight)
            .await
            .unwrap();

        let (url, query) = client.transport.last_request().unwrap();
        assert_eq!(url, "https://wbsapi.example.test/notify");
        assert_eq!(query["callbackurl"], "https://example.com/hook");
    }

    #[test]
    fn test_merged_params_override_builder_keys() {
        let client = client(200, json!({"status": 0}));
        let mut request = ApiRequest::user_info();
        request.params.insert("userid".to_string(), "spoofed".to_string());

        let merged = client.merged_params(&request);
        assert_eq!(merged["userid"], "1234");
        assert_eq!(merged["action"], "getbyuserid");
    }
}
