// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::codes::NotifyApplication;
use crate::errors::Result;
use crate::models::{
    ActivitySummary, BodyMeasurements, IntradayActivity, SleepData, SleepSummary, Subscription,
    UserInfo,
};
use crate::request::{BodyMeasurementOptions, SleepDataQuery};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

pub mod client;

pub use client::{ClientConfig, WithingsClient};

/// Operations offered by the Withings API
///
/// [`WithingsClient`] is the HTTP implementation; tests and embedding
/// applications can provide their own.
#[async_trait]
pub trait WithingsApi: Send + Sync {
    /// Profiles returned by `user`/`getbyuserid`
    async fn user_info(&self) -> Result<Vec<UserInfo>>;

    /// Body measurements matching `options`
    ///
    /// Fails with `InvalidOptions` before any request is sent when
    /// `after`/`before` are combined with `updated_since`.
    async fn body_measurements(&self, options: &BodyMeasurementOptions) -> Result<BodyMeasurements>;

    /// Activity totals for one day
    async fn activity_summary(&self, date: NaiveDate) -> Result<ActivitySummary>;

    /// Activity totals for each day in an inclusive range
    async fn activity_summaries(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ActivitySummary>>;

    /// Intraday activity samples between two instants
    async fn activity_data(&self, after: DateTime<Utc>, before: DateTime<Utc>) -> Result<Vec<IntradayActivity>>;

    /// Sleep summaries for each night in an inclusive range of days
    async fn sleep_summary(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SleepSummary>>;

    /// Sleep state transitions, selected by range or by modification time
    async fn sleep_data(&self, query: &SleepDataQuery) -> Result<SleepData>;

    /// Register a notification callback
    async fn subscribe(&self, callback_url: &str, comment: &str, appli: NotifyApplication) -> Result<()>;

    /// Registered callbacks, optionally for one application only
    async fn list_subscriptions(&self, appli: Option<NotifyApplication>) -> Result<Vec<Subscription>>;

    /// Remove a notification callback
    async fn revoke(&self, callback_url: &str, appli: NotifyApplication) -> Result<()>;
}
