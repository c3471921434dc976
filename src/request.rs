// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Request Builder
//!
//! Maps each logical operation onto Withings' `{resource, action, params}`
//! addressing. Builders are pure: they never see credentials, and the
//! `action`/`userid` keys are merged in by the client just before signing.
//!
//! Parameter encodings:
//! - calendar strings (`YYYY-MM-DD`) for activity and sleep summaries
//! - epoch seconds for body measurements, intraday activity and sleep data

use crate::codes::{MeasureCategory, MeasureType, NotifyApplication};
use crate::constants::{actions, params, resources};
use crate::convert::{date_string, instant_to_epoch};
use crate::errors::{Result, WithingsError};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

/// A fully addressed, unsigned API request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub resource: &'static str,
    pub action: &'static str,
    pub params: BTreeMap<String, String>,
}

impl ApiRequest {
    fn new(resource: &'static str, action: &'static str) -> Self {
        Self {
            resource,
            action,
            params: BTreeMap::new(),
        }
    }

    fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    fn optional_param(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// `user`/`getbyuserid`, no parameters
    pub fn user_info() -> Self {
        Self::new(resources::USER, actions::GET_BY_USER_ID)
    }

    /// `measure`/`getmeas` filtered by `options`
    pub fn body_measurements(options: &BodyMeasurementOptions) -> Result<Self> {
        options.validate()?;

        Ok(Self::new(resources::MEASURE, actions::GET_MEAS)
            .optional_param(params::START_DATE, options.after.as_ref().map(instant_to_epoch))
            .optional_param(params::END_DATE, options.before.as_ref().map(instant_to_epoch))
            .optional_param(
                params::LAST_UPDATE,
                options.updated_since.as_ref().map(instant_to_epoch),
            )
            .optional_param(params::MEASURE_TYPE, options.measure_type.map(MeasureType::code))
            .optional_param(params::CATEGORY, options.category.map(MeasureCategory::code))
            .optional_param(params::LIMIT, options.limit)
            .optional_param(params::OFFSET, options.offset))
    }

    /// `measure`/`getactivity` for a single day
    pub fn activity_summary(date: NaiveDate) -> Self {
        Self::new(resources::MEASURE, actions::GET_ACTIVITY).param(params::DATE, date_string(&date))
    }

    /// `measure`/`getactivity` for an inclusive range of days
    pub fn activity_summaries(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(resources::MEASURE, actions::GET_ACTIVITY)
            .param(params::START_DATE_YMD, date_string(&start))
            .param(params::END_DATE_YMD, date_string(&end))
    }

    /// `measure`/`getintradayactivity` between two instants
    pub fn activity_data(after: &DateTime<Utc>, before: &DateTime<Utc>) -> Self {
        Self::new(resources::MEASURE, actions::GET_INTRADAY_ACTIVITY)
            .param(params::START_DATE, instant_to_epoch(after))
            .param(params::END_DATE, instant_to_epoch(before))
    }

    /// `sleep`/`getsummary` for an inclusive range of days
    pub fn sleep_summary(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(resources::SLEEP, actions::GET_SUMMARY)
            .param(params::START_DATE_YMD, date_string(&start))
            .param(params::END_DATE_YMD, date_string(&end))
    }

    /// `sleep`/`get` for either call shape
    pub fn sleep_data(query: &SleepDataQuery) -> Self {
        let request = Self::new(resources::SLEEP, actions::GET);
        match query {
            SleepDataQuery::UpdatedSince(since) => {
                request.param(params::LAST_UPDATE, instant_to_epoch(since))
            }
            SleepDataQuery::Between { start, end } => request
                .param(params::START_DATE, instant_to_epoch(start))
                .param(params::END_DATE, instant_to_epoch(end)),
        }
    }

    /// `notify`/`subscribe`
    pub fn notify_subscribe(callback_url: &str, comment: &str, appli: NotifyApplication) -> Self {
        Self::new(resources::NOTIFY, actions::SUBSCRIBE)
            .param(params::CALLBACK_URL, callback_url)
            .param(params::COMMENT, comment)
            .param(params::APPLI, appli.code())
    }

    /// `notify`/`list`, optionally restricted to one application
    pub fn notify_list(appli: Option<NotifyApplication>) -> Self {
        Self::new(resources::NOTIFY, actions::LIST)
            .optional_param(params::APPLI, appli.map(NotifyApplication::code))
    }

    /// `notify`/`revoke`
    pub fn notify_revoke(callback_url: &str, appli: NotifyApplication) -> Self {
        Self::new(resources::NOTIFY, actions::REVOKE)
            .param(params::CALLBACK_URL, callback_url)
            .param(params::APPLI, appli.code())
    }
}

/// Filters for body measurements
///
/// `after`/`before` select by measurement date and cannot be combined with
/// `updated_since`, which selects by modification date.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use withings_client::request::BodyMeasurementOptions;
///
/// let options = BodyMeasurementOptions::new()
///     .after(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
///     .measure_type_symbol("weight")?
///     .limit(10);
/// # Ok::<(), withings_client::WithingsError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyMeasurementOptions {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub updated_since: Option<DateTime<Utc>>,
    pub measure_type: Option<MeasureType>,
    pub category: Option<MeasureCategory>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl BodyMeasurementOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(mut self, after: DateTime<Utc>) -> Self {
        self.after = Some(after);
        self
    }

    pub fn before(mut self, before: DateTime<Utc>) -> Self {
        self.before = Some(before);
        self
    }

    pub fn updated_since(mut self, since: DateTime<Utc>) -> Self {
        self.updated_since = Some(since);
        self
    }

    pub fn measure_type(mut self, measure_type: MeasureType) -> Self {
        self.measure_type = Some(measure_type);
        self
    }

    /// Filter by measure type name, e.g. `"weight"`
    pub fn measure_type_symbol(self, symbol: &str) -> Result<Self> {
        Ok(self.measure_type(MeasureType::from_symbol(symbol)?))
    }

    pub fn category(mut self, category: MeasureCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Filter by category name, `"real"` or `"goal"`
    pub fn category_symbol(self, symbol: &str) -> Result<Self> {
        Ok(self.category(MeasureCategory::from_symbol(symbol)?))
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if (self.after.is_some() || self.before.is_some()) && self.updated_since.is_some() {
            return Err(WithingsError::InvalidOptions {
                reason: "after/before cannot be combined with updated_since",
            });
        }
        Ok(())
    }
}

/// The two call shapes of the sleep data operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SleepDataQuery {
    /// Records modified at or after this instant
    UpdatedSince(DateTime<Utc>),
    /// Records inside a closed range
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}
