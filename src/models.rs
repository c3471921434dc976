// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Domain records returned by the client. Each one is the vendor payload with
//! epoch timestamps replaced by timezone-aware instants, integer codes
//! replaced by the enums in [`crate::codes`], and fixed-point magnitudes
//! replaced by decimals carrying a unit.
//!
//! ## Core Models
//!
//! - [`UserInfo`]: Profile of the authorized user
//! - [`BodyMeasurements`]: Page of [`MeasureGroup`]s from the scale or monitor
//! - [`ActivitySummary`]: Daily activity totals
//! - [`IntradayActivity`]: Fine-grained activity samples
//! - [`SleepSummary`]: Nightly sleep totals
//! - [`SleepData`]: Sleep state transitions for a period
//! - [`Subscription`]: Registered notification callback
//!
//! Records are produced fresh for every call and owned by the caller.

use crate::codes::{
    Attribution, DeviceModel, Gender, MeasureCategory, MeasureType, NotifyApplication, SleepState,
};
use crate::convert::Quantity;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;

/// Profile of a Withings user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Three-letter nickname shown on devices
    pub short_name: Option<String>,
    pub gender: Option<Gender>,
    /// Fat measurement method, passed through as sent
    pub fat_method: Option<i64>,
    pub birth_date: Option<DateTime<Tz>>,
    /// Bitmask of the data types the user shares publicly
    pub public_flags: Option<i64>,
}

impl UserInfo {
    /// Whether any data type is shared publicly
    pub fn is_public(&self) -> Option<bool> {
        self.public_flags.map(|flags| flags != 0)
    }

    /// Whether every bit of `mask` is set in the public flags
    pub fn shares(&self, mask: i64) -> bool {
        self.public_flags.is_some_and(|flags| flags & mask == mask)
    }
}

/// One page of body measurements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMeasurements {
    /// Server time of the last update, in the user's timezone
    pub updated: Option<DateTime<Tz>>,
    pub timezone: Option<Tz>,
    pub groups: Vec<MeasureGroup>,
    /// More groups are available past `offset`
    pub more: bool,
    pub offset: Option<i64>,
}

/// Measures taken together at one moment (e.g. a single weigh-in)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureGroup {
    pub group_id: i64,
    pub attribution: Attribution,
    pub date: DateTime<Tz>,
    pub category: MeasureCategory,
    pub measures: Vec<Quantity>,
}

impl MeasureGroup {
    /// First measure of the given type in this group
    pub fn get(&self, measure_type: MeasureType) -> Option<&Quantity> {
        self.measures.iter().find(|m| m.measure_type == measure_type)
    }

    /// Weight in kilograms, if the group has one
    pub fn weight(&self) -> Option<Decimal> {
        self.get(MeasureType::Weight).map(|m| m.value)
    }

    /// The reading may have been taken by someone other than the user
    pub fn is_ambiguous(&self) -> bool {
        matches!(
            self.attribution,
            Attribution::Ambiguous | Attribution::ManualAtCreation
        )
    }

    pub fn is_measure(&self) -> bool {
        self.category == MeasureCategory::Real
    }

    pub fn is_goal(&self) -> bool {
        self.category == MeasureCategory::Goal
    }
}

/// Activity totals for a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub date: NaiveDate,
    pub timezone: Option<Tz>,
    pub steps: Option<i64>,
    /// Distance in meters
    pub distance: Option<f64>,
    /// Active calories (kcal)
    pub calories: Option<f64>,
    /// Floors climbed, in meters of elevation
    pub elevation: Option<f64>,
    /// Seconds of soft activity
    pub soft: Option<i64>,
    /// Seconds of moderate activity
    pub moderate: Option<i64>,
    /// Seconds of intense activity
    pub intense: Option<i64>,
}

/// Activity sample from the intraday series
///
/// The intraday endpoint has not been verified against the live service, so
/// every metric is optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntradayActivity {
    pub time: DateTime<Tz>,
    /// Seconds covered by this sample
    pub duration: Option<i64>,
    pub steps: Option<i64>,
    pub distance: Option<f64>,
    pub calories: Option<f64>,
    pub elevation: Option<f64>,
}

/// One night of sleep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepSummary {
    pub id: i64,
    pub timezone: Option<Tz>,
    pub model: DeviceModel,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Calendar day the night is attributed to
    pub date: Option<NaiveDate>,
    pub modified: Option<DateTime<Tz>>,
    pub data: SleepSummaryData,
}

/// Durations are in seconds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SleepSummaryData {
    pub wakeup_duration: Option<i64>,
    pub light_sleep_duration: Option<i64>,
    pub deep_sleep_duration: Option<i64>,
    pub rem_sleep_duration: Option<i64>,
    pub wakeup_count: Option<i64>,
    pub duration_to_sleep: Option<i64>,
    pub duration_to_wakeup: Option<i64>,
}

/// Sleep states recorded by one device over a period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepData {
    pub model: DeviceModel,
    pub points: Vec<SleepDataPoint>,
}

/// A span of time spent in a single sleep state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepDataPoint {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub state: SleepState,
}

/// A registered notification callback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub appli: Option<NotifyApplication>,
    pub callback_url: String,
    pub comment: Option<String>,
    pub expires: Option<DateTime<Tz>>,
}
