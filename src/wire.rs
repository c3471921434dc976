// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Withings payload structures and their conversion into domain records.
//!
//! Every optional wire field stays optional; a missing timezone means the
//! instants are produced in UTC.

use crate::codes::{
    Attribution, DeviceModel, Gender, MeasureCategory, NotifyApplication, SleepState,
};
use crate::convert::{epoch_to_instant, measure_quantity, optional_instant, parse_timezone};
use crate::errors::{Result, WithingsError};
use crate::models::{
    ActivitySummary, BodyMeasurements, IntradayActivity, MeasureGroup, SleepData,
    SleepDataPoint, SleepSummary, SleepSummaryData, Subscription, UserInfo,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Deserialize a success payload into its wire structure
pub(crate) fn decode<T: DeserializeOwned>(payload: Value, context: &'static str) -> Result<T> {
    serde_json::from_value(payload).map_err(|source| WithingsError::Decode { context, source })
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| WithingsError::InvalidPayload(format!("invalid calendar date '{}'", value)))
}

/// Vendor flags arrive as `0`/`1` or as booleans depending on the endpoint
fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

fn public_flags(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

// user / getbyuserid

#[derive(Debug, Deserialize)]
pub(crate) struct UsersBody {
    #[serde(default)]
    users: Vec<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: i64,
    firstname: Option<String>,
    lastname: Option<String>,
    shortname: Option<String>,
    gender: Option<i64>,
    fatmethod: Option<i64>,
    birthdate: Option<i64>,
    ispublic: Option<Value>,
}

impl UsersBody {
    pub(crate) fn into_users(self) -> Result<Vec<UserInfo>> {
        self.users
            .into_iter()
            .map(|user| {
                Ok(UserInfo {
                    id: user.id,
                    first_name: user.firstname,
                    last_name: user.lastname,
                    short_name: user.shortname,
                    gender: user.gender.map(Gender::from_code),
                    fat_method: user.fatmethod,
                    birth_date: optional_instant(user.birthdate, None)?,
                    public_flags: user.ispublic.as_ref().and_then(public_flags),
                })
            })
            .collect()
    }
}

// measure / getmeas

#[derive(Debug, Deserialize)]
pub(crate) struct MeasureBody {
    updatetime: Option<i64>,
    timezone: Option<String>,
    #[serde(default)]
    measuregrps: Vec<RawMeasureGroup>,
    more: Option<Value>,
    offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawMeasureGroup {
    grpid: i64,
    attrib: i64,
    date: i64,
    category: i64,
    #[serde(default)]
    measures: Vec<RawMeasure>,
}

#[derive(Debug, Deserialize)]
struct RawMeasure {
    value: i64,
    #[serde(rename = "type")]
    measure_type: i64,
    /// Power-of-ten exponent of `value`
    unit: i32,
}

impl MeasureBody {
    pub(crate) fn into_measurements(self) -> Result<BodyMeasurements> {
        let timezone = parse_timezone(self.timezone.as_deref());

        let groups = self
            .measuregrps
            .into_iter()
            .map(|group| {
                Ok(MeasureGroup {
                    group_id: group.grpid,
                    attribution: Attribution::from_code(group.attrib),
                    date: epoch_to_instant(group.date, timezone)?,
                    category: MeasureCategory::from_code(group.category),
                    measures: group
                        .measures
                        .into_iter()
                        .map(|m| measure_quantity(m.measure_type, m.value, m.unit))
                        .collect::<Result<_>>()?,
                })
            })
            .collect::<Result<_>>()?;

        Ok(BodyMeasurements {
            updated: optional_instant(self.updatetime, timezone)?,
            timezone,
            groups,
            more: flag(self.more.as_ref()),
            offset: self.offset,
        })
    }
}

// measure / getactivity

#[derive(Debug, Deserialize)]
pub(crate) struct RawActivity {
    date: String,
    timezone: Option<String>,
    steps: Option<i64>,
    distance: Option<f64>,
    calories: Option<f64>,
    elevation: Option<f64>,
    soft: Option<i64>,
    moderate: Option<i64>,
    intense: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivitiesBody {
    #[serde(default)]
    activities: Vec<RawActivity>,
}

impl RawActivity {
    pub(crate) fn into_summary(self) -> Result<ActivitySummary> {
        Ok(ActivitySummary {
            date: parse_date(&self.date)?,
            timezone: parse_timezone(self.timezone.as_deref()),
            steps: self.steps,
            distance: self.distance,
            calories: self.calories,
            elevation: self.elevation,
            soft: self.soft,
            moderate: self.moderate,
            intense: self.intense,
        })
    }
}

impl ActivitiesBody {
    pub(crate) fn into_summaries(self) -> Result<Vec<ActivitySummary>> {
        self.activities
            .into_iter()
            .map(RawActivity::into_summary)
            .collect()
    }
}

// measure / getintradayactivity

#[derive(Debug, Deserialize)]
pub(crate) struct IntradayBody {
    #[serde(default)]
    series: HashMap<String, RawIntradaySample>,
}

#[derive(Debug, Deserialize)]
struct RawIntradaySample {
    duration: Option<i64>,
    steps: Option<i64>,
    distance: Option<f64>,
    calories: Option<f64>,
    elevation: Option<f64>,
}

impl IntradayBody {
    pub(crate) fn into_samples(self) -> Result<Vec<IntradayActivity>> {
        let mut samples = self
            .series
            .into_iter()
            .map(|(epoch, sample)| {
                let seconds: i64 = epoch.parse().map_err(|_| {
                    WithingsError::InvalidPayload(format!("invalid intraday key '{}'", epoch))
                })?;
                Ok(IntradayActivity {
                    time: epoch_to_instant(seconds, None)?,
                    duration: sample.duration,
                    steps: sample.steps,
                    distance: sample.distance,
                    calories: sample.calories,
                    elevation: sample.elevation,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        samples.sort_by(|a, b| a.time.cmp(&b.time));
        Ok(samples)
    }
}

// sleep / getsummary

#[derive(Debug, Deserialize)]
pub(crate) struct SleepSummaryBody {
    #[serde(default)]
    series: Vec<RawSleepSummary>,
}

#[derive(Debug, Deserialize)]
struct RawSleepSummary {
    id: i64,
    timezone: Option<String>,
    model: i64,
    startdate: i64,
    enddate: i64,
    date: Option<String>,
    modified: Option<i64>,
    #[serde(default)]
    data: RawSleepSummaryData,
}

#[derive(Debug, Default, Deserialize)]
struct RawSleepSummaryData {
    wakeupduration: Option<i64>,
    lightsleepduration: Option<i64>,
    deepsleepduration: Option<i64>,
    remsleepduration: Option<i64>,
    wakeupcount: Option<i64>,
    durationtosleep: Option<i64>,
    durationtowakeup: Option<i64>,
}

impl SleepSummaryBody {
    pub(crate) fn into_summaries(self) -> Result<Vec<SleepSummary>> {
        self.series
            .into_iter()
            .map(|night| {
                let timezone = parse_timezone(night.timezone.as_deref());
                Ok(SleepSummary {
                    id: night.id,
                    timezone,
                    model: DeviceModel::from_code(night.model),
                    start: epoch_to_instant(night.startdate, timezone)?,
                    end: epoch_to_instant(night.enddate, timezone)?,
                    date: night.date.as_deref().map(parse_date).transpose()?,
                    modified: optional_instant(night.modified, timezone)?,
                    data: SleepSummaryData {
                        wakeup_duration: night.data.wakeupduration,
                        light_sleep_duration: night.data.lightsleepduration,
                        deep_sleep_duration: night.data.deepsleepduration,
                        rem_sleep_duration: night.data.remsleepduration,
                        wakeup_count: night.data.wakeupcount,
                        duration_to_sleep: night.data.durationtosleep,
                        duration_to_wakeup: night.data.durationtowakeup,
                    },
                })
            })
            .collect()
    }
}

// sleep / get

#[derive(Debug, Deserialize)]
pub(crate) struct SleepBody {
    #[serde(default)]
    series: Vec<RawSleepPoint>,
    model: i64,
}

#[derive(Debug, Deserialize)]
struct RawSleepPoint {
    startdate: i64,
    enddate: i64,
    state: i64,
}

impl SleepBody {
    pub(crate) fn into_sleep_data(self) -> Result<SleepData> {
        let points = self
            .series
            .into_iter()
            .map(|point| {
                Ok(SleepDataPoint {
                    start: epoch_to_instant(point.startdate, None)?,
                    end: epoch_to_instant(point.enddate, None)?,
                    state: SleepState::from_code(point.state),
                })
            })
            .collect::<Result<_>>()?;

        Ok(SleepData {
            model: DeviceModel::from_code(self.model),
            points,
        })
    }
}

// notify / list

#[derive(Debug, Deserialize)]
pub(crate) struct ProfilesBody {
    #[serde(default)]
    profiles: Vec<RawProfile>,
}

#[derive(Debug, Deserialize)]
struct RawProfile {
    appli: Option<i64>,
    callbackurl: String,
    comment: Option<String>,
    expires: Option<i64>,
}

impl ProfilesBody {
    pub(crate) fn into_subscriptions(self) -> Result<Vec<Subscription>> {
        self.profiles
            .into_iter()
            .map(|profile| {
                Ok(Subscription {
                    appli: profile.appli.map(NotifyApplication::from_code),
                    callback_url: profile.callbackurl,
                    comment: profile.comment,
                    expires: optional_instant(profile.expires, None)?,
                })
            })
            .collect()
    }
}
