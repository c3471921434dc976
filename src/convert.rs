// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Value Converters
//!
//! Pure functions turning wire values into domain values: epoch seconds into
//! timezone-aware instants, fixed-point integer pairs into decimals carrying a
//! unit, and calendar dates into the `YYYY-MM-DD` strings some endpoints take.

use crate::codes::{MeasureType, Unit};
use crate::errors::{Result, WithingsError};
use chrono::{DateTime, Datelike, TimeZone};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

/// Resolve an IANA timezone name sent by the vendor
///
/// Unrecognized names are logged and treated as absent, so the instant is
/// still produced in UTC.
pub fn parse_timezone(name: Option<&str>) -> Option<Tz> {
    let name = name?;
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            warn!(timezone = %name, "Unrecognized timezone in Withings payload, using UTC");
            None
        }
    }
}

/// Convert epoch seconds into an instant, expressed in `timezone` when given
///
/// The absolute instant is identical either way; the timezone only changes
/// calendar fields seen when the value is formatted.
pub fn epoch_to_instant(seconds: i64, timezone: Option<Tz>) -> Result<DateTime<Tz>> {
    let millis = seconds
        .checked_mul(1000)
        .ok_or_else(|| WithingsError::InvalidPayload(format!("epoch {} out of range", seconds)))?;
    let utc = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| WithingsError::InvalidPayload(format!("epoch {} out of range", seconds)))?;
    Ok(utc.with_timezone(&timezone.unwrap_or(Tz::UTC)))
}

/// Optional-field variant of [`epoch_to_instant`]
pub fn optional_instant(seconds: Option<i64>, timezone: Option<Tz>) -> Result<Option<DateTime<Tz>>> {
    seconds.map(|s| epoch_to_instant(s, timezone)).transpose()
}

/// Epoch seconds of an instant in any timezone
pub fn instant_to_epoch<Z: TimeZone>(instant: &DateTime<Z>) -> i64 {
    instant.timestamp()
}

/// Format a date or instant as a `YYYY-MM-DD` calendar string
///
/// For an instant the calendar fields are those of its own timezone.
pub fn date_string<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Decode a fixed-point magnitude: `value × 10^exponent`
pub fn scaled_to_decimal(value: i64, exponent: i32) -> Result<Decimal> {
    let out_of_range =
        || WithingsError::InvalidPayload(format!("magnitude {}e{} out of range", value, exponent));

    if exponent <= 0 {
        Decimal::try_new(value, exponent.unsigned_abs()).map_err(|_| out_of_range())
    } else {
        let factor = 10i64.checked_pow(exponent.unsigned_abs()).ok_or_else(out_of_range)?;
        Decimal::from(value)
            .checked_mul(Decimal::from(factor))
            .ok_or_else(out_of_range)
    }
}

/// A decoded measure value with its unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    /// Measure type, `Unknown(code)` when the vendor code is not in the table
    pub measure_type: MeasureType,
    pub value: Decimal,
    /// Unit of `value`, absent for unknown measure types
    pub unit: Option<Unit>,
}

/// Decode a `{type, value, unit}` measure triple into a [`Quantity`]
///
/// The vendor's `unit` field is the power-of-ten exponent, not a unit.
pub fn measure_quantity(type_code: i64, value: i64, exponent: i32) -> Result<Quantity> {
    let measure_type = MeasureType::from_code(type_code);
    Ok(Quantity {
        measure_type,
        value: scaled_to_decimal(value, exponent)?,
        unit: measure_type.unit(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_epoch_round_trip() {
        for epoch in [0, 1, 1_704_067_200, 1_262_304_000, -86_400] {
            let instant = epoch_to_instant(epoch, None).unwrap();
            assert_eq!(instant_to_epoch(&instant), epoch);

            let paris = epoch_to_instant(epoch, Some(chrono_tz::Europe::Paris)).unwrap();
            assert_eq!(instant_to_epoch(&paris), epoch);
        }
    }

    #[test]
    fn test_timezone_changes_calendar_fields_only() {
        let utc = epoch_to_instant(1_704_067_200, None).unwrap();
        let tokyo = epoch_to_instant(1_704_067_200, Some(chrono_tz::Asia::Tokyo)).unwrap();

        assert_eq!(utc, tokyo);
        assert_eq!(utc.hour(), 0);
        assert_eq!(tokyo.hour(), 9);
        assert_eq!(utc.timezone(), Tz::UTC);
    }

    #[test]
    fn test_epoch_out_of_range() {
        assert!(matches!(
            epoch_to_instant(i64::MAX, None),
            Err(WithingsError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone(Some("Europe/Paris")), Some(chrono_tz::Europe::Paris));
        assert_eq!(parse_timezone(Some("Mars/Olympus_Mons")), None);
        assert_eq!(parse_timezone(None), None);
    }

    #[test]
    fn test_optional_instant() {
        assert!(optional_instant(None, None).unwrap().is_none());
        let instant = optional_instant(Some(60), None).unwrap().unwrap();
        assert_eq!(instant.timestamp(), 60);
    }

    #[test]
    fn test_date_string() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_string(&date), "2024-03-07");

        // 23:30 UTC on the 31st is already the 1st in Paris
        let instant = Utc.with_ymd_and_hms(2023, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(date_string(&instant), "2023-12-31");
        assert_eq!(date_string(&instant.with_timezone(&chrono_tz::Europe::Paris)), "2024-01-01");
    }

    #[test]
    fn test_scaled_to_decimal() {
        assert_eq!(scaled_to_decimal(7500, -2).unwrap(), dec!(75.00));
        assert_eq!(scaled_to_decimal(7500, -2).unwrap().to_string(), "75.00");
        assert_eq!(scaled_to_decimal(178, -2).unwrap(), dec!(1.78));
        assert_eq!(scaled_to_decimal(65, 0).unwrap(), dec!(65));
        assert_eq!(scaled_to_decimal(12, 3).unwrap(), dec!(12000));
        assert_eq!(scaled_to_decimal(-5, -1).unwrap(), dec!(-0.5));
    }

    #[test]
    fn test_scaled_to_decimal_out_of_range() {
        assert!(scaled_to_decimal(1, -40).is_err());
        assert!(scaled_to_decimal(1, 40).is_err());
    }

    #[test]
    fn test_measure_quantity_known_type() {
        let quantity = measure_quantity(1, 7500, -2).unwrap();
        assert_eq!(quantity.measure_type, MeasureType::Weight);
        assert_eq!(quantity.value, dec!(75.00));
        assert_eq!(quantity.unit, Some(Unit::Kilograms));

        let spo2 = measure_quantity(54, 97, 0).unwrap();
        assert_eq!(spo2.unit, Some(Unit::Percent));
    }

    #[test]
    fn test_measure_quantity_unknown_type() {
        let quantity = measure_quantity(88, 1234, -1).unwrap();
        assert_eq!(quantity.measure_type, MeasureType::Unknown(88));
        assert_eq!(quantity.value, dec!(123.4));
        assert_eq!(quantity.unit, None);
    }
}
