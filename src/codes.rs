// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Code Tables
//!
//! Static mappings between the small integers Withings puts on the wire and
//! the symbolic values exposed by this crate.
//!
//! Every table is a closed enum with an extra `Unknown(i64)` variant. Lookup
//! by code never fails: a code the table does not know is carried through as
//! `Unknown(code)` so callers can observe new vendor codes. Lookup by symbol
//! is strict and returns [`WithingsError::UnknownSymbol`] for anything not in
//! the table, since it is only used to validate caller input.
//!
//! ```rust
//! use withings_client::codes::{MeasureType, SleepState, Unit};
//!
//! assert_eq!(SleepState::from_code(3), SleepState::Rem);
//! assert_eq!(SleepState::from_code(9), SleepState::Unknown(9));
//! assert_eq!(MeasureType::Weight.unit(), Some(Unit::Kilograms));
//! assert_eq!("weight".parse::<MeasureType>().unwrap().code(), 1);
//! ```

use crate::errors::WithingsError;
use serde::{Serialize, Serializer};
use std::fmt;

macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $name:ident, $table:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $symbol:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Code not present in the table, preserved verbatim
            Unknown(i64),
        }

        impl $name {
            /// Every entry of the table, in code order
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            /// Resolve a vendor code, passing unrecognized codes through
            pub const fn from_code(code: i64) -> Self {
                match code {
                    $( $code => Self::$variant, )+
                    other => Self::Unknown(other),
                }
            }

            /// Vendor code for this value
            pub const fn code(self) -> i64 {
                match self {
                    $( Self::$variant => $code, )+
                    Self::Unknown(code) => code,
                }
            }

            /// Symbolic name, or `None` for an unrecognized code
            pub const fn symbol(self) -> Option<&'static str> {
                match self {
                    $( Self::$variant => Some($symbol), )+
                    Self::Unknown(_) => None,
                }
            }

            pub const fn is_known(self) -> bool {
                !matches!(self, Self::Unknown(_))
            }

            /// Reverse lookup of a symbol supplied by a caller
            pub fn from_symbol(symbol: &str) -> Result<Self, WithingsError> {
                Self::KNOWN
                    .iter()
                    .copied()
                    .find(|entry| entry.symbol() == Some(symbol))
                    .ok_or_else(|| WithingsError::UnknownSymbol {
                        table: $table,
                        symbol: symbol.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.symbol() {
                    Some(symbol) => f.write_str(symbol),
                    None => write!(f, "{}", self.code()),
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = WithingsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_symbol(s)
            }
        }

        // Known values serialize as their symbol, unknown ones as the raw code
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self.symbol() {
                    Some(symbol) => serializer.serialize_str(symbol),
                    None => serializer.serialize_i64(self.code()),
                }
            }
        }
    };
}

code_table! {
    /// Outcome reported in the `status` field of every response envelope
    StatusCode, "status" {
        Success = 0 => "success",
        BadUserId = 247 => "bad-userid",
        NotAuthorized = 250 => "not-authorized",
        BadOAuthSignature = 342 => "bad-oauth-signature",
        InvalidParams = 503 => "invalid-params",
        TooManyRequests = 601 => "too-many-requests",
        BadAction = 2554 => "bad-action",
        UnknownError = 2555 => "unknown-error",
        UndefinedService = 2556 => "undefined-service",
    }
}

code_table! {
    Gender, "gender" {
        Male = 0 => "male",
        Female = 1 => "female",
    }
}

code_table! {
    /// Device that produced a measurement or sleep record
    DeviceModel, "device model" {
        /// Entered by the user rather than a device
        User = 0 => "user",
        BodyScale = 1 => "body-scale",
        BloodPressureMonitor = 4 => "blood-pressure-monitor",
        Pulse = 16 => "pulse",
        Aura = 32 => "aura",
    }
}

code_table! {
    /// Whether a measure group is an actual reading or a user objective
    MeasureCategory, "measurement category" {
        Real = 1 => "real",
        Goal = 2 => "goal",
    }
}

code_table! {
    /// Physical quantity carried by a single measure
    MeasureType, "measurement type" {
        Weight = 1 => "weight",
        Height = 4 => "height",
        FatFreeMass = 5 => "fat-free-mass",
        FatRatio = 6 => "fat-ratio",
        FatMassWeight = 8 => "fat-mass-weight",
        DiastolicBloodPressure = 9 => "blood-pressure-diastolic",
        SystolicBloodPressure = 10 => "blood-pressure-systolic",
        HeartPulse = 11 => "heart-pulse",
        SpO2 = 54 => "spo2",
    }
}

code_table! {
    SleepState, "sleep state" {
        Awake = 0 => "awake",
        Light = 1 => "light",
        Deep = 2 => "deep",
        Rem = 3 => "rem",
    }
}

code_table! {
    /// How a measure group was attributed to the user
    Attribution, "attribution" {
        /// Captured by a device known to belong to the user
        Device = 0 => "device",
        /// Captured by a device that may belong to someone else
        Ambiguous = 1 => "ambiguous",
        Manual = 2 => "manual",
        /// Entered manually while the account was being created
        ManualAtCreation = 4 => "manual-at-creation",
    }
}

code_table! {
    /// Data category a notification subscription watches
    NotifyApplication, "notification application" {
        Weight = 1 => "weight",
        Heart = 4 => "heart",
        Activity = 16 => "activity",
        Sleep = 44 => "sleep",
    }
}

/// Physical unit attached to a measure value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kilograms,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "mmHg")]
    MillimetersOfMercury,
    #[serde(rename = "bpm")]
    BeatsPerMinute,
}

impl Unit {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Kilograms => "kg",
            Self::Meters => "m",
            Self::Percent => "%",
            Self::MillimetersOfMercury => "mmHg",
            Self::BeatsPerMinute => "bpm",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl MeasureType {
    /// Unit the vendor uses for this measure, `None` when the type is unknown
    pub const fn unit(self) -> Option<Unit> {
        match self {
            Self::Weight | Self::FatFreeMass | Self::FatMassWeight => Some(Unit::Kilograms),
            Self::Height => Some(Unit::Meters),
            Self::FatRatio | Self::SpO2 => Some(Unit::Percent),
            Self::DiastolicBloodPressure | Self::SystolicBloodPressure => {
                Some(Unit::MillimetersOfMercury)
            }
            Self::HeartPulse => Some(Unit::BeatsPerMinute),
            Self::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_resolve_to_documented_symbols() {
        let expected = [
            (0, "success"),
            (247, "bad-userid"),
            (250, "not-authorized"),
            (342, "bad-oauth-signature"),
            (503, "invalid-params"),
            (601, "too-many-requests"),
            (2554, "bad-action"),
            (2555, "unknown-error"),
            (2556, "undefined-service"),
        ];

        for (code, symbol) in expected {
            let status = StatusCode::from_code(code);
            assert_eq!(status.symbol(), Some(symbol), "code {}", code);
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn test_unknown_codes_pass_through() {
        for code in [-1, 1, 248, 600, 2557, 100_000] {
            assert_eq!(StatusCode::from_code(code), StatusCode::Unknown(code));
            assert_eq!(StatusCode::from_code(code).code(), code);
        }
        assert_eq!(SleepState::from_code(9), SleepState::Unknown(9));
        assert_eq!(DeviceModel::from_code(64), DeviceModel::Unknown(64));
        assert_eq!(Gender::from_code(2).to_string(), "2");
    }

    #[test]
    fn test_sleep_states() {
        assert_eq!(SleepState::from_code(0), SleepState::Awake);
        assert_eq!(SleepState::from_code(1), SleepState::Light);
        assert_eq!(SleepState::from_code(2), SleepState::Deep);
        assert_eq!(SleepState::from_code(3), SleepState::Rem);
    }

    #[test]
    fn test_measure_type_units() {
        assert_eq!(MeasureType::from_code(1).unit(), Some(Unit::Kilograms));
        assert_eq!(MeasureType::from_code(4).unit(), Some(Unit::Meters));
        assert_eq!(MeasureType::from_code(5).unit(), Some(Unit::Kilograms));
        assert_eq!(MeasureType::from_code(6).unit(), Some(Unit::Percent));
        assert_eq!(MeasureType::from_code(8).unit(), Some(Unit::Kilograms));
        assert_eq!(MeasureType::from_code(9).unit(), Some(Unit::MillimetersOfMercury));
        assert_eq!(MeasureType::from_code(10).unit(), Some(Unit::MillimetersOfMercury));
        assert_eq!(MeasureType::from_code(11).unit(), Some(Unit::BeatsPerMinute));
        assert_eq!(MeasureType::from_code(54).unit(), Some(Unit::Percent));
        assert_eq!(MeasureType::from_code(76).unit(), None);

        for measure_type in MeasureType::KNOWN {
            assert!(measure_type.unit().is_some(), "{} has no unit", measure_type);
        }
    }

    #[test]
    fn test_reverse_lookup() {
        assert_eq!(MeasureType::from_symbol("weight").unwrap(), MeasureType::Weight);
        assert_eq!("goal".parse::<MeasureCategory>().unwrap().code(), 2);
        assert_eq!(DeviceModel::from_symbol("aura").unwrap().code(), 32);

        for entry in NotifyApplication::KNOWN {
            let symbol = entry.symbol().unwrap();
            assert_eq!(NotifyApplication::from_symbol(symbol).unwrap(), *entry);
        }
    }

    #[test]
    fn test_reverse_lookup_rejects_unknown_symbols() {
        for symbol in ["", "Weight", "bmi", "1"] {
            match MeasureType::from_symbol(symbol) {
                Err(WithingsError::UnknownSymbol { table, symbol: s }) => {
                    assert_eq!(table, "measurement type");
                    assert_eq!(s, symbol);
                }
                other => panic!("Expected UnknownSymbol, got {:?}", other),
            }
        }

        assert!(matches!(
            "target".parse::<MeasureCategory>(),
            Err(WithingsError::UnknownSymbol { table: "measurement category", .. })
        ));
    }

    #[test]
    fn test_serialization_uses_symbols() {
        assert_eq!(serde_json::to_value(SleepState::Rem).unwrap(), "rem");
        assert_eq!(serde_json::to_value(SleepState::Unknown(9)).unwrap(), 9);
        assert_eq!(serde_json::to_value(Unit::MillimetersOfMercury).unwrap(), "mmHg");
    }
}
