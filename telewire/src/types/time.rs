use std::fmt;

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use snafu::{ensure, OptionExt, Snafu};


const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Snafu)]
pub enum InvalidTimestamp {
    #[snafu(display("timestamp is before the Unix epoch: {secs}"))]
    BeforeEpoch { secs: i64 },

    #[snafu(display("timestamp is out of the representable range: {secs}"))]
    OutOfRange { secs: i64 },
}


// -----------------------------------------------------------------------------
//     Timestamp
// -----------------------------------------------------------------------------

/// Point in time with second precision, encoded as Unix seconds.
///
/// The wire value `0` is reserved to mean "no date" and decodes to
/// [`Timestamp::Unset`]. The Bot API never sends the actual epoch start.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Timestamp {
    #[default]
    Unset,
    At(DateTime<Utc>),
}

impl Timestamp {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        Some(Timestamp::At(
            NaiveDate::from_ymd_opt(year, month, day)?
                .and_hms_opt(hour, min, sec)?
                .and_utc()))
    }

    /// Decode a number of seconds since the epoch.
    ///
    /// ## Example
    /// ```
    /// # use telewire::Timestamp;
    /// assert_eq!(Timestamp::from_unix(0)?, Timestamp::Unset);
    /// assert_eq!(Timestamp::from_unix(1700000000)?, Timestamp::new(2023, 11, 14, 22, 13, 20).unwrap());
    /// assert!(Timestamp::from_unix(-1).is_err());
    /// # Ok::<(), telewire::InvalidTimestamp>(())
    /// ```
    pub fn from_unix(secs: i64) -> Result<Self, InvalidTimestamp> {
        ensure!(secs >= 0, BeforeEpochSnafu { secs });
        if secs == 0 {
            return Ok(Timestamp::Unset);
        }
        let dt = DateTime::from_timestamp(secs, 0).context(OutOfRangeSnafu { secs })?;
        Ok(Timestamp::At(dt))
    }

    /// Encode as a number of seconds since the epoch, sub-second precision is dropped.
    pub fn to_unix(&self) -> Result<i64, InvalidTimestamp> {
        match self {
            Timestamp::Unset => Ok(0),
            Timestamp::At(dt) => {
                let secs = dt.timestamp();
                ensure!(secs >= 0, BeforeEpochSnafu { secs });
                Ok(secs)
            },
        }
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Unset => None,
            Timestamp::At(dt) => Some(*dt),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Timestamp::Unset)
    }
}

/// Sub-second precision is truncated so that the value survives a round trip.
impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Timestamp {
        Timestamp::At(dt.trunc_subsecs(0))
    }
}

impl From<Option<DateTime<Utc>>> for Timestamp {
    fn from(dt: Option<DateTime<Utc>>) -> Timestamp {
        dt.map_or(Timestamp::Unset, Timestamp::from)
    }
}

impl TryFrom<i64> for Timestamp {
    type Error = InvalidTimestamp;

    fn try_from(secs: i64) -> Result<Self, Self::Error> {
        Timestamp::from_unix(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Unset => write!(f, "unset"),
            Timestamp::At(dt) => write!(f, "{}", dt.format(DATE_FORMAT)),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let secs = self.to_unix().map_err(ser::Error::custom)?;
        serializer.serialize_i64(secs)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = i64::deserialize(deserializer)?;
        Timestamp::from_unix(secs).map_err(de::Error::custom)
    }
}


// -----------------------------------------------------------------------------
//     Ban time
// -----------------------------------------------------------------------------

/// `serde` codec for restriction end dates (`until_date` fields).
///
/// Layered on top of [`Timestamp`]: `0` means the restriction has no end date
/// and maps to `None` in both directions, as does an absent or `null` field.
///
/// ```
/// # use chrono::{DateTime, Utc};
/// # use serde::{Deserialize, Serialize};
/// #[derive(Serialize, Deserialize)]
/// struct Restriction {
///     #[serde(default, with = "telewire::types::ban_time")]
///     until_date: Option<DateTime<Utc>>,
/// }
/// ```
pub mod ban_time {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Timestamp::from(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ts: Option<Timestamp> = Option::deserialize(deserializer)?;
        Ok(ts.and_then(|ts| ts.datetime()))
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================
