//! Column helpers shared by entity definitions.
//!
//! ```ignore
//! #[derive(sqlx::FromRow, serde::Serialize)]
//! struct Article {
//!     #[sqlx(try_from = "i64")]
//!     id: Id,
//!     title: String,
//!     #[sqlx(try_from = "Option<NaiveDateTime>")]
//!     published_at: LocalTime,
//!     #[sqlx(try_from = "Option<NaiveDateTime>")]
//!     deleted_at: DeletedAt,
//! }
//! ```

use std::fmt;
use std::num::TryFromIntError;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use serde::de::{self, Deserializer};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Serialize};

use crate::value::{SqlValue, ToSqlValue};

/// Layout used for every timestamp this crate writes or renders.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Auto-increment primary key.
///
/// Zero means the row has not been inserted yet.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id(pub u64);

impl Id {
    /// Creates a key.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns whether a value has been assigned.
    pub const fn is_set(self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for Id {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl TryFrom<i64> for Id {
    type Error = TryFromIntError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        u64::try_from(id).map(Self)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keys beyond `i64::MAX` cannot exist in SQLite and bind as `NULL`, which
/// matches no row.
impl ToSqlValue for Id {
    fn to_sql_value(self) -> SqlValue {
        i64::try_from(self.0).map_or(SqlValue::Null, SqlValue::Int)
    }
}

/// Soft-delete marker. A row with a timestamp here is logically deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletedAt(pub Option<NaiveDateTime>);

impl DeletedAt {
    /// A marker stamped with the current local time.
    pub fn now() -> Self {
        Self(Some(Local::now().naive_local()))
    }

    /// Returns whether the row is logically deleted.
    pub const fn is_deleted(&self) -> bool {
        self.0.is_some()
    }
}

impl From<Option<NaiveDateTime>> for DeletedAt {
    fn from(at: Option<NaiveDateTime>) -> Self {
        Self(at)
    }
}

impl ToSqlValue for DeletedAt {
    fn to_sql_value(self) -> SqlValue {
        self.0.to_sql_value()
    }
}

impl Serialize for DeletedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(at) => serializer.serialize_str(&at.format(TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for DeletedAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| NaiveDateTime::parse_from_str(&s, TIME_FORMAT).map_err(de::Error::custom))
            .transpose()
            .map(Self)
    }
}

/// A wall-clock timestamp rendered as `YYYY-MM-DD HH:MM:SS`.
///
/// The zero value (`0001-01-01 00:00:00`, also the `Default`) stands for
/// "unset": it is written to the database as NULL, and a NULL column reads
/// back as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTime(pub NaiveDateTime);

impl LocalTime {
    /// The unset value.
    pub fn zero() -> Self {
        Self(
            NaiveDate::from_ymd_opt(1, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap_or(NaiveDateTime::MIN),
        )
    }

    /// The current local time, truncated to seconds.
    pub fn now() -> Self {
        let now = Local::now().naive_local();
        Self(now.with_nanosecond(0).unwrap_or(now))
    }

    /// Returns whether this is the unset value.
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Parses `YYYY-MM-DD HH:MM:SS`.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDateTime::parse_from_str(s, TIME_FORMAT).map(Self)
    }
}

impl Default for LocalTime {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<NaiveDateTime> for LocalTime {
    fn from(at: NaiveDateTime) -> Self {
        Self(at)
    }
}

impl From<Option<NaiveDateTime>> for LocalTime {
    fn from(at: Option<NaiveDateTime>) -> Self {
        at.map_or_else(Self::zero, Self)
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl ToSqlValue for LocalTime {
    fn to_sql_value(self) -> SqlValue {
        if self.is_zero() {
            SqlValue::Null
        } else {
            self.0.to_sql_value()
        }
    }
}

impl Serialize for LocalTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocalTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}

/// Unix seconds, rendered in JSON as local `YYYY-MM-DD HH:MM:SS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTimeStamp(pub i64);

impl LocalTimeStamp {
    /// The local wall-clock time of this instant.
    pub fn to_local(self) -> Option<NaiveDateTime> {
        Local
            .timestamp_opt(self.0, 0)
            .single()
            .map(|at| at.naive_local())
    }
}

impl From<i64> for LocalTimeStamp {
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

impl ToSqlValue for LocalTimeStamp {
    fn to_sql_value(self) -> SqlValue {
        SqlValue::Int(self.0)
    }
}

impl Serialize for LocalTimeStamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let at = self
            .to_local()
            .ok_or_else(|| ser::Error::custom(format!("timestamp {} out of range", self.0)))?;
        serializer.collect_str(&at.format(TIME_FORMAT))
    }
}
