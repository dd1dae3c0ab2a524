//! Entity and index value types.
//!
//! Plain data structs mirroring the store schema, plus [`DateKey`], the
//! validated day-granularity date used as the calendar index key.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use crate::error::StoreError;

pub type UserId = i64;
pub type SpecialDateId = i64;
pub type WishlistItemId = i64;

/// A registered account. Password/session handling lives outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub created_at_us: i64,
}

/// A user-owned record of one significant calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDate {
    pub id: SpecialDateId,
    pub user_id: UserId,
    pub title: String,
    /// Canonical `YYYY-MM-DD` key, as validated by [`DateKey`].
    pub date: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at_us: i64,
}

/// Fields for creating a special date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSpecialDate {
    pub title: String,
    pub date: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// An optional gift idea attached to a special date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: WishlistItemId,
    pub special_date_id: SpecialDateId,
    pub item_name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub price: Option<f64>,
}

/// Fields for creating a wishlist item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewWishlistItem {
    pub item_name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub price: Option<f64>,
}

/// Minimal per-title payload stored in a calendar entry.
///
/// Deliberately omits description/category/owner: it only marks a date as
/// occupied by a named event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub title: String,
    pub date: String,
}

/// Derived cross-user index row for one occupied date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date: String,
    /// ISO weekday: Monday = 1 .. Sunday = 7.
    pub day_of_week: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    /// Event title -> summary. Empty maps never persist: the row is
    /// deleted when the last title is removed.
    pub events: BTreeMap<String, EventSummary>,
}

/// A validated day-granularity calendar date.
///
/// Parses strict `YYYY-MM-DD` input (the original form also submitted
/// unpadded values; those canonicalize on [`fmt::Display`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Parse a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDate`] when the input does not parse
    /// as a real calendar date.
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| StoreError::InvalidDate {
                value: value.to_string(),
            })
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// ISO weekday number: Monday = 1 .. Sunday = 7.
    #[must_use]
    pub fn weekday(self) -> u32 {
        self.0.weekday().number_from_monday()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
