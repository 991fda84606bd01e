//! Reference-timezone conversion and day bucketing.
//!
//! All stored and displayed timestamps use a single fixed UTC offset so
//! that calendar-day boundaries are well-defined regardless of where the
//! process runs. The default offset matches Asia/Bangkok (UTC+7), which
//! has no daylight saving.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// The default reference offset, in hours east of UTC.
pub const DEFAULT_OFFSET_HOURS: i32 = 7;

/// Builds a fixed offset from whole hours east of UTC.
///
/// Returns `None` for offsets outside the valid range (roughly ±24h).
#[must_use]
pub fn offset_hours(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours.checked_mul(3600)?)
}

/// Converts an observation time to the reference timezone.
#[must_use]
pub fn to_reference(ts: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    ts.with_timezone(&offset)
}

/// Returns the calendar day a reference-timezone timestamp falls on.
///
/// Pure function of its inputs; the timestamp must already carry the
/// reference offset (see [`to_reference`]).
#[must_use]
pub fn day_of(ts: DateTime<FixedOffset>) -> NaiveDate {
    ts.date_naive()
}
