//! Temporal day function
//!
//! Maps a shard's temporal range to one representative day index (days
//! since 1970-01-01 in the configured zone). The day is the one containing
//! the midpoint of the range: a shard inside one day maps to that day, a
//! shard spanning `[D, D+2]` maps to `D+1`. This is an approximation, not an
//! overlap computation, and it is relied on by the partitioner.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Utc};

use crate::model::{ColumnType, ShardRange};

/// Milliseconds in one calendar day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Number of low bits holding the zone key in packed timestamp-with-zone values
pub const ZONE_KEY_BITS: u32 = 12;

/// `NaiveDate::num_days_from_ce` of 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Extracts epoch milliseconds from a packed timestamp-with-zone value
pub fn unpack_millis_utc(packed: i64) -> i64 {
    packed >> ZONE_KEY_BITS
}

/// Packs epoch milliseconds with a zone key
pub fn pack_millis_with_zone(millis: i64, zone_key: u16) -> i64 {
    (millis << ZONE_KEY_BITS) | i64::from(zone_key & 0x0fff)
}

/// Day function bound to a fixed reference zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalFunction {
    zone: FixedOffset,
}

impl TemporalFunction {
    /// Creates a day function that truncates instants in `zone`
    pub fn new(zone: FixedOffset) -> Self {
        Self { zone }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    /// Representative day of a temporal range: the day holding its midpoint.
    ///
    /// # Panics
    ///
    /// Panics if the range is not a single temporal column; extraction never
    /// builds such a temporal range.
    pub fn day_from_range(&self, range: &ShardRange) -> i64 {
        let (column_type, min) = range
            .min()
            .only()
            .unwrap_or_else(|| panic!("temporal range {} is not single-column", range));
        let (_, max) = range
            .max()
            .only()
            .unwrap_or_else(|| panic!("temporal range {} is not single-column", range));
        let (min, max) = match (min.as_i64(), max.as_i64()) {
            (Some(min), Some(max)) => (min, max),
            _ => panic!("temporal range {} holds non-integer values", range),
        };

        match column_type {
            ColumnType::Date => midpoint(min, max),
            ColumnType::Timestamp => self.day_from_millis(midpoint(min, max)),
            ColumnType::TimestampWithTimeZone => self.day_from_millis(midpoint(
                unpack_millis_utc(min),
                unpack_millis_utc(max),
            )),
            other => panic!("temporal range over non-temporal column type {}", other),
        }
    }

    fn day_from_millis(&self, millis: i64) -> i64 {
        match DateTime::from_timestamp_millis(millis) {
            Some(instant) => {
                let date = instant.with_timezone(&self.zone).date_naive();
                i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
            }
            // outside chrono's representable range
            None => {
                let local = i128::from(millis) + i128::from(self.zone.local_minus_utc()) * 1000;
                local.div_euclid(i128::from(MILLIS_PER_DAY)) as i64
            }
        }
    }
}

impl Default for TemporalFunction {
    fn default() -> Self {
        Self::utc()
    }
}

/// Floor of the mean of two values, without overflow
fn midpoint(min: i64, max: i64) -> i64 {
    ((i128::from(min) + i128::from(max)).div_euclid(2)) as i64
}
