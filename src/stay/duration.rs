//! Elapsed-time computation for parking stays.
//!
//! An entry moment arrives from the backend as two strings, `fecha_ingreso`
//! (`YYYY-MM-DD`) and `hora_ingreso` (`HH:mm:ss`), expressed in the same local
//! time zone as the clock the caller passes in.

use crate::error::EntryMomentError;
use chrono::{DateTime, NaiveDateTime, TimeZone};
use serde::Serialize;
use tracing::debug;

const MILLIS_PER_MINUTE: u64 = 60_000;

/// Accepted shapes for `"{date}T{time}"`. Seconds and fractions are optional.
const MOMENT_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Whole hours plus the remaining minutes of a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct StayDuration {
    pub hours: u64,
    /// Always in `0..=59`.
    pub minutes: u32,
}

impl StayDuration {
    pub fn from_total_minutes(total_minutes: u64) -> Self {
        Self {
            hours: total_minutes / 60,
            minutes: (total_minutes % 60) as u32,
        }
    }

    /// Saturates at `u64::MAX` for hour counts that cannot be expressed
    /// in minutes.
    pub fn total_minutes(&self) -> u64 {
        self.hours
            .saturating_mul(60)
            .saturating_add(u64::from(self.minutes))
    }
}

/// Result of a stay calculation. `Invalid` stands in for an unreadable
/// entry moment and renders as `"-"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Elapsed {
    Known(StayDuration),
    Invalid,
}

impl Elapsed {
    fn from_millis(diff_ms: i64) -> Self {
        // An entry stamped in the future has not accrued any time yet.
        let diff_ms = diff_ms.max(0) as u64;
        Elapsed::Known(StayDuration::from_total_minutes(
            diff_ms.div_ceil(MILLIS_PER_MINUTE),
        ))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Elapsed::Invalid)
    }

    pub fn known(&self) -> Option<StayDuration> {
        match self {
            Elapsed::Known(stay) => Some(*stay),
            Elapsed::Invalid => None,
        }
    }

    /// Treat an unreadable stay as zero elapsed time, the convention callers
    /// apply before resolving fractions.
    pub fn or_zero(&self) -> StayDuration {
        self.known().unwrap_or_default()
    }
}

/// Combine a date and a time-of-day into a naive local moment.
pub fn parse_moment(
    date: Option<&str>,
    time: Option<&str>,
) -> Result<NaiveDateTime, EntryMomentError> {
    let (date, time) = match (date, time) {
        (Some(d), Some(t)) if !d.trim().is_empty() && !t.trim().is_empty() => (d, t),
        _ => return Err(EntryMomentError::Missing),
    };

    let input = format!("{}T{}", date, time);
    MOMENT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&input, fmt).ok())
        .ok_or(EntryMomentError::Malformed { input })
}

/// Milliseconds between the entry moment (read in `now`'s zone) and `now`.
pub(crate) fn elapsed_millis<Tz: TimeZone>(
    entry_date: Option<&str>,
    entry_time: Option<&str>,
    now: &DateTime<Tz>,
) -> Result<i64, EntryMomentError> {
    let naive = parse_moment(entry_date, entry_time)?;
    let entry = now
        .timezone()
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| EntryMomentError::NonexistentLocalTime {
            input: naive.to_string(),
        })?;

    Ok(now
        .naive_utc()
        .signed_duration_since(entry.naive_utc())
        .num_milliseconds())
}

/// Time a still-open entry has been parked as of `now`.
///
/// Any started minute counts as a full one, so an entry one millisecond old
/// has been parked for one minute.
pub fn compute_elapsed<Tz: TimeZone>(
    entry_date: Option<&str>,
    entry_time: Option<&str>,
    now: &DateTime<Tz>,
) -> Elapsed {
    match elapsed_millis(entry_date, entry_time, now) {
        Ok(diff_ms) => Elapsed::from_millis(diff_ms),
        Err(err) => {
            debug!(%err, "stay duration unavailable");
            Elapsed::Invalid
        }
    }
}

/// Time between an entry and its recorded exit, both naive local moments.
pub fn compute_closed_stay(
    entry_date: Option<&str>,
    entry_time: Option<&str>,
    exit_date: Option<&str>,
    exit_time: Option<&str>,
) -> Elapsed {
    let moments = parse_moment(entry_date, entry_time)
        .and_then(|entry| parse_moment(exit_date, exit_time).map(|exit| (entry, exit)));

    match moments {
        Ok((entry, exit)) => Elapsed::from_millis((exit - entry).num_milliseconds()),
        Err(err) => {
            debug!(%err, "closed stay duration unavailable");
            Elapsed::Invalid
        }
    }
}
