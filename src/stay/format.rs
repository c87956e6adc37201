use crate::stay::duration::{Elapsed, elapsed_millis};
use chrono::{DateTime, TimeZone};
use std::fmt;
use tracing::debug;

const INVALID_HUMAN: &str = "-";
const INVALID_CLOCK: &str = "00:00:00";

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Elapsed::Known(stay) => write!(f, "{}h {}m", stay.hours, stay.minutes),
            Elapsed::Invalid => f.write_str(INVALID_HUMAN),
        }
    }
}

/// `"{h}h {m}m"`, or `"-"` when the entry moment was unreadable.
pub fn format_human(elapsed: &Elapsed) -> String {
    elapsed.to_string()
}

/// Running clock `HH:mm:ss` for an open entry.
///
/// Seconds are truncated. Hours keep counting past 24 and past two digits.
pub fn format_clock<Tz: TimeZone>(
    entry_date: Option<&str>,
    entry_time: Option<&str>,
    now: &DateTime<Tz>,
) -> String {
    match elapsed_millis(entry_date, entry_time, now) {
        Ok(diff_ms) => clock_from_secs((diff_ms.max(0) / 1000) as u64),
        Err(err) => {
            debug!(%err, "stay clock unavailable");
            INVALID_CLOCK.to_string()
        }
    }
}

fn clock_from_secs(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}
