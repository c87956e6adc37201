use crate::stay::duration::{Elapsed, compute_elapsed};
use crate::stay::fee::compute_fee;
use crate::stay::format::{format_clock, format_human};
use crate::stay::fractions::resolve_fractions;
use chrono::{DateTime, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything a price column shows for one open entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StayQuote {
    pub elapsed: Elapsed,
    pub fractions: u64,
    pub total: Decimal,
    pub human: String,
    pub clock: String,
}

/// Quote an open entry as of `now`.
///
/// An unreadable entry moment still bills the minimum single fraction.
pub fn quote_stay<Tz: TimeZone>(
    entry_date: Option<&str>,
    entry_time: Option<&str>,
    tolerance_minutes: Option<u32>,
    hourly_rate: Decimal,
    now: &DateTime<Tz>,
) -> StayQuote {
    let elapsed = compute_elapsed(entry_date, entry_time, now);
    let fractions = resolve_fractions(elapsed.or_zero(), tolerance_minutes);

    StayQuote {
        elapsed,
        fractions,
        total: compute_fee(fractions, hourly_rate),
        human: format_human(&elapsed),
        clock: format_clock(entry_date, entry_time, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_quote_open_entry() {
        let now = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(11, 15, 0)
            .unwrap()
            .and_utc();
        let quote = quote_stay(
            Some("2025-01-01"),
            Some("10:00:00"),
            Some(10),
            Decimal::new(500, 2),
            &now,
        );

        assert_eq!(quote.fractions, 2);
        assert_eq!(quote.total, Decimal::new(1000, 2));
        assert_eq!(quote.human, "1h 15m");
        assert_eq!(quote.clock, "01:15:00");
    }

    #[test]
    fn test_quote_malformed_entry_bills_minimum() {
        let quote = quote_stay(None, Some("10:00:00"), None, Decimal::new(300, 0), &Utc::now());

        assert_eq!(quote.elapsed, Elapsed::Invalid);
        assert_eq!(quote.fractions, 1);
        assert_eq!(quote.total, Decimal::new(300, 0));
        assert_eq!(quote.human, "-");
        assert_eq!(quote.clock, "00:00:00");
    }
}
