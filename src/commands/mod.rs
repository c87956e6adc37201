pub mod config;
pub mod ingresos;
pub mod quote;
pub mod salidas;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;

/// Resolve the clock a listing is computed against: `--now` read as local
/// wall-clock time, or the system clock.
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<Local>> {
    let Some(raw) = now else {
        return Ok(Local::now());
    };

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .with_context(|| format!("Invalid --now '{}', expected YYYY-MM-DDTHH:MM:SS", raw))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("'{}' does not exist in the local time zone", raw))
}

/// Amounts are shown with two decimals; the computed value is never rounded.
pub(crate) fn money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

pub(crate) fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
