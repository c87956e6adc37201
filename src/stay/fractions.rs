use crate::stay::duration::StayDuration;

/// Number of hourly fractions to bill for a stay.
///
/// Each whole hour is one fraction. A partial hour adds one more unless it
/// falls within the company's tolerance window; a remainder equal to the
/// tolerance is still inside the window. Without a tolerance every started
/// hour is billed. At least one fraction is always billed, and the count
/// saturates at `u64::MAX`.
pub fn resolve_fractions(stay: StayDuration, tolerance_minutes: Option<u32>) -> u64 {
    let mut fractions = stay.hours;

    if stay.minutes > 0 {
        let beyond_tolerance = match tolerance_minutes {
            Some(tolerance) => stay.minutes > tolerance,
            None => true,
        };
        if beyond_tolerance {
            fractions = fractions.saturating_add(1);
        }
    }

    fractions.max(1)
}
