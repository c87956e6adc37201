use rust_decimal::Decimal;

/// Amount due for `fractions` hourly units at `hourly_rate`.
///
/// No rounding is applied; the result keeps the rate's scale. A product
/// beyond `Decimal`'s range saturates to `Decimal::MAX` (or `MIN` for a
/// negative rate).
pub fn compute_fee(fractions: u64, hourly_rate: Decimal) -> Decimal {
    hourly_rate
        .checked_mul(Decimal::from(fractions.max(1)))
        .unwrap_or(if hourly_rate.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}
