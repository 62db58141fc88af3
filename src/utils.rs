//! Вспомогательные расчёты: округление, доли и сроки владения.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ReportError;

/// Округляет до двух знаков, середину от нуля.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Делит, сообщая о нулевом знаменателе как о `ZeroQuantity`.
pub fn checked_ratio(
    numerator: Decimal,
    denominator: Decimal,
    context: &'static str,
) -> Result<Decimal, ReportError> {
    if denominator.is_zero() {
        return Err(ReportError::ZeroQuantity { context });
    }
    numerator
        .checked_div(denominator)
        .ok_or(ReportError::Arithmetic { context })
}

/// Прошло ли с `from` до `to` не меньше `years` календарных лет.
#[must_use]
pub fn held_at_least_years(from: NaiveDate, to: NaiveDate, years: u32) -> bool {
    from.checked_add_months(Months::new(years.saturating_mul(12)))
        .is_some_and(|threshold| threshold <= to)
}

/// Число дней между датами (может быть отрицательным).
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
