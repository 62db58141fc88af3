//! Расчёт прибыли, налога и доходности по отдельному лоту.

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

use crate::config::TaxConfig;
use crate::error::ReportError;
use crate::position::PositionByFIFO;
use crate::types::{Money, Rate};
use crate::utils::{checked_ratio, days_between, held_at_least_years, round2};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Средняя длина года в днях для годовой доходности.
const DAYS_IN_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

/// Номинал замещающей облигации пересчитывается по курсу, если курс известен.
#[must_use]
pub fn calculate_nominal(nominal: Money, replaced: bool, rate: Rate) -> Money {
    match rate {
        Rate::Present(value) if replaced => nominal * value,
        _ => nominal,
    }
}

/// Цена продажи из котировки в процентах от номинала.
#[must_use]
pub fn calculate_sell_price(nominal: Money, last_price_percent: Decimal) -> Money {
    round2(last_price_percent / HUNDRED * nominal)
}

/// Прибыль до налога. Комиссия хранится со своим знаком и прибавляется.
#[must_use]
pub fn profit_before_tax(lot: &PositionByFIFO) -> Money {
    (lot.sell_price - lot.buy_price) * lot.quantity + lot.sell_accrued_interest
        - lot.buy_accrued_interest
        + lot.total_coupon
        + lot.total_dividend
        + lot.total_comission
        + lot.partial_early_repayment
}

/// Налог на прибыль. Нулевой при убытке и при владении не меньше
/// `exemption_years` лет; открытый лот считается проданным `as_of`.
#[must_use]
pub fn capital_gains_tax(
    lot: &PositionByFIFO,
    profit: Money,
    as_of: NaiveDate,
    config: &TaxConfig,
) -> Money {
    let sell_date = lot.sell_date.unwrap_or(as_of);
    if profit <= Decimal::ZERO
        || held_at_least_years(lot.buy_date, sell_date, config.exemption_years)
    {
        return Decimal::ZERO;
    }
    profit * config.rate
}

/// Прибыль после налога.
#[must_use]
pub fn net_profit(profit: Money, tax: Money) -> Money {
    profit - tax
}

/// Доходность в процентах от стоимости покупки.
pub fn profit_percentage(
    net_profit: Money,
    buy_price: Money,
    quantity: Decimal,
) -> Result<Decimal, ReportError> {
    let ratio = checked_ratio(net_profit, buy_price * quantity, "profit percentage")?;
    Ok(round2(ratio * HUNDRED))
}

/// Годовая доходность в процентах. Срок меньше дня считается за день.
/// Если степень не помещается в `Decimal`, результат насыщается до
/// `Decimal::MAX`.
pub fn annualized_return(
    net_profit: Money,
    buy_price: Money,
    quantity: Decimal,
    buy_date: NaiveDate,
    sell_date: NaiveDate,
) -> Result<Decimal, ReportError> {
    if buy_date > sell_date {
        return Err(ReportError::InvalidDate {
            buy: buy_date,
            sell: sell_date,
        });
    }
    let total_return = checked_ratio(net_profit, buy_price * quantity, "annualized return")?;

    let base = Decimal::ONE + total_return;
    if base <= Decimal::ZERO {
        return Ok(-HUNDRED);
    }
    let days = Decimal::from(days_between(buy_date, sell_date).max(1));
    let exponent = checked_ratio(DAYS_IN_YEAR, days, "annualized return")?;
    let annualized = base
        .checked_powd(exponent)
        .and_then(|growth| (growth - Decimal::ONE).checked_mul(HUNDRED));
    let Some(annualized) = annualized else {
        debug!(%base, %exponent, "annualized return saturated");
        return Ok(Decimal::MAX);
    };

    Ok(round2(annualized))
}

/// Все показатели одного лота на дату отчёта.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotResult {
    /// Прибыль до налога.
    pub profit_before_tax: Money,
    /// Налог на прибыль.
    pub tax: Money,
    /// Прибыль после налога.
    pub net_profit: Money,
    /// Доходность, %.
    pub profit_percentage: Decimal,
    /// Годовая доходность, %.
    pub annualized_return: Decimal,
}

impl LotResult {
    /// Считает показатели лота; открытый лот оценивается на `as_of`.
    pub fn compute(
        lot: &PositionByFIFO,
        as_of: NaiveDate,
        config: &TaxConfig,
    ) -> Result<Self, ReportError> {
        let profit = profit_before_tax(lot);
        let tax = capital_gains_tax(lot, profit, as_of, config);
        let net = net_profit(profit, tax);
        let sell_date = lot.sell_date.unwrap_or(as_of);

        Ok(Self {
            profit_before_tax: profit,
            tax,
            net_profit: net,
            profit_percentage: profit_percentage(net, lot.buy_price, lot.quantity)?,
            annualized_return: annualized_return(
                net,
                lot.buy_price,
                lot.quantity,
                lot.buy_date,
                sell_date,
            )?,
        })
    }
}
