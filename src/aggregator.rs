//! Строки отчёта по лотам и сводные позиции по инструментам.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculator::{LotResult, annualized_return, profit_percentage};
use crate::config::TaxConfig;
use crate::error::ReportError;
use crate::position::PositionByFIFO;
use crate::types::{BondIdentIdentifiers, MarketData, Money, RUB};
use crate::utils::{checked_ratio, round2};

/// Корзина отчёта по валюте и типу облигации.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ReportBucket {
    /// Рублёвые облигации.
    Rub,
    /// Замещающие облигации.
    Replaced,
    /// Валютные облигации.
    Currency,
}

impl ReportBucket {
    /// Замещающие первыми, затем валюта не рубль, иначе рублёвые.
    #[must_use]
    pub fn classify(replaced: bool, currency: &str) -> Self {
        if replaced {
            Self::Replaced
        } else if is_rub(currency) {
            Self::Rub
        } else {
            Self::Currency
        }
    }
}

fn is_rub(currency: &str) -> bool {
    currency.is_empty() || currency.eq_ignore_ascii_case(RUB)
}

/// Строка отчёта по одному лоту, открытому или закрытому.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BondReport {
    /// UID инструмента.
    pub instrument_uid: String,
    /// FIGI.
    pub figi: String,
    /// Тикер.
    pub ticker: String,
    /// Название.
    pub name: String,
    /// Валюта лота.
    pub currency: String,
    /// Замещающая облигация.
    pub replaced: bool,
    /// Дата покупки.
    pub buy_date: NaiveDate,
    /// Дата продажи закрытого лота.
    pub sell_date: Option<NaiveDate>,
    /// Количество.
    pub quantity: Decimal,
    /// Цена покупки.
    pub buy_price: Money,
    /// НКД при покупке.
    pub buy_accrued_interest: Money,
    /// Цена продажи или текущая оценка.
    pub sell_price: Money,
    /// НКД при продаже или текущий.
    pub sell_accrued_interest: Money,
    /// Номинал.
    pub nominal: Money,
    /// Купоны.
    pub total_coupon: Money,
    /// Дивиденды.
    pub total_dividend: Money,
    /// Комиссии.
    pub total_comission: Money,
    /// Удержанный налог.
    pub paid_tax: Money,
    /// Частичные погашения.
    pub partial_early_repayment: Money,
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
    /// Дата погашения, оферты или выкупа.
    pub maturity_date: Option<NaiveDate>,
    /// Дюрация.
    pub duration: Option<Decimal>,
    /// Текущая доходность к погашению или оферте.
    pub current_yield: Option<Decimal>,
    /// Доходность на момент покупки.
    pub buy_yield: Option<Decimal>,
}

impl BondReport {
    /// Строит строку по лоту с подмешанными справочными данными.
    pub fn from_lot(
        lot: &PositionByFIFO,
        bond: Option<&BondIdentIdentifiers>,
        market: Option<&MarketData>,
        as_of: NaiveDate,
        config: &TaxConfig,
    ) -> Result<Self, ReportError> {
        let result = LotResult::compute(lot, as_of, config)?;
        let market = market.cloned().unwrap_or_default();

        Ok(Self {
            instrument_uid: lot.instrument_uid.clone(),
            figi: lot.figi.clone(),
            ticker: bond.map(|b| b.ticker.clone()).unwrap_or_default(),
            name: bond.map_or_else(|| lot.name.clone(), |b| b.name.clone()),
            currency: lot.currency.clone(),
            replaced: lot.replaced,
            buy_date: lot.buy_date,
            sell_date: lot.sell_date,
            quantity: lot.quantity,
            buy_price: lot.buy_price,
            buy_accrued_interest: lot.buy_accrued_interest,
            sell_price: lot.sell_price,
            sell_accrued_interest: lot.sell_accrued_interest,
            nominal: lot.nominal,
            total_coupon: lot.total_coupon,
            total_dividend: lot.total_dividend,
            total_comission: lot.total_comission,
            paid_tax: lot.paid_tax,
            partial_early_repayment: lot.partial_early_repayment,
            profit_before_tax: result.profit_before_tax,
            tax: result.tax,
            net_profit: result.net_profit,
            profit_percentage: result.profit_percentage,
            annualized_return: result.annualized_return,
            maturity_date: market.effective_maturity_date(),
            duration: market.duration,
            current_yield: market.current_yield(),
            buy_yield: market.buy_yield(),
        })
    }
}

/// Строки по лотам, разделённые на рублёвые и валютные.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BondReportSet {
    /// Лоты в рублях.
    pub rub: Vec<BondReport>,
    /// Лоты в иных валютах.
    pub currency: Vec<BondReport>,
}

impl BondReportSet {
    /// Кладёт строку в корзину по валюте лота.
    pub fn push(&mut self, report: BondReport) {
        if is_rub(&report.currency) {
            self.rub.push(report);
        } else {
            self.currency.push(report);
        }
    }

    /// Всего строк.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rub.len() + self.currency.len()
    }

    /// Строк нет.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Сводная строка по инструменту.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneralBondReportPosition {
    /// UID инструмента.
    pub instrument_uid: String,
    /// Тикер.
    pub ticker: String,
    /// Название.
    pub name: String,
    /// Валюта.
    pub currency: String,
    /// Замещающая облигация.
    pub replaced: bool,
    /// Самая ранняя покупка.
    pub buy_date: NaiveDate,
    /// Общее количество.
    pub quantity: Decimal,
    /// Средневзвешенная цена покупки.
    pub average_buy_price: Money,
    /// Стоимость покупки всех лотов в валюте инструмента.
    pub total_cost: Money,
    /// Та же стоимость в рублях.
    pub cost_in_rub: Money,
    /// Доля в портфеле, %.
    pub portfolio_weight: Decimal,
    /// Прибыль до налога.
    pub profit_before_tax: Money,
    /// Сумма налогов, посчитанных по каждому лоту.
    pub tax: Money,
    /// Прибыль после налога.
    pub net_profit: Money,
    /// Доходность, %.
    pub profit_percentage: Decimal,
    /// Годовая доходность, %.
    pub annualized_return: Decimal,
    /// Дата погашения, оферты или выкупа.
    pub maturity_date: Option<NaiveDate>,
    /// Дюрация.
    pub duration: Option<Decimal>,
    /// Текущая доходность к погашению или оферте.
    pub current_yield: Option<Decimal>,
    /// Доходность на момент покупки.
    pub buy_yield: Option<Decimal>,
}

impl GeneralBondReportPosition {
    /// Сворачивает лоты одного инструмента в одну строку. Налог считается
    /// по каждому лоту отдельно, с его сроком владения.
    ///
    /// `total_portfolio_value` задаётся в рублях, `fx_rate` переводит
    /// стоимость лотов в рубли для доли в портфеле.
    pub fn aggregate<'a, I>(
        lots: I,
        bond: Option<&BondIdentIdentifiers>,
        market: Option<&MarketData>,
        total_portfolio_value: Money,
        fx_rate: Decimal,
        as_of: NaiveDate,
        config: &TaxConfig,
    ) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = &'a PositionByFIFO>,
    {
        let mut lots = lots.into_iter().peekable();
        let first = *lots.peek().ok_or(ReportError::ZeroQuantity {
            context: "instrument aggregation",
        })?;

        let mut quantity = Decimal::ZERO;
        let mut total_cost = Decimal::ZERO;
        let mut profit = Decimal::ZERO;
        let mut tax = Decimal::ZERO;
        let mut net = Decimal::ZERO;
        let mut buy_date = first.buy_date;

        for lot in lots {
            let result = LotResult::compute(lot, as_of, config)?;
            quantity += lot.quantity;
            total_cost += lot.cost();
            profit += result.profit_before_tax;
            tax += result.tax;
            net += result.net_profit;
            buy_date = buy_date.min(lot.buy_date);
        }

        let average_buy_price = checked_ratio(total_cost, quantity, "average buy price")?;
        let cost_in_rub = total_cost * fx_rate;
        let portfolio_weight = round2(
            checked_ratio(cost_in_rub, total_portfolio_value, "portfolio weight")?
                * Decimal::ONE_HUNDRED,
        );
        let market = market.cloned().unwrap_or_default();

        Ok(Self {
            instrument_uid: first.instrument_uid.clone(),
            ticker: bond.map(|b| b.ticker.clone()).unwrap_or_default(),
            name: bond.map_or_else(|| first.name.clone(), |b| b.name.clone()),
            currency: first.currency.clone(),
            replaced: first.replaced,
            buy_date,
            quantity,
            average_buy_price,
            total_cost,
            cost_in_rub,
            portfolio_weight,
            profit_before_tax: profit,
            tax,
            net_profit: net,
            profit_percentage: profit_percentage(net, average_buy_price, quantity)?,
            annualized_return: annualized_return(
                net,
                average_buy_price,
                quantity,
                buy_date,
                as_of,
            )?,
            maturity_date: market.effective_maturity_date(),
            duration: market.duration,
            current_yield: market.current_yield(),
            buy_yield: market.buy_yield(),
        })
    }

    /// Корзина строки.
    #[must_use]
    pub fn bucket(&self) -> ReportBucket {
        ReportBucket::classify(self.replaced, &self.currency)
    }
}

/// Сводные позиции, разложенные по корзинам.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneralBondReport {
    /// Рублёвые облигации.
    pub rub_bonds: Vec<GeneralBondReportPosition>,
    /// Замещающие облигации.
    pub replaced_bonds: Vec<GeneralBondReportPosition>,
    /// Валютные облигации.
    pub currency_bonds: Vec<GeneralBondReportPosition>,
}

impl GeneralBondReport {
    /// Кладёт позицию в её корзину.
    pub fn push(&mut self, position: GeneralBondReportPosition) {
        match position.bucket() {
            ReportBucket::Rub => self.rub_bonds.push(position),
            ReportBucket::Replaced => self.replaced_bonds.push(position),
            ReportBucket::Currency => self.currency_bonds.push(position),
        }
    }

    /// Все позиции корзины.
    #[must_use]
    pub fn bucket(&self, bucket: ReportBucket) -> &[GeneralBondReportPosition] {
        match bucket {
            ReportBucket::Rub => &self.rub_bonds,
            ReportBucket::Replaced => &self.replaced_bonds,
            ReportBucket::Currency => &self.currency_bonds,
        }
    }

    /// Структура портфеля по стоимости покупки в рублях.
    #[must_use]
    pub fn structure(&self) -> PortfolioStructure {
        let cost = |bucket| -> Money {
            self.bucket(bucket).iter().map(|p| p.cost_in_rub).sum()
        };
        let rub = cost(ReportBucket::Rub);
        let replaced = cost(ReportBucket::Replaced);
        let currency = cost(ReportBucket::Currency);
        let total = rub + replaced + currency;
        if total.is_zero() {
            return PortfolioStructure::default();
        }

        let share = |part: Money| round2(part / total * Decimal::ONE_HUNDRED);
        PortfolioStructure {
            rub_bonds: share(rub),
            replaced_bonds: share(replaced),
            currency_bonds: share(currency),
        }
    }
}

/// Доли корзин в стоимости портфеля, %.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioStructure {
    /// Рублёвые облигации.
    pub rub_bonds: Decimal,
    /// Замещающие облигации.
    pub replaced_bonds: Decimal,
    /// Валютные облигации.
    pub currency_bonds: Decimal,
}
