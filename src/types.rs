//! Доменные типы: операции брокера, справочные данные облигаций и курсы.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Денежное значение, используем `Decimal` для точных расчётов.
pub type Money = Decimal;

/// Валюта, считающаяся базовой для корзин отчёта.
pub const RUB: &str = "rub";

/// Идентификатор брокерского счёта.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

/// Тип операции брокера. Коды совпадают с моделью данных брокера.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum OperationType {
    /// Удержание НДФЛ по купонам.
    CouponTax,
    /// Удержание налога по дивидендам.
    DividendTax,
    /// Частичное досрочное погашение облигаций.
    PartialRedemption,
    /// Покупка ЦБ.
    Buy,
    /// Покупка ЦБ с карты.
    BuyCard,
    /// Перевод ценных бумаг из другого депозитария.
    InputSecurities,
    /// Удержание комиссии за операцию.
    BrokerFee,
    /// Выплата дивидендов.
    Dividend,
    /// Продажа ЦБ.
    Sell,
    /// Выплата купонов.
    Coupon,
    /// Гербовый сбор.
    StampDuty,
    /// Перевод ценных бумаг с ИИС на брокерский счёт.
    TransferFromIis,
    /// Код, который учёт не поддерживает.
    Unknown(u32),
}

impl OperationType {
    /// Числовой код брокера.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::CouponTax => 2,
            Self::DividendTax => 8,
            Self::PartialRedemption => 10,
            Self::Buy => 15,
            Self::BuyCard => 16,
            Self::InputSecurities => 17,
            Self::BrokerFee => 19,
            Self::Dividend => 21,
            Self::Sell => 22,
            Self::Coupon => 23,
            Self::StampDuty => 47,
            Self::TransferFromIis => 57,
            Self::Unknown(code) => code,
        }
    }
}

impl From<u32> for OperationType {
    fn from(code: u32) -> Self {
        match code {
            2 => Self::CouponTax,
            8 => Self::DividendTax,
            10 => Self::PartialRedemption,
            15 => Self::Buy,
            16 => Self::BuyCard,
            17 => Self::InputSecurities,
            19 => Self::BrokerFee,
            21 => Self::Dividend,
            22 => Self::Sell,
            23 => Self::Coupon,
            47 => Self::StampDuty,
            57 => Self::TransferFromIis,
            other => Self::Unknown(other),
        }
    }
}

impl From<OperationType> for u32 {
    fn from(kind: OperationType) -> Self {
        kind.code()
    }
}

/// Нормализованная операция брокера по одному инструменту.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Тип операции.
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    /// Исполненное количество; ноль означает неисполненную заявку.
    #[serde(default)]
    pub quantity_done: Decimal,
    /// Цена за единицу в валюте лота.
    #[serde(default)]
    pub price: Money,
    /// Сумма операции со знаком, как её прислал брокер.
    #[serde(default)]
    pub payment: Money,
    /// Комиссия со своим знаком.
    #[serde(default)]
    pub commission: Money,
    /// НКД на момент сделки.
    #[serde(default)]
    pub accrued_interest: Money,
    /// Дата операции.
    pub date: NaiveDate,
    /// Валюта операции.
    #[serde(default)]
    pub currency: String,
    /// UID инструмента.
    pub instrument_uid: String,
    /// FIGI инструмента.
    #[serde(default)]
    pub figi: String,
    /// Тип инструмента (`bond`, `share` и т.п.).
    #[serde(default)]
    pub instrument_type: String,
    /// Название инструмента.
    #[serde(default)]
    pub name: String,
}

/// Статические справочные данные облигации.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BondIdentIdentifiers {
    /// Тикер.
    pub ticker: String,
    /// Код режима торгов.
    #[serde(default)]
    pub class_code: String,
    /// Отображаемое имя.
    pub name: String,
    /// Номинал.
    pub nominal: Money,
    /// Валюта номинала.
    pub nominal_currency: String,
    /// Замещающая облигация, номинал требует пересчёта по курсу.
    #[serde(default)]
    pub replaced: bool,
}

/// Курс валюты на дату расчёта: не задан, явно пустой или значение.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Decimal>", into = "Option<Decimal>")]
pub enum Rate {
    /// Курс не запрашивался.
    #[default]
    Absent,
    /// Источник вернул пустое значение.
    Null,
    /// Известный курс.
    Present(Decimal),
}

impl Rate {
    /// Значение курса, если оно есть.
    #[must_use]
    pub const fn value(self) -> Option<Decimal> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }
}

impl From<Option<Decimal>> for Rate {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Self::Null, Self::Present)
    }
}

impl From<Rate> for Option<Decimal> {
    fn from(rate: Rate) -> Self {
        rate.value()
    }
}

/// Рыночные данные по облигации от внешнего источника.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketData {
    /// Дата погашения.
    pub maturity_date: Option<NaiveDate>,
    /// Дата оферты.
    pub offer_date: Option<NaiveDate>,
    /// Дата обратного выкупа.
    pub buyback_date: Option<NaiveDate>,
    /// Дюрация, дней.
    pub duration: Option<Decimal>,
    /// Текущая доходность к погашению, %.
    pub yield_to_maturity: Option<Decimal>,
    /// Текущая доходность к оферте, %.
    pub yield_to_offer: Option<Decimal>,
    /// Доходность к погашению на момент покупки, %.
    pub buy_yield_to_maturity: Option<Decimal>,
    /// Доходность к оферте на момент покупки, %.
    pub buy_yield_to_offer: Option<Decimal>,
}

impl MarketData {
    /// Дата, до которой фактически держится бумага: ранняя из оферты и
    /// выкупа, иначе погашение.
    #[must_use]
    pub fn effective_maturity_date(&self) -> Option<NaiveDate> {
        match (self.offer_date, self.buyback_date) {
            (Some(offer), Some(buyback)) => Some(offer.min(buyback)),
            (Some(date), None) | (None, Some(date)) => Some(date),
            (None, None) => self.maturity_date,
        }
    }

    /// Текущая доходность, к оферте при её наличии.
    #[must_use]
    pub fn current_yield(&self) -> Option<Decimal> {
        self.yield_to_offer.or(self.yield_to_maturity)
    }

    /// Доходность на момент покупки, к оферте при её наличии.
    #[must_use]
    pub fn buy_yield(&self) -> Option<Decimal> {
        self.buy_yield_to_offer.or(self.buy_yield_to_maturity)
    }
}
