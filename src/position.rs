//! Налоговый лот: одна покупка, отслеживаемая до полного закрытия.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Operation};

/// Лот FIFO. Накопленные денежные поля масштабируются вместе с количеством,
/// поэтому удельные показатели лота не меняются при частичном закрытии.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionByFIFO {
    /// UID инструмента.
    pub instrument_uid: String,
    /// FIGI инструмента.
    pub figi: String,
    /// Название из операции покупки.
    pub name: String,
    /// Валюта покупки.
    pub currency: String,
    /// Открытое количество, у закрытого среза проданное.
    pub quantity: Decimal,
    /// Дата покупки.
    pub buy_date: NaiveDate,
    /// Цена покупки за единицу.
    pub buy_price: Money,
    /// НКД, уплаченный при покупке.
    pub buy_accrued_interest: Money,
    /// Цена продажи: рыночная для открытого лота, цена сделки для закрытого.
    pub sell_price: Money,
    /// НКД при продаже или текущий НКД открытого лота.
    pub sell_accrued_interest: Money,
    /// Дата продажи, только у закрытых лотов.
    pub sell_date: Option<NaiveDate>,
    /// Номинал, пересчитанный для замещающих облигаций.
    pub nominal: Money,
    /// Признак замещающей облигации.
    pub replaced: bool,
    /// Валюта, в которой номинирован замещённый выпуск.
    pub currency_if_replaced: Option<String>,
    /// Полученные купоны.
    pub total_coupon: Money,
    /// Полученные дивиденды.
    pub total_dividend: Money,
    /// Комиссии и сборы со своим знаком.
    pub total_comission: Money,
    /// Удержанный налог у источника.
    pub paid_tax: Money,
    /// Частичные досрочные погашения.
    pub partial_early_repayment: Money,
}

impl PositionByFIFO {
    /// Открывает лот по операции покупки.
    #[must_use]
    pub fn open(operation: &Operation, quantity: Decimal, buy_price: Money) -> Self {
        Self {
            instrument_uid: operation.instrument_uid.clone(),
            figi: operation.figi.clone(),
            name: operation.name.clone(),
            currency: operation.currency.clone(),
            quantity,
            buy_date: operation.date,
            buy_price,
            buy_accrued_interest: operation.accrued_interest,
            sell_price: Decimal::ZERO,
            sell_accrued_interest: Decimal::ZERO,
            sell_date: None,
            nominal: Decimal::ZERO,
            replaced: false,
            currency_if_replaced: None,
            total_coupon: Decimal::ZERO,
            total_dividend: Decimal::ZERO,
            total_comission: operation.commission,
            paid_tax: Decimal::ZERO,
            partial_early_repayment: Decimal::ZERO,
        }
    }

    /// Лот закрыт продажей.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.sell_date.is_some()
    }

    /// Стоимость покупки без НКД.
    #[must_use]
    pub fn cost(&self) -> Money {
        self.buy_price * self.quantity
    }

    /// Отделяет долю `share` накопленных полей в новый лот, оставляя в этом
    /// лоте `1 - share`. Количество меняет вызывающий.
    pub(crate) fn split_off(&mut self, share: Decimal) -> Self {
        let keep = Decimal::ONE - share;
        let mut taken = self.clone();

        for (own, part) in [
            (&mut self.total_comission, &mut taken.total_comission),
            (&mut self.paid_tax, &mut taken.paid_tax),
            (&mut self.buy_accrued_interest, &mut taken.buy_accrued_interest),
            (&mut self.total_coupon, &mut taken.total_coupon),
            (&mut self.total_dividend, &mut taken.total_dividend),
            (&mut self.partial_early_repayment, &mut taken.partial_early_repayment),
        ] {
            *part = *own * share;
            *own *= keep;
        }

        taken
    }
}
