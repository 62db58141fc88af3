//! Реестр лотов одного инструмента на одном счёте: покупки, продажи по FIFO
//! и пропорциональное распределение денежных событий.

use std::collections::VecDeque;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::calculator::{calculate_nominal, calculate_sell_price};
use crate::error::ReportError;
use crate::position::PositionByFIFO;
use crate::types::{BondIdentIdentifiers, Money, Operation, Rate};
use crate::utils::checked_ratio;

/// Поле лота, в которое зачисляется денежное событие.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashField {
    /// Купоны.
    Coupon,
    /// Дивиденды.
    Dividend,
    /// Налог, удержанный у источника.
    PaidTax,
    /// Комиссии и сборы.
    Comission,
    /// Частичное досрочное погашение.
    PartialEarlyRepayment,
}

impl CashField {
    const fn slot(self, lot: &mut PositionByFIFO) -> &mut Money {
        match self {
            Self::Coupon => &mut lot.total_coupon,
            Self::Dividend => &mut lot.total_dividend,
            Self::PaidTax => &mut lot.paid_tax,
            Self::Comission => &mut lot.total_comission,
            Self::PartialEarlyRepayment => &mut lot.partial_early_repayment,
        }
    }
}

/// Остаток продажи, ещё не сопоставленный с лотами.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedSale {
    /// Несопоставленное количество.
    pub quantity: Decimal,
    /// НКД, приходящийся на остаток.
    pub accrued_interest: Money,
    /// Комиссия, приходящаяся на остаток.
    pub commission: Money,
    /// Цена продажи за единицу.
    pub price: Money,
    /// Дата продажи.
    pub date: NaiveDate,
}

impl UnmatchedSale {
    /// Остаток, равный всей операции продажи.
    #[must_use]
    pub fn from_operation(operation: &Operation) -> Self {
        Self {
            quantity: operation.quantity_done.abs(),
            accrued_interest: operation.accrued_interest,
            commission: operation.commission,
            price: operation.price,
            date: operation.date,
        }
    }

    /// Списывает долю `share` остатка и возвращает списанные НКД и комиссию.
    fn consume(&mut self, share: Decimal) -> (Money, Money) {
        let accrued = self.accrued_interest * share;
        let commission = self.commission * share;
        self.accrued_interest -= accrued;
        self.commission -= commission;
        (accrued, commission)
    }

    /// Закрывает лот (или его срез) этой продажей.
    fn close(&self, lot: &mut PositionByFIFO, accrued: Money, commission: Money) {
        lot.sell_date = Some(self.date);
        lot.sell_price = self.price;
        lot.sell_accrued_interest = accrued;
        lot.total_comission += commission;
    }
}

/// Реестр лотов в порядке покупок. `quantity` всегда равно сумме
/// количеств открытых лотов; лоты с нулевым количеством не хранятся.
#[derive(Debug, Clone, Default)]
pub struct ReportPositions {
    /// Идентификатор инструмента.
    pub instrument_uid: String,
    /// Суммарное открытое количество.
    pub quantity: Decimal,
    lots: VecDeque<PositionByFIFO>,
    closed: Vec<PositionByFIFO>,
}

impl ReportPositions {
    /// Пустой реестр для инструмента.
    #[must_use]
    pub fn new(instrument_uid: impl Into<String>) -> Self {
        Self {
            instrument_uid: instrument_uid.into(),
            ..Self::default()
        }
    }

    /// Открытые лоты, старые первыми.
    pub fn lots(&self) -> impl ExactSizeIterator<Item = &PositionByFIFO> {
        self.lots.iter()
    }

    /// Закрытые продажами лоты и их срезы в порядке продаж.
    #[must_use]
    pub fn closed(&self) -> &[PositionByFIFO] {
        &self.closed
    }

    /// Нет открытых лотов.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Стоимость открытых лотов по цене покупки.
    #[must_use]
    pub fn total_cost(&self) -> Money {
        self.lots.iter().map(PositionByFIFO::cost).sum()
    }

    /// Добавляет лот в конец очереди.
    pub fn push_lot(&mut self, lot: PositionByFIFO) {
        self.quantity += lot.quantity;
        self.lots.push_back(lot);
    }

    /// Распределяет выплату по открытым лотам пропорционально их доле.
    /// Знаменатель фиксируется до изменения лотов.
    pub fn distribute(&mut self, payment: Money, field: CashField) -> Result<(), ReportError> {
        if self.quantity.is_zero() {
            return Err(ReportError::ZeroQuantity {
                context: "cash distribution",
            });
        }
        let total = self.quantity;
        for lot in &mut self.lots {
            let share = checked_ratio(lot.quantity, total, "cash distribution")?;
            *field.slot(lot) += payment * share;
        }
        Ok(())
    }

    /// Сопоставляет продажу с лотами по FIFO.
    pub fn sell(&mut self, mut sale: UnmatchedSale) -> Result<(), ReportError> {
        if sale.quantity > self.quantity {
            return Err(ReportError::InsufficientQuantity {
                instrument: self.instrument_uid.clone(),
                requested: sale.quantity,
                available: self.quantity,
            });
        }
        self.quantity -= sale.quantity;

        let mut consumed = 0;
        let mut partial = None;
        for lot in &mut self.lots {
            if lot.quantity > sale.quantity {
                let share = checked_ratio(sale.quantity, lot.quantity, "partial lot close")?;
                let mut slice = lot.split_off(share);
                slice.quantity = sale.quantity;
                lot.quantity -= sale.quantity;
                let (accrued, commission) = sale.consume(Decimal::ONE);
                sale.close(&mut slice, accrued, commission);
                debug!(
                    instrument = %self.instrument_uid,
                    sold = %slice.quantity,
                    left = %lot.quantity,
                    "lot partially closed"
                );
                partial = Some(slice);
                break;
            }

            consumed += 1;
            if lot.quantity == sale.quantity {
                let (accrued, commission) = sale.consume(Decimal::ONE);
                sale.close(lot, accrued, commission);
                break;
            }

            let share = checked_ratio(lot.quantity, sale.quantity, "multi-lot sale")?;
            let (accrued, commission) = sale.consume(share);
            sale.close(lot, accrued, commission);
            sale.quantity -= lot.quantity;
        }

        for lot in self.lots.drain(..consumed) {
            debug!(
                instrument = %self.instrument_uid,
                quantity = %lot.quantity,
                buy_date = %lot.buy_date,
                "lot closed"
            );
            self.closed.push(lot);
        }
        self.closed.extend(partial);
        Ok(())
    }

    /// Обновляет рыночную оценку открытых лотов на дату отчёта.
    pub fn mark_to_market(
        &mut self,
        bond: &BondIdentIdentifiers,
        last_price: Money,
        rate: Rate,
        accrued_per_unit: Money,
    ) {
        let nominal = self.apply_reference(bond, rate);
        let sell_price = calculate_sell_price(nominal, last_price);
        for lot in &mut self.lots {
            lot.sell_price = sell_price;
            lot.sell_accrued_interest = accrued_per_unit * lot.quantity;
        }
    }

    /// Переносит справочные данные облигации на все лоты, открытые и
    /// закрытые. Возвращает номинал после пересчёта по курсу.
    pub fn apply_reference(&mut self, bond: &BondIdentIdentifiers, rate: Rate) -> Money {
        let nominal = calculate_nominal(bond.nominal, bond.replaced, rate);
        let currency_if_replaced = bond.replaced.then(|| bond.nominal_currency.clone());
        for lot in self.lots.iter_mut().chain(self.closed.iter_mut()) {
            lot.nominal = nominal;
            lot.replaced = bond.replaced;
            lot.currency_if_replaced.clone_from(&currency_if_replaced);
        }
        nominal
    }

    /// Оценивает открытые лоты по цене покупки, когда котировки нет.
    pub fn mark_at_cost(&mut self) {
        for lot in &mut self.lots {
            lot.sell_price = lot.buy_price;
            lot.sell_accrued_interest = Decimal::ZERO;
        }
    }
}
