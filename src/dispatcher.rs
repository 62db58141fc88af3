//! Маршрутизация операций брокера в реестр лотов.

use tracing::{debug, warn};

use crate::config::TaxConfig;
use crate::error::ReportError;
use crate::ledger::{CashField, ReportPositions, UnmatchedSale};
use crate::position::PositionByFIFO;
use crate::types::{Operation, OperationType};

/// Как операция влияет на реестр.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    /// Пропорциональное зачисление в поле лотов.
    Proportional(CashField),
    /// Открытие нового лота.
    Purchase,
    /// Списание лотов по FIFO.
    Sale,
    /// Уже учтено в покупке или продаже.
    Ignored,
}

impl OperationClass {
    /// Классифицирует тип операции.
    pub fn of(kind: OperationType) -> Result<Self, ReportError> {
        let class = match kind {
            OperationType::CouponTax | OperationType::DividendTax => {
                Self::Proportional(CashField::PaidTax)
            }
            OperationType::PartialRedemption => {
                Self::Proportional(CashField::PartialEarlyRepayment)
            }
            OperationType::Dividend => Self::Proportional(CashField::Dividend),
            OperationType::Coupon => Self::Proportional(CashField::Coupon),
            OperationType::StampDuty => Self::Proportional(CashField::Comission),
            OperationType::Buy
            | OperationType::BuyCard
            | OperationType::InputSecurities
            | OperationType::TransferFromIis => Self::Purchase,
            OperationType::Sell => Self::Sale,
            OperationType::BrokerFee => Self::Ignored,
            OperationType::Unknown(code) => return Err(ReportError::UnknownOperation { code }),
        };
        Ok(class)
    }
}

impl ReportPositions {
    /// Применяет одну операцию к реестру.
    pub fn apply(&mut self, operation: &Operation, config: &TaxConfig) -> Result<(), ReportError> {
        match OperationClass::of(operation.operation_type)? {
            OperationClass::Proportional(field) => self.distribute(operation.payment, field)?,
            OperationClass::Purchase => {
                let quantity = operation.quantity_done.abs();
                if quantity.is_zero() {
                    debug!(date = %operation.date, "unfilled purchase skipped");
                    return Ok(());
                }
                let price = match operation.operation_type {
                    OperationType::InputSecurities => config
                        .override_price(&operation.instrument_uid)
                        .unwrap_or(operation.price),
                    _ => operation.price,
                };
                self.push_lot(PositionByFIFO::open(operation, quantity, price));
            }
            OperationClass::Sale => {
                if operation.quantity_done.is_zero() {
                    debug!(date = %operation.date, "unfilled sale skipped");
                    return Ok(());
                }
                self.sell(UnmatchedSale::from_operation(operation))?;
            }
            OperationClass::Ignored => {
                debug!(date = %operation.date, "transaction fee already accounted");
                return Ok(());
            }
        }

        debug!(
            instrument = %self.instrument_uid,
            date = %operation.date,
            kind = operation.operation_type.code(),
            quantity = %self.quantity,
            "operation applied"
        );
        Ok(())
    }

    /// Проигрывает историю операций с нуля, по возрастанию дат. Первая
    /// ошибка прерывает разбор.
    pub fn replay<'a, I>(
        instrument_uid: impl Into<String>,
        operations: I,
        config: &TaxConfig,
    ) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = &'a Operation>,
    {
        let mut ordered: Vec<&Operation> = operations.into_iter().collect();
        ordered.sort_by_key(|op| op.date);

        let mut ledger = Self::new(instrument_uid);
        for operation in ordered {
            if let Err(err) = ledger.apply(operation, config) {
                warn!(
                    instrument = %ledger.instrument_uid,
                    date = %operation.date,
                    kind = operation.operation_type.code(),
                    error = %err,
                    "operation rejected"
                );
                return Err(err);
            }
        }
        Ok(ledger)
    }
}
