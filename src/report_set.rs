//! Набор реестров по всем инструментам счёта.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::TaxConfig;
use crate::error::ReportError;
use crate::ledger::ReportPositions;
use crate::snapshot::AccountSnapshot;
use crate::types::{AccountId, Money, Operation};

/// Реестры лотов одного счёта, по одному на инструмент.
#[derive(Debug, Clone, Default)]
pub struct ReportSet {
    /// Идентификатор счёта.
    pub account_id: AccountId,
    /// Реестры по UID инструмента.
    pub ledgers: BTreeMap<String, ReportPositions>,
}

impl ReportSet {
    /// Группирует операции по инструментам и проигрывает каждую историю.
    pub fn from_operations(
        account_id: AccountId,
        operations: &[Operation],
        config: &TaxConfig,
    ) -> Result<Self, ReportError> {
        let mut grouped: BTreeMap<&str, Vec<&Operation>> = BTreeMap::new();
        for operation in operations {
            grouped
                .entry(operation.instrument_uid.as_str())
                .or_default()
                .push(operation);
        }

        let mut ledgers = BTreeMap::new();
        for (uid, history) in grouped {
            let ledger = ReportPositions::replay(uid, history, config)?;
            ledgers.insert(uid.to_string(), ledger);
        }

        debug!(account = %account_id.0, instruments = ledgers.len(), "ledgers replayed");
        Ok(Self {
            account_id,
            ledgers,
        })
    }

    /// Реестр конкретного инструмента.
    #[inline]
    #[must_use]
    pub fn by_instrument(&self, instrument_uid: &str) -> Option<&ReportPositions> {
        self.ledgers.get(instrument_uid)
    }

    /// Стоимость всех открытых лотов по цене покупки, в валютах лотов.
    #[must_use]
    pub fn total_cost(&self) -> Money {
        self.ledgers.values().map(ReportPositions::total_cost).sum()
    }

    /// Стоимость открытых лотов, пересчитанная `rate(currency)` в одну валюту.
    pub fn total_cost_in<F>(&self, mut rate: F) -> Money
    where
        F: FnMut(&str) -> Decimal,
    {
        self.ledgers
            .values()
            .flat_map(ReportPositions::lots)
            .map(|lot| lot.cost() * rate(&lot.currency))
            .sum()
    }

    /// Переоценивает открытые лоты по котировкам снимка. Без котировки лоты
    /// оцениваются по цене покупки, но справочные данные облигации всё равно
    /// переносятся на лоты.
    pub fn mark_to_market(&mut self, snapshot: &AccountSnapshot) {
        for (uid, ledger) in &mut self.ledgers {
            let bond = snapshot.bonds.get(uid);
            let quote = snapshot.last_prices.get(uid);
            match (bond, quote) {
                (Some(bond), Some(&quote)) => ledger.mark_to_market(
                    bond,
                    quote,
                    snapshot.rate(uid),
                    snapshot.accrued_per_unit(uid),
                ),
                (Some(bond), None) => {
                    if !ledger.is_empty() {
                        warn!(instrument = %uid, "no quote, valued at cost");
                    }
                    ledger.apply_reference(bond, snapshot.rate(uid));
                    ledger.mark_at_cost();
                }
                (None, _) => {
                    if !ledger.is_empty() {
                        warn!(instrument = %uid, "no bond data, valued at cost");
                    }
                    ledger.mark_at_cost();
                }
            }
        }
    }
}
