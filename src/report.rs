//! Построение итогового отчёта по счёту.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::aggregator::{
    BondReport, BondReportSet, GeneralBondReport, GeneralBondReportPosition, PortfolioStructure,
};
use crate::config::TaxConfig;
use crate::error::ReportError;
use crate::report_set::ReportSet;
use crate::snapshot::AccountSnapshot;
use crate::types::{AccountId, Money};

/// Набор флагов построения отчёта (внутренний тип).
#[derive(Debug, Clone)]
pub(crate) struct BuildOptions {
    pub tax: TaxConfig,
    pub as_of: NaiveDate,
    pub include_closed: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            tax: TaxConfig::default(),
            as_of: Local::now().date_naive(),
            include_closed: true,
        }
    }
}

/// Итоговая модель отчёта по одному счёту.
#[derive(Debug, Clone, Serialize)]
pub struct AccountReport {
    /// Идентификатор счёта.
    pub account_id: AccountId,
    /// Дата оценки открытых лотов.
    pub as_of: NaiveDate,
    /// Стоимость открытых лотов по цене покупки в рублях. Валютные лоты
    /// пересчитаны по `fx_rates` снимка, без курса берутся как есть.
    pub total_cost: Money,
    /// Строки по лотам.
    pub lots: BondReportSet,
    /// Сводные позиции по инструментам.
    pub positions: GeneralBondReport,
    /// Структура портфеля.
    pub structure: PortfolioStructure,
}

impl AccountReport {
    /// Строит отчёт с настройками по умолчанию на сегодня.
    #[inline]
    pub fn build(snapshot: &AccountSnapshot) -> Result<Self, ReportError> {
        Self::build_with_options(snapshot, &BuildOptions::default())
    }

    pub(crate) fn build_with_options(
        snapshot: &AccountSnapshot,
        options: &BuildOptions,
    ) -> Result<Self, ReportError> {
        let mut set = ReportSet::from_operations(
            snapshot.account_id.clone(),
            &snapshot.operations,
            &options.tax,
        )?;
        set.mark_to_market(snapshot);
        let total_cost =
            set.total_cost_in(|currency| snapshot.fx_rate(currency).unwrap_or(Decimal::ONE));

        let mut lots = BondReportSet::default();
        let mut positions = GeneralBondReport::default();

        for (uid, ledger) in &set.ledgers {
            let bond = snapshot.bonds.get(uid);
            let market = snapshot.market.get(uid);

            for lot in ledger.lots() {
                lots.push(BondReport::from_lot(lot, bond, market, options.as_of, &options.tax)?);
            }
            if options.include_closed {
                for lot in ledger.closed() {
                    lots.push(BondReport::from_lot(
                        lot,
                        bond,
                        market,
                        options.as_of,
                        &options.tax,
                    )?);
                }
            }

            if !ledger.is_empty() {
                positions.push(GeneralBondReportPosition::aggregate(
                    ledger.lots(),
                    bond,
                    market,
                    total_cost,
                    ledger
                        .lots()
                        .next()
                        .map_or(Decimal::ONE, |lot| fx_rate(snapshot, &lot.currency)),
                    options.as_of,
                    &options.tax,
                )?);
            }
        }

        let structure = positions.structure();
        info!(
            account = %snapshot.account_id.0,
            lots = lots.len(),
            total_cost = %total_cost,
            "account report built"
        );

        Ok(Self {
            account_id: snapshot.account_id.clone(),
            as_of: options.as_of,
            total_cost,
            lots,
            positions,
            structure,
        })
    }
}

fn fx_rate(snapshot: &AccountSnapshot, currency: &str) -> Decimal {
    snapshot.fx_rate(currency).unwrap_or_else(|| {
        warn!(currency, "no exchange rate, cost taken as is");
        Decimal::ONE
    })
}

/// Builder для построения `AccountReport` с выбором настроек.
pub struct ReportBuilder<'a> {
    snapshot: &'a AccountSnapshot,
    options: BuildOptions,
}

impl<'a> ReportBuilder<'a> {
    /// Создаёт builder для снимка счёта.
    ///
    /// # Пример
    ///
    /// ```
    /// # use bond_fifo_report::{AccountSnapshot, ReportBuilder, TaxConfig};
    /// # let snapshot = AccountSnapshot::default();
    /// let report = ReportBuilder::new(&snapshot)
    ///     .tax_config(TaxConfig::default())
    ///     .include_closed(false)
    ///     .build()
    ///     .unwrap();
    /// assert!(report.lots.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new(snapshot: &'a AccountSnapshot) -> Self {
        Self {
            snapshot,
            options: BuildOptions::default(),
        }
    }

    /// Задаёт налоговые правила.
    #[inline]
    #[must_use]
    pub fn tax_config(mut self, tax: TaxConfig) -> Self {
        self.options.tax = tax;
        self
    }

    /// Задаёт дату, на которую оцениваются открытые лоты.
    #[inline]
    #[must_use]
    pub const fn as_of(mut self, date: NaiveDate) -> Self {
        self.options.as_of = date;
        self
    }

    /// Включает или отключает строки по закрытым лотам.
    #[inline]
    #[must_use]
    pub const fn include_closed(mut self, enabled: bool) -> Self {
        self.options.include_closed = enabled;
        self
    }

    /// Строит отчёт с текущими настройками.
    #[inline]
    pub fn build(self) -> Result<AccountReport, ReportError> {
        AccountReport::build_with_options(self.snapshot, &self.options)
    }
}
