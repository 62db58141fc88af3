//! Снимок входных данных счёта от внешних источников.

use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::types::{AccountId, BondIdentIdentifiers, MarketData, Money, Operation, RUB, Rate};

/// Всё, что нужно для отчёта по одному счёту: история операций и
/// справочные данные по инструментам. Ключ словарей: UID инструмента.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Идентификатор счёта.
    pub account_id: AccountId,
    /// История операций по всем инструментам.
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// Справочные данные облигаций.
    #[serde(default)]
    pub bonds: BTreeMap<String, BondIdentIdentifiers>,
    /// Последние котировки, % от номинала.
    #[serde(default)]
    pub last_prices: BTreeMap<String, Decimal>,
    /// Курсы для замещающих облигаций.
    #[serde(default)]
    pub rates: BTreeMap<String, Rate>,
    /// Рыночные данные.
    #[serde(default)]
    pub market: BTreeMap<String, MarketData>,
    /// Текущий НКД на одну бумагу.
    #[serde(default)]
    pub accrued_interest: BTreeMap<String, Money>,
    /// Курсы валют к рублю. Ключ: код валюты в нижнем регистре.
    #[serde(default)]
    pub fx_rates: BTreeMap<String, Decimal>,
}

impl AccountSnapshot {
    /// Читает снимок в формате JSON из произвольного `Read`.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ReportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Разбирает снимок из JSON-строки.
    pub fn from_json_str(s: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Курс для инструмента; без ключа `Rate::Absent`.
    #[must_use]
    pub fn rate(&self, instrument_uid: &str) -> Rate {
        self.rates.get(instrument_uid).copied().unwrap_or_default()
    }

    /// Рублей за единицу валюты. Для рубля всегда единица, для валюты без
    /// курса `None`.
    #[must_use]
    pub fn fx_rate(&self, currency: &str) -> Option<Decimal> {
        if currency.is_empty() || currency.eq_ignore_ascii_case(RUB) {
            return Some(Decimal::ONE);
        }
        self.fx_rates.get(&currency.to_ascii_lowercase()).copied()
    }

    /// Текущий НКД на бумагу, ноль если неизвестен.
    #[must_use]
    pub fn accrued_per_unit(&self, instrument_uid: &str) -> Money {
        self.accrued_interest
            .get(instrument_uid)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
