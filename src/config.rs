//! Настройки налогового учёта и загрузка файла конфигурации.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::types::Money;

/// Ставка НДФЛ по умолчанию.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

/// Срок владения, после которого прибыль не облагается, лет.
pub const DEFAULT_EXEMPTION_YEARS: u32 = 3;

/// Фиксированная цена покупки для перевода конкретной бумаги из другого
/// депозитария.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOverride {
    /// UID инструмента.
    pub instrument_uid: String,
    /// Цена, записываемая в лот вместо цены операции.
    pub price: Money,
}

/// Налоговые правила, передаваемые в калькулятор.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Ставка налога на прибыль (0.13 = 13%).
    pub rate: Decimal,
    /// Срок владения для освобождения от налога, лет.
    pub exemption_years: u32,
    /// Переопределения цены покупки для переводов.
    pub price_overrides: Vec<PriceOverride>,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_TAX_RATE,
            exemption_years: DEFAULT_EXEMPTION_YEARS,
            price_overrides: Vec::new(),
        }
    }
}

impl TaxConfig {
    /// Цена, которую следует записать вместо указанной в переводе.
    #[must_use]
    pub fn override_price(&self, instrument_uid: &str) -> Option<Money> {
        self.price_overrides
            .iter()
            .find(|o| o.instrument_uid == instrument_uid)
            .map(|o| o.price)
    }
}

/// Содержимое файла конфигурации.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Налоговые правила.
    pub tax: TaxConfig,
    /// Уровень логирования, если не задан `RUST_LOG`.
    pub log_level: Option<String>,
}

impl Config {
    /// Разбирает конфигурацию из TOML-строки.
    pub fn from_toml_str(s: &str) -> Result<Self, ReportError> {
        Ok(toml::from_str(s)?)
    }

    /// Читает конфигурацию из файла.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
