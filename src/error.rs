//! Ошибки учёта лотов и построения отчётов.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Ошибка применения операции или расчёта отчёта.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Деление на нулевое количество или нулевую стоимость.
    #[error("Zero quantity in {context}")]
    ZeroQuantity {
        /// Какой расчёт не удался.
        context: &'static str,
    },
    /// Дата продажи раньше даты покупки.
    #[error("Sell date {sell} precedes buy date {buy}")]
    InvalidDate {
        /// Дата покупки.
        buy: NaiveDate,
        /// Дата продажи.
        sell: NaiveDate,
    },
    /// Неизвестный код типа операции.
    #[error("Unknown operation type {code}")]
    UnknownOperation {
        /// Исходный код брокера.
        code: u32,
    },
    /// Продажа больше, чем открыто в лотах.
    #[error("Cannot sell {requested} of '{instrument}': only {available} open")]
    InsufficientQuantity {
        /// Идентификатор инструмента.
        instrument: String,
        /// Запрошенное к продаже количество.
        requested: Decimal,
        /// Открытое количество.
        available: Decimal,
    },
    /// Результат не представим в `Decimal`.
    #[error("Arithmetic overflow in {context}")]
    Arithmetic {
        /// Какой расчёт не удался.
        context: &'static str,
    },
    /// Ошибка ввода-вывода при чтении исходного файла.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Ошибка разбора JSON-снимка счёта.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Ошибка разбора файла конфигурации.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}
