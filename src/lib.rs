#![warn(missing_docs)]
//! Библиотека FIFO-учёта налоговых лотов по облигациям и построения отчётов
//! о прибыли, налоге и доходности по брокерскому счёту.

mod aggregator;
mod calculator;
mod config;
mod dispatcher;
mod error;
mod ledger;
mod position;
mod report;
mod report_set;
mod snapshot;
mod types;
mod utils;

pub use crate::aggregator::{
    BondReport, BondReportSet, GeneralBondReport, GeneralBondReportPosition, PortfolioStructure,
    ReportBucket,
};
pub use crate::calculator::{
    LotResult, annualized_return, calculate_nominal, calculate_sell_price, capital_gains_tax,
    net_profit, profit_before_tax, profit_percentage,
};
pub use crate::config::{Config, DEFAULT_EXEMPTION_YEARS, DEFAULT_TAX_RATE, PriceOverride, TaxConfig};
pub use crate::dispatcher::OperationClass;
pub use crate::error::ReportError;
pub use crate::ledger::{CashField, ReportPositions, UnmatchedSale};
pub use crate::position::PositionByFIFO;
pub use crate::report::{AccountReport, ReportBuilder};
pub use crate::report_set::ReportSet;
pub use crate::snapshot::AccountSnapshot;
pub use crate::types::*;
