//! CLI: читает снимок счёта в JSON и печатает отчёт по облигациям.

use std::env;
use std::fs::File;

use bond_fifo_report::{
    AccountSnapshot, Config, GeneralBondReportPosition, ReportBucket, ReportBuilder,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn init_logging(level: Option<&str>) {
    let default_filter = format!("bond_fifo_report={}", level.unwrap_or("warn"));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn annualized(value: Decimal) -> String {
    if value == Decimal::MAX {
        "n/a".to_string()
    } else {
        value.to_string()
    }
}

fn print_bucket(title: &str, rows: &[GeneralBondReportPosition]) {
    if rows.is_empty() {
        return;
    }
    println!("{title}:");
    for p in rows {
        println!(
            "  {} ({}): {} шт. по {}, доля {}%, прибыль {} (налог {}), доходность {}% / {}% годовых",
            p.name,
            p.ticker,
            p.quantity,
            p.average_buy_price.round_dp(2),
            p.portfolio_weight,
            p.net_profit.round_dp(2),
            p.tax.round_dp(2),
            p.profit_percentage,
            annualized(p.annualized_return)
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        println!("Usage: bond-fifo-report <snapshot.json> [config.toml]");
        return Ok(());
    };
    let config = match args.next() {
        Some(config_path) => Config::from_path(config_path)?,
        None => Config::default(),
    };
    init_logging(config.log_level.as_deref());

    let snapshot = AccountSnapshot::from_reader(File::open(&path)?)?;
    let report = ReportBuilder::new(&snapshot).tax_config(config.tax).build()?;

    println!(
        "Счёт: {}, оценка на {}, вложено {}",
        report.account_id.0,
        report.as_of,
        report.total_cost.round_dp(2)
    );
    print_bucket("Рублёвые облигации", report.positions.bucket(ReportBucket::Rub));
    print_bucket("Замещающие облигации", report.positions.bucket(ReportBucket::Replaced));
    print_bucket("Валютные облигации", report.positions.bucket(ReportBucket::Currency));
    println!(
        "Структура: рублёвые {}%, замещающие {}%, валютные {}%",
        report.structure.rub_bonds, report.structure.replaced_bonds, report.structure.currency_bonds
    );
    println!(
        "Лоты: {} в рублях, {} в валюте",
        report.lots.rub.len(),
        report.lots.currency.len()
    );
    Ok(())
}
