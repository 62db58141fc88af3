#![allow(dead_code)]

use bond_fifo_report::{Operation, OperationType};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub const UID: &str = "bond-1";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn base(code: u32, on: NaiveDate) -> Operation {
    Operation {
        operation_type: OperationType::from(code),
        quantity_done: Decimal::ZERO,
        price: Decimal::ZERO,
        payment: Decimal::ZERO,
        commission: Decimal::ZERO,
        accrued_interest: Decimal::ZERO,
        date: on,
        currency: "rub".to_string(),
        instrument_uid: UID.to_string(),
        figi: "BBG000TEST01".to_string(),
        instrument_type: "bond".to_string(),
        name: "ОФЗ 26238".to_string(),
    }
}

pub fn buy(quantity: Decimal, price: Decimal, on: NaiveDate) -> Operation {
    Operation {
        quantity_done: quantity,
        price,
        ..base(15, on)
    }
}

pub fn sell(quantity: Decimal, price: Decimal, on: NaiveDate) -> Operation {
    Operation {
        quantity_done: quantity,
        price,
        ..base(22, on)
    }
}

pub fn cash(code: u32, payment: Decimal, on: NaiveDate) -> Operation {
    Operation {
        payment,
        ..base(code, on)
    }
}

pub fn with_code(code: u32, on: NaiveDate) -> Operation {
    base(code, on)
}
