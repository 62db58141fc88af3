mod common;

use bond_fifo_report::{CashField, ReportError, ReportPositions, TaxConfig};
use common::{UID, buy, cash, date, sell};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn open_sum(ledger: &ReportPositions) -> Decimal {
    ledger.lots().map(|lot| lot.quantity).sum()
}

fn quantities(ledger: &ReportPositions) -> Vec<Decimal> {
    ledger.lots().map(|lot| lot.quantity).collect()
}

#[test]
fn full_close_removes_lot() {
    let config = TaxConfig::default();
    let mut ledger = ReportPositions::new(UID);
    ledger
        .apply(&buy(dec!(100), dec!(1000), date(2023, 1, 10)), &config)
        .unwrap();
    ledger
        .apply(&sell(dec!(100), dec!(1010), date(2023, 5, 10)), &config)
        .unwrap();

    assert!(ledger.is_empty());
    assert_eq!(ledger.quantity, Decimal::ZERO);
    assert_eq!(ledger.closed().len(), 1);
    assert!(ledger.closed()[0].is_closed());
    assert_eq!(ledger.closed()[0].sell_date, Some(date(2023, 5, 10)));
    assert_eq!(ledger.closed()[0].sell_price, dec!(1010));
}

#[test]
fn partial_close_scales_lot_fields() {
    let config = TaxConfig::default();
    let mut ledger = ReportPositions::new(UID);
    let mut purchase = buy(dec!(100), dec!(1000), date(2023, 1, 10));
    purchase.commission = dec!(50);
    ledger.apply(&purchase, &config).unwrap();
    ledger.distribute(dec!(200), CashField::PaidTax).unwrap();

    ledger
        .apply(&sell(dec!(30), dec!(1020), date(2023, 3, 1)), &config)
        .unwrap();

    let lot = ledger.lots().next().unwrap();
    assert_eq!(lot.quantity, dec!(70));
    assert_eq!(lot.total_comission, dec!(35.0));
    assert_eq!(lot.paid_tax, dec!(140.0));
    assert_eq!(ledger.quantity, dec!(70));

    let slice = &ledger.closed()[0];
    assert_eq!(slice.quantity, dec!(30));
    assert_eq!(slice.total_comission, dec!(15));
    assert_eq!(slice.paid_tax, dec!(60));
}

#[test]
fn sale_spanning_lots_consumes_oldest_first() {
    let config = TaxConfig::default();
    let mut ledger = ReportPositions::new(UID);
    ledger
        .apply(&buy(dec!(50), dec!(990), date(2023, 1, 10)), &config)
        .unwrap();
    ledger
        .apply(&buy(dec!(50), dec!(1000), date(2023, 2, 10)), &config)
        .unwrap();
    ledger
        .apply(&sell(dec!(70), dec!(1005), date(2023, 3, 10)), &config)
        .unwrap();

    let lots: Vec<_> = ledger.lots().collect();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].buy_date, date(2023, 2, 10));
    assert_eq!(lots[0].quantity, dec!(30));
    assert_eq!(ledger.quantity, dec!(30));

    let closed: Vec<_> = ledger.closed().iter().map(|l| (l.buy_date, l.quantity)).collect();
    assert_eq!(
        closed,
        vec![(date(2023, 1, 10), dec!(50)), (date(2023, 2, 10), dec!(20))]
    );
}

#[test]
fn sale_accrued_interest_and_commission_split_across_lots() {
    let config = TaxConfig::default();
    let mut ledger = ReportPositions::new(UID);
    ledger
        .apply(&buy(dec!(40), dec!(990), date(2023, 1, 10)), &config)
        .unwrap();
    ledger
        .apply(&buy(dec!(60), dec!(1000), date(2023, 2, 10)), &config)
        .unwrap();
    let mut sale = sell(dec!(80), dec!(1005), date(2023, 3, 10));
    sale.accrued_interest = dec!(160);
    sale.commission = dec!(-8);
    ledger.apply(&sale, &config).unwrap();

    let closed = ledger.closed();
    assert_eq!(closed[0].sell_accrued_interest, dec!(80));
    assert_eq!(closed[0].total_comission, dec!(-4));
    assert_eq!(closed[1].quantity, dec!(40));
    assert_eq!(closed[1].sell_accrued_interest, dec!(80));
    assert_eq!(closed[1].total_comission, dec!(-4));
    assert_eq!(quantities(&ledger), vec![dec!(20)]);
}

#[test]
fn coupon_distributed_by_quantity_share() {
    let config = TaxConfig::default();
    let mut ledger = ReportPositions::new(UID);
    ledger
        .apply(&buy(dec!(30), dec!(1000), date(2023, 1, 10)), &config)
        .unwrap();
    ledger
        .apply(&buy(dec!(70), dec!(1000), date(2023, 2, 10)), &config)
        .unwrap();
    ledger
        .apply(&cash(23, dec!(500), date(2023, 4, 1)), &config)
        .unwrap();

    let coupons: Vec<_> = ledger.lots().map(|lot| lot.total_coupon).collect();
    assert_eq!(coupons, vec![dec!(150), dec!(350)]);
    assert_eq!(coupons.iter().copied().sum::<Decimal>(), dec!(500));
}

#[test]
fn zero_payment_leaves_lots_unchanged() {
    let config = TaxConfig::default();
    let mut ledger = ReportPositions::new(UID);
    ledger
        .apply(&buy(dec!(10), dec!(1000), date(2023, 1, 10)), &config)
        .unwrap();
    ledger
        .apply(&buy(dec!(15), dec!(990), date(2023, 2, 10)), &config)
        .unwrap();
    let before: Vec<_> = ledger.lots().cloned().collect();

    for field in [
        CashField::Coupon,
        CashField::Dividend,
        CashField::PaidTax,
        CashField::Comission,
        CashField::PartialEarlyRepayment,
    ] {
        ledger.distribute(Decimal::ZERO, field).unwrap();
    }

    let after: Vec<_> = ledger.lots().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn distribution_without_open_lots_fails() {
    let mut ledger = ReportPositions::new(UID);
    let err = ledger.distribute(dec!(100), CashField::Coupon).unwrap_err();
    assert!(matches!(err, ReportError::ZeroQuantity { .. }));
}

#[test]
fn oversized_sale_is_rejected_without_changes() {
    let config = TaxConfig::default();
    let mut ledger = ReportPositions::new(UID);
    ledger
        .apply(&buy(dec!(10), dec!(1000), date(2023, 1, 10)), &config)
        .unwrap();

    let err = ledger
        .apply(&sell(dec!(11), dec!(1000), date(2023, 2, 10)), &config)
        .unwrap_err();

    match err {
        ReportError::InsufficientQuantity {
            requested,
            available,
            ..
        } => {
            assert_eq!(requested, dec!(11));
            assert_eq!(available, dec!(10));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(quantities(&ledger), vec![dec!(10)]);
    assert!(ledger.closed().is_empty());
}

#[test]
fn quantity_matches_open_lots_after_every_operation() {
    let config = TaxConfig::default();
    let history = [
        buy(dec!(20), dec!(980), date(2022, 1, 10)),
        buy(dec!(35), dec!(990), date(2022, 3, 10)),
        cash(23, dec!(412.5), date(2022, 4, 1)),
        sell(dec!(25), dec!(1001), date(2022, 5, 10)),
        buy(dec!(5), dec!(1003), date(2022, 6, 10)),
        cash(2, dec!(-39), date(2022, 7, 1)),
        sell(dec!(30), dec!(1004), date(2022, 8, 10)),
        sell(dec!(5), dec!(1006), date(2022, 9, 10)),
    ];

    let mut ledger = ReportPositions::new(UID);
    for operation in &history {
        ledger.apply(operation, &config).unwrap();
        assert_eq!(ledger.quantity, open_sum(&ledger));
        assert!(ledger.lots().all(|lot| lot.quantity > Decimal::ZERO));
    }
    assert!(ledger.is_empty());
}

#[test]
fn untouched_lots_keep_purchase_order() {
    let config = TaxConfig::default();
    let mut ledger = ReportPositions::new(UID);
    for (i, qty) in [dec!(10), dec!(20), dec!(30), dec!(40)].into_iter().enumerate() {
        let day = u32::try_from(i).unwrap() + 1;
        ledger
            .apply(&buy(qty, dec!(1000), date(2023, 1, day)), &config)
            .unwrap();
    }
    ledger
        .apply(&sell(dec!(15), dec!(1000), date(2023, 2, 1)), &config)
        .unwrap();

    let dates: Vec<_> = ledger.lots().map(|lot| lot.buy_date).collect();
    assert_eq!(dates, vec![date(2023, 1, 2), date(2023, 1, 3), date(2023, 1, 4)]);
    assert_eq!(quantities(&ledger), vec![dec!(15), dec!(30), dec!(40)]);
}

#[test]
fn partial_close_conserves_accumulated_cash() {
    let config = TaxConfig::default();
    let mut ledger = ReportPositions::new(UID);
    let mut purchase = buy(dec!(50), dec!(1000), date(2023, 1, 10));
    purchase.accrued_interest = dec!(25);
    ledger.apply(&purchase, &config).unwrap();
    ledger
        .apply(&cash(23, dec!(400), date(2023, 2, 1)), &config)
        .unwrap();
    ledger
        .apply(&cash(10, dec!(1000), date(2023, 3, 1)), &config)
        .unwrap();
    ledger
        .apply(&sell(dec!(10), dec!(1000), date(2023, 4, 1)), &config)
        .unwrap();

    let open = ledger.lots().next().unwrap();
    let slice = &ledger.closed()[0];
    assert_eq!(open.total_coupon + slice.total_coupon, dec!(400));
    assert_eq!(open.partial_early_repayment, dec!(800));
    assert_eq!(slice.partial_early_repayment, dec!(200));
    assert_eq!(open.buy_accrued_interest, dec!(20));
    assert_eq!(slice.buy_accrued_interest, dec!(5));
}
