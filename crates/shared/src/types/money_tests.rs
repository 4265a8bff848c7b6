use super::*;
use rstest::rstest;
use rust_decimal_macros::dec;

#[test]
fn test_money_decimal_view() {
    assert_eq!(Money::from_minor(12_345).as_decimal(), dec!(123.45));
    assert_eq!(Money::from_minor(-5).as_decimal(), dec!(-0.05));
}

#[rstest]
#[case(0, "0.00")]
#[case(500, "5.00")]
#[case(123_456, "1234.56")]
#[case(-2_550, "-25.50")]
fn test_money_display(#[case] minor: i64, #[case] expected: &str) {
    assert_eq!(Money::from_minor(minor).to_string(), expected);
}

#[test]
fn test_money_sum() {
    let total: Money = [100, 250, -50].into_iter().map(Money::from).sum();
    assert_eq!(total.minor(), 300);
    assert!(!total.is_negative());
    assert!(Money::ZERO.is_zero());
}
