// ==========================================
// 称重对账测试
// ==========================================
// 测试范围:
// 1. 补缴 / 退款金额
// 2. 容差边界
// 3. 前置校验
// ==========================================

use parcel_logistics::engine::{compute_refund, compute_supplement, reconcile, validate_weights};
use parcel_logistics::{AdjustmentKind, WeightAdjustment};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_supplement_example() {
    let calc = compute_supplement(2.0, 2.3, 35.00).expect("应产生补缴");
    assert!(approx(calc.supplement_amount, 0.25));
    assert!(approx(calc.total_amount, 35.25));
}

#[test]
fn test_supplement_within_tolerance_example() {
    assert!(compute_supplement(2.0, 2.15, 35.00).is_none());
}

#[test]
fn test_refund_example() {
    let calc = compute_refund(2.0, 1.5, 35.00).expect("应产生退款");
    assert!(approx(calc.supplement_amount, -5.25));
    assert!(approx(calc.total_amount, 29.75));
    assert!(approx(calc.base_amount + calc.supplement_amount, calc.total_amount));
}

#[test]
fn test_validate_zero_declared() {
    let result = validate_weights(0.0, 5.0);
    assert!(!result.is_valid);
    assert!(result
        .errors
        .iter()
        .any(|e| e.to_lowercase().contains("declared weight must be greater than 0")));
}

#[test]
fn test_large_parcel_supplement() {
    // 25kg 申报, 实测 27.9kg: (2.9 - 0.2) × 2.5 = 6.75
    let calc = compute_supplement(25.0, 27.9, 120.0).unwrap();
    assert!(approx(calc.supplement_amount, 6.75), "got {}", calc.supplement_amount);
    assert!(approx(calc.total_amount, 126.75));
}

#[test]
fn test_reconcile_kind() {
    assert_eq!(reconcile(10.0, 10.1, 80.0).kind(), AdjustmentKind::None);
    assert_eq!(reconcile(10.0, 11.0, 80.0).kind(), AdjustmentKind::Supplement);
    assert_eq!(reconcile(10.0, 9.0, 80.0).kind(), AdjustmentKind::Refund);
}

#[test]
fn test_adjustment_serialization() {
    let json = serde_json::to_value(reconcile(2.0, 2.3, 35.0)).unwrap();
    assert_eq!(json["kind"], "supplement");
    assert_eq!(json["calculation"]["totalAmount"], 35.25);

    let none = serde_json::to_value(WeightAdjustment::None).unwrap();
    assert_eq!(none["kind"], "none");
}
