// ==========================================
// 包裹物流后台 - 称重对账纯函数库
// ==========================================
// 职责: 依据申报重量与实测重量判定补缴 / 退款 / 无需处理
// 红线: 无状态、无副作用、无 I/O 操作
// 红线: 同一次称重最多产生一种结论 (补缴与退款互斥)
// ==========================================

use crate::config::reconciliation_policy::ReconciliationPolicy;
use crate::domain::payment::{PaymentCalculation, WeightAdjustment, WeightValidation};

/// 容差比较的浮点余量（kg）
///
/// 2.2 - 2.0 在二进制下略大于 0.2，需按“恰好在边界上”处理
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// 补缴金额保留两位小数（退款金额与总额不取整）
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

// ==========================================
// WeightReconciliationCore - 纯函数工具类
// ==========================================
pub struct WeightReconciliationCore;

impl WeightReconciliationCore {
    /// 计算超重补缴
    ///
    /// # 规则
    /// - difference = actual - declared
    /// - difference <= tolerance → None
    /// - supplement = round2((difference - tolerance) × rate)
    /// - total = base_cost + supplement
    ///
    /// 不做输入校验，调用方需先执行 `validate_weights`
    pub fn compute_supplement(
        declared_weight: f64,
        actual_weight: f64,
        base_cost: f64,
        policy: &ReconciliationPolicy,
    ) -> Option<PaymentCalculation> {
        let difference = actual_weight - declared_weight;
        if difference - policy.weight_tolerance <= WEIGHT_EPSILON {
            return None;
        }

        let supplement_weight = difference - policy.weight_tolerance;
        let supplement_amount = round_currency(supplement_weight * policy.supplement_rate);

        Some(PaymentCalculation {
            base_amount: base_cost,
            supplement_amount,
            total_amount: base_cost + supplement_amount,
            weight_difference: difference,
            reason: format!(
                "Measured weight exceeds declared weight by {:.2} kg (tolerance {:.2} kg)",
                difference, policy.weight_tolerance
            ),
        })
    }

    /// 计算少重退款
    ///
    /// # 规则
    /// - difference = declared - actual
    /// - difference <= tolerance → None
    /// - unit_cost = base_cost / declared
    /// - refund = (difference - tolerance) × unit_cost
    /// - supplement_amount = -refund, total = base_cost - refund
    /// - weight_difference = -difference
    ///
    /// declared <= 0 时无法推出单价，返回 None
    pub fn compute_refund(
        declared_weight: f64,
        actual_weight: f64,
        base_cost: f64,
        policy: &ReconciliationPolicy,
    ) -> Option<PaymentCalculation> {
        let difference = declared_weight - actual_weight;
        if difference - policy.weight_tolerance <= WEIGHT_EPSILON {
            return None;
        }
        if declared_weight <= 0.0 {
            return None;
        }

        let unit_cost = base_cost / declared_weight;
        let refund_weight = difference - policy.weight_tolerance;
        let refund_amount = refund_weight * unit_cost;

        Some(PaymentCalculation {
            base_amount: base_cost,
            supplement_amount: -refund_amount,
            total_amount: base_cost - refund_amount,
            weight_difference: -difference,
            reason: format!(
                "Measured weight is {:.2} kg below declared weight (tolerance {:.2} kg)",
                difference, policy.weight_tolerance
            ),
        })
    }

    /// 称重前置校验
    ///
    /// # 规则
    /// 1. actual <= 0 → 错误
    /// 2. declared <= 0 → 错误
    /// 3. |actual - declared| / declared × 100 > 阈值 → 偏差异常（软告警，同样计入 errors）
    pub fn validate_weights(
        declared_weight: f64,
        actual_weight: f64,
        policy: &ReconciliationPolicy,
    ) -> WeightValidation {
        let mut errors = Vec::new();

        // !(x > 0) 同时覆盖 NaN
        if !(actual_weight > 0.0) {
            errors.push("Actual weight must be greater than 0".to_string());
        }
        if !(declared_weight > 0.0) {
            errors.push("Declared weight must be greater than 0".to_string());
        } else {
            let percentage_delta =
                (actual_weight - declared_weight).abs() / declared_weight * 100.0;
            if percentage_delta > policy.anomaly_threshold_pct {
                errors.push(format!(
                    "Weight difference of {:.1}% is abnormally high",
                    percentage_delta
                ));
            }
        }

        WeightValidation::from_errors(errors)
    }

    /// 单一对账决策：补缴优先判定，其次退款，否则无需处理
    pub fn reconcile(
        declared_weight: f64,
        actual_weight: f64,
        base_cost: f64,
        policy: &ReconciliationPolicy,
    ) -> WeightAdjustment {
        if let Some(calc) =
            Self::compute_supplement(declared_weight, actual_weight, base_cost, policy)
        {
            return WeightAdjustment::Supplement(calc);
        }
        if let Some(calc) = Self::compute_refund(declared_weight, actual_weight, base_cost, policy)
        {
            return WeightAdjustment::Refund(calc);
        }
        WeightAdjustment::None
    }
}

// ==========================================
// 默认策略快捷函数
// ==========================================

pub fn compute_supplement(
    declared_weight: f64,
    actual_weight: f64,
    base_cost: f64,
) -> Option<PaymentCalculation> {
    WeightReconciliationCore::compute_supplement(
        declared_weight,
        actual_weight,
        base_cost,
        &ReconciliationPolicy::default(),
    )
}

pub fn compute_refund(
    declared_weight: f64,
    actual_weight: f64,
    base_cost: f64,
) -> Option<PaymentCalculation> {
    WeightReconciliationCore::compute_refund(
        declared_weight,
        actual_weight,
        base_cost,
        &ReconciliationPolicy::default(),
    )
}

pub fn validate_weights(declared_weight: f64, actual_weight: f64) -> WeightValidation {
    WeightReconciliationCore::validate_weights(
        declared_weight,
        actual_weight,
        &ReconciliationPolicy::default(),
    )
}

pub fn reconcile(declared_weight: f64, actual_weight: f64, base_cost: f64) -> WeightAdjustment {
    WeightReconciliationCore::reconcile(
        declared_weight,
        actual_weight,
        base_cost,
        &ReconciliationPolicy::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_supplement_over_tolerance() {
        let calc = compute_supplement(2.0, 2.3, 35.0).unwrap();
        assert_close(calc.supplement_amount, 0.25);
        assert_close(calc.total_amount, 35.25);
        assert_close(calc.base_amount, 35.0);
        assert_close(calc.weight_difference, 0.3);
        assert!(calc.reason.contains("0.30 kg"));
        assert!(calc.reason.contains("0.20 kg"));
    }

    #[test]
    fn test_supplement_within_tolerance() {
        assert!(compute_supplement(2.0, 2.15, 35.0).is_none());
        assert!(compute_supplement(2.0, 2.2, 35.0).is_none()); // 恰好在边界
        assert!(compute_supplement(2.0, 1.0, 35.0).is_none()); // 少重交由退款判定
    }

    #[test]
    fn test_supplement_tolerates_zero_declared() {
        let calc = compute_supplement(0.0, 1.2, 10.0).unwrap();
        assert_close(calc.supplement_amount, 2.5);
        assert_close(calc.total_amount, 12.5);
    }

    #[test]
    fn test_refund_under_tolerance() {
        let calc = compute_refund(2.0, 1.5, 35.0).unwrap();
        assert_close(calc.supplement_amount, -5.25);
        assert_close(calc.total_amount, 29.75);
        assert_close(calc.weight_difference, -0.5);
    }

    #[test]
    fn test_refund_amount_not_rounded() {
        // 单价 10/3 为无限小数
        let calc = compute_refund(3.0, 2.0, 10.0).unwrap();
        assert_close(calc.supplement_amount, -(0.8 * 10.0 / 3.0));
        assert_close(calc.total_amount, 10.0 - 0.8 * 10.0 / 3.0);
        assert!((calc.supplement_amount + 2.67).abs() > 1e-3);
    }

    #[test]
    fn test_supplement_total_keeps_base_precision() {
        let calc = compute_supplement(2.0, 2.3, 35.005).unwrap();
        assert_close(calc.supplement_amount, 0.25);
        assert_close(calc.total_amount, 35.255);
    }

    #[test]
    fn test_refund_within_tolerance() {
        assert!(compute_refund(2.0, 1.85, 35.0).is_none());
        assert!(compute_refund(2.0, 1.8, 35.0).is_none());
        assert!(compute_refund(2.0, 3.0, 35.0).is_none());
    }

    #[test]
    fn test_refund_zero_declared_weight() {
        assert!(compute_refund(0.0, 0.0, 35.0).is_none());
    }

    #[test]
    fn test_supplement_and_refund_are_exclusive() {
        let declared_values = [0.5, 1.0, 2.0, 5.0, 12.5];
        let deltas = [-1.0, -0.5, -0.21, -0.2, -0.1, 0.0, 0.1, 0.2, 0.21, 0.5, 1.0];

        for declared in declared_values {
            for delta in deltas {
                let actual: f64 = declared + delta;
                if actual < 0.0 {
                    continue;
                }
                let supplement = compute_supplement(declared, actual, 20.0);
                let refund = compute_refund(declared, actual, 20.0);

                if delta.abs() > 0.2 {
                    assert!(
                        supplement.is_some() ^ refund.is_some(),
                        "declared={} actual={}",
                        declared,
                        actual
                    );
                } else {
                    assert!(supplement.is_none(), "declared={} actual={}", declared, actual);
                    assert!(refund.is_none(), "declared={} actual={}", declared, actual);
                }
            }
        }
    }

    #[test]
    fn test_reconcile_picks_single_outcome() {
        assert!(matches!(reconcile(2.0, 2.3, 35.0), WeightAdjustment::Supplement(_)));
        assert!(matches!(reconcile(2.0, 1.5, 35.0), WeightAdjustment::Refund(_)));
        assert_eq!(reconcile(2.0, 2.1, 35.0), WeightAdjustment::None);
    }

    #[test]
    fn test_reconcile_with_custom_policy() {
        let policy = ReconciliationPolicy {
            supplement_rate: 4.0,
            weight_tolerance: 0.5,
            ..ReconciliationPolicy::default()
        };

        assert_eq!(
            WeightReconciliationCore::reconcile(2.0, 2.3, 35.0, &policy),
            WeightAdjustment::None
        );

        let adjustment = WeightReconciliationCore::reconcile(2.0, 3.0, 35.0, &policy);
        let calc = adjustment.calculation().unwrap();
        assert_close(calc.supplement_amount, 2.0);
    }

    #[test]
    fn test_validate_weights() {
        let result = validate_weights(0.0, 5.0);
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.to_lowercase().contains("declared weight must be greater than 0")));

        let result = validate_weights(2.0, 0.0);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2); // 实测为 0 且偏差 100%
        assert!(result.errors[0].contains("Actual weight"));

        let result = validate_weights(2.0, 2.3);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_validate_weights_anomaly() {
        let result = validate_weights(2.0, 3.5);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("75.0%"));

        // 恰好 50% 不告警
        assert!(validate_weights(2.0, 3.0).is_valid);
    }

    #[test]
    fn test_validate_weights_rejects_nan() {
        let result = validate_weights(f64::NAN, 2.0);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }
}
