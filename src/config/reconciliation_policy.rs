use serde::{Deserialize, Serialize};

/// 每公斤超重补缴费率（EUR/kg）
pub const SUPPLEMENT_RATE: f64 = 2.5;

/// 重量容差（kg，对称区间）
pub const WEIGHT_TOLERANCE: f64 = 0.2;

/// 补缴支付链接有效期（小时）
pub const PAYMENT_EXPIRY_HOURS: i64 = 24;

/// 申报/实测重量偏差告警阈值（百分比）
pub const WEIGHT_ANOMALY_PCT: f64 = 50.0;

/// 称重对账策略
///
/// 默认值即业务固定常量；现场可通过 config_kv 覆写（见 `config_keys`）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationPolicy {
    /// 每公斤补缴费率
    pub supplement_rate: f64,

    /// 容差（kg）
    pub weight_tolerance: f64,

    /// 支付链接有效期（小时）
    pub payment_expiry_hours: i64,

    /// 偏差告警阈值（%）
    pub anomaly_threshold_pct: f64,
}

impl Default for ReconciliationPolicy {
    fn default() -> Self {
        Self {
            supplement_rate: SUPPLEMENT_RATE,
            weight_tolerance: WEIGHT_TOLERANCE,
            payment_expiry_hours: PAYMENT_EXPIRY_HOURS,
            anomaly_threshold_pct: WEIGHT_ANOMALY_PCT,
        }
    }
}
