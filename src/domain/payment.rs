// ==========================================
// 包裹物流后台 - 称重对账结果模型
// ==========================================
// 职责: 对账计算结果 (瞬时值, 核心层不持久化)
// ==========================================

use crate::domain::types::AdjustmentKind;
use serde::{Deserialize, Serialize};

// ==========================================
// PaymentCalculation - 补缴/退款计算结果
// ==========================================
// supplement_amount: 正数 = 补缴, 负数 = 退款
// total_amount = base_amount + supplement_amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCalculation {
    pub base_amount: f64,
    pub supplement_amount: f64,
    pub total_amount: f64,
    pub weight_difference: f64,
    pub reason: String,
}

// ==========================================
// WeightValidation - 称重前置校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl WeightValidation {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

// ==========================================
// WeightAdjustment - 单次称重的唯一对账结论
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "calculation", rename_all = "snake_case")]
pub enum WeightAdjustment {
    None,
    Supplement(PaymentCalculation),
    Refund(PaymentCalculation),
}

impl WeightAdjustment {
    pub fn kind(&self) -> AdjustmentKind {
        match self {
            WeightAdjustment::None => AdjustmentKind::None,
            WeightAdjustment::Supplement(_) => AdjustmentKind::Supplement,
            WeightAdjustment::Refund(_) => AdjustmentKind::Refund,
        }
    }

    pub fn calculation(&self) -> Option<&PaymentCalculation> {
        match self {
            WeightAdjustment::None => None,
            WeightAdjustment::Supplement(calc) | WeightAdjustment::Refund(calc) => Some(calc),
        }
    }

    /// 是否需要财务处理（补缴或退款）
    pub fn requires_action(&self) -> bool {
        !matches!(self, WeightAdjustment::None)
    }
}
