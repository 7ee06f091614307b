// ==========================================
// 包裹物流后台 - 称重 API
// ==========================================
// 职责: 称重录入 → 前置校验 → 对账 → 状态流转 → 记录
// 红线: 实测重量只写一次, 每次称重追加一条记录
// 红线: 补缴与退款互斥, 由单一对账决策给出
// ==========================================

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ReconciliationConfigReader;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::parcel::{Parcel, WeighingRecord};
use crate::domain::payment::WeightAdjustment;
use crate::domain::types::LogisticStatus;
use crate::engine::{LogisticStatusMachine, WeightReconciliationCore};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::parcel_repo::ParcelRepository;
use crate::repository::weighing_record_repo::WeighingRecordRepository;

/// 称重结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeighingOutcome {
    pub parcel: Parcel,
    pub record: WeighingRecord,
    pub adjustment: WeightAdjustment,
}

pub struct WeighingApi {
    parcel_repo: Arc<ParcelRepository>,
    weighing_record_repo: Arc<WeighingRecordRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    config: Arc<dyn ReconciliationConfigReader>,
}

impl WeighingApi {
    pub fn new(
        parcel_repo: Arc<ParcelRepository>,
        weighing_record_repo: Arc<WeighingRecordRepository>,
        action_log_repo: Arc<ActionLogRepository>,
        config: Arc<dyn ReconciliationConfigReader>,
    ) -> Self {
        Self {
            parcel_repo,
            weighing_record_repo,
            action_log_repo,
            config,
        }
    }

    /// 录入称重
    ///
    /// # 规则
    /// 1. 包裹尚未称重且处于 received
    /// 2. 称重前置校验必须全部通过（含偏差告警）
    /// 3. 无需调整 → weighed；补缴或退款 → weight_issue（须经状态机允许）
    /// 4. 补缴记录带支付有效期
    /// 5. 状态、实测重量、称重记录原子写入
    pub async fn record_weighing(
        &self,
        parcel_id: &str,
        actual_weight: f64,
        operator: &str,
    ) -> ApiResult<WeighingOutcome> {
        if operator.trim().is_empty() {
            return Err(ApiError::InvalidInput("操作人不能为空".to_string()));
        }

        let parcel = self
            .parcel_repo
            .find_by_id(parcel_id)?
            .ok_or_else(|| ApiError::NotFound(format!("包裹(id={})不存在", parcel_id)))?;

        if parcel.is_weighed() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "包裹{}已称重，不可重复录入",
                parcel.tracking_id
            )));
        }

        // 只有已收货的包裹可以称重
        let from = parcel.logistic_status;
        if from != LogisticStatus::Received {
            return Err(ApiError::InvalidStateTransition {
                from: from.to_string(),
                to: LogisticStatus::Weighed.to_string(),
            });
        }

        let policy = self
            .config
            .get_reconciliation_policy()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let validation = WeightReconciliationCore::validate_weights(
            parcel.weight_declared,
            actual_weight,
            &policy,
        );
        if !validation.is_valid {
            warn!(parcel_id, actual_weight, errors = ?validation.errors, "称重校验未通过");
            return Err(ApiError::WeightValidationFailed {
                errors: validation.errors,
            });
        }

        let adjustment = WeightReconciliationCore::reconcile(
            parcel.weight_declared,
            actual_weight,
            parcel.cost,
            &policy,
        );

        let to = if adjustment.requires_action() {
            LogisticStatus::WeightIssue
        } else {
            LogisticStatus::Weighed
        };
        if !LogisticStatusMachine::is_transition_allowed(from, to) {
            return Err(ApiError::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let weighed_at = Utc::now();
        let record = WeighingRecord {
            record_id: uuid::Uuid::new_v4().to_string(),
            parcel_id: parcel.id.clone(),
            declared_weight: parcel.weight_declared,
            actual_weight,
            adjustment_kind: adjustment.kind(),
            supplement_amount: adjustment
                .calculation()
                .map(|c| c.supplement_amount)
                .unwrap_or(0.0),
            total_amount: adjustment
                .calculation()
                .map(|c| c.total_amount)
                .unwrap_or(parcel.cost),
            weight_difference: adjustment
                .calculation()
                .map(|c| c.weight_difference)
                .unwrap_or(actual_weight - parcel.weight_declared),
            reason: adjustment.calculation().map(|c| c.reason.clone()),
            payment_expires_at: match adjustment {
                WeightAdjustment::Supplement(_) => {
                    Some(weighed_at + Duration::hours(policy.payment_expiry_hours))
                }
                _ => None,
            },
            weighed_at,
            weighed_by: operator.to_string(),
        };

        // 状态 / 实测重量 / 称重记录同一事务提交
        self.weighing_record_repo.commit_weighing(
            &record,
            from,
            to,
            LogisticStatusMachine::main_status(to),
        )?;

        info!(
            parcel_id = %parcel.id,
            actual_weight,
            adjustment = record.adjustment_kind.to_db_str(),
            supplement_amount = record.supplement_amount,
            "称重已录入"
        );

        let log = ActionLog {
            action_id: uuid::Uuid::new_v4().to_string(),
            parcel_id: Some(parcel.id.clone()),
            action_type: ActionType::Weighing.to_db_str().to_string(),
            action_ts: weighed_at.naive_utc(),
            actor: operator.to_string(),
            payload_json: Some(serde_json::json!({
                "record_id": record.record_id,
                "declared_weight": record.declared_weight,
                "actual_weight": actual_weight,
                "adjustment": record.adjustment_kind,
                "supplement_amount": record.supplement_amount,
                "from": from,
                "to": to,
            })),
            detail: record.reason.clone(),
        };
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, "记录操作日志失败");
        }

        let parcel = self
            .parcel_repo
            .find_by_id(&parcel.id)?
            .ok_or_else(|| ApiError::InternalError(format!("包裹{}写入后丢失", parcel.id)))?;

        Ok(WeighingOutcome {
            parcel,
            record,
            adjustment,
        })
    }

    /// 查询包裹称重历史
    pub fn list_weighings(&self, parcel_id: &str) -> ApiResult<Vec<WeighingRecord>> {
        Ok(self.weighing_record_repo.find_by_parcel(parcel_id)?)
    }
}
