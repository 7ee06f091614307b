// ==========================================
// 包裹物流后台 - 包裹 API
// ==========================================
// 职责: 包裹创建、查询、物流状态变更、界面列表
// 红线: 物流状态只能经状态机校验后变更, 主状态随之派生
// ==========================================

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::parcel::Parcel;
use crate::domain::types::{InterfaceKind, LogisticStatus, MainStatus};
use crate::engine::LogisticStatusMachine;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::parcel_repo::ParcelRepository;

// ==========================================
// StatusView - 状态展示信息
// ==========================================
/// 用于前端展示的状态信息（文案 / 颜色 / 可选后继）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusView {
    pub logistic_status: LogisticStatus,
    pub main_status: MainStatus,
    pub label: String,
    pub color_class: String,
    pub allowed_next: Vec<LogisticStatus>,
}

impl StatusView {
    pub fn of(status: LogisticStatus) -> Self {
        Self {
            logistic_status: status,
            main_status: LogisticStatusMachine::main_status(status),
            label: LogisticStatusMachine::label(status).to_string(),
            color_class: LogisticStatusMachine::color_class(status).to_string(),
            allowed_next: LogisticStatusMachine::allowed_transitions(status).to_vec(),
        }
    }
}

// ==========================================
// ParcelApi - 包裹 API
// ==========================================
pub struct ParcelApi {
    parcel_repo: Arc<ParcelRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl ParcelApi {
    pub fn new(
        parcel_repo: Arc<ParcelRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            parcel_repo,
            action_log_repo,
        }
    }

    /// 创建包裹（初始状态 pending_reception）
    ///
    /// # 校验
    /// - tracking_id 非空且唯一
    /// - weight_declared / cost 为非负有限数
    pub fn create_parcel(
        &self,
        tracking_id: &str,
        weight_declared: f64,
        cost: f64,
        operator: &str,
    ) -> ApiResult<Parcel> {
        let tracking_id = tracking_id.trim();
        if tracking_id.is_empty() {
            return Err(ApiError::InvalidInput("追踪码不能为空".to_string()));
        }
        if !weight_declared.is_finite() || weight_declared < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "申报重量非法: {}",
                weight_declared
            )));
        }
        if !cost.is_finite() || cost < 0.0 {
            return Err(ApiError::InvalidInput(format!("金额非法: {}", cost)));
        }

        if self.parcel_repo.find_by_tracking_id(tracking_id)?.is_some() {
            return Err(ApiError::BusinessRuleViolation(format!(
                "追踪码已存在: {}",
                tracking_id
            )));
        }

        let now = Utc::now();
        let initial = LogisticStatus::PendingReception;
        let parcel = Parcel {
            id: uuid::Uuid::new_v4().to_string(),
            tracking_id: tracking_id.to_string(),
            weight_declared,
            weight_real: None,
            cost,
            logistic_status: initial,
            status: LogisticStatusMachine::main_status(initial),
            created_at: now,
            updated_at: now,
        };

        self.parcel_repo.insert(&parcel)?;
        info!(parcel_id = %parcel.id, tracking_id = %parcel.tracking_id, "包裹已创建");

        self.record_action(ActionLog {
            action_id: uuid::Uuid::new_v4().to_string(),
            parcel_id: Some(parcel.id.clone()),
            action_type: ActionType::CreateParcel.to_db_str().to_string(),
            action_ts: now.naive_utc(),
            actor: operator.to_string(),
            payload_json: Some(serde_json::json!({
                "tracking_id": parcel.tracking_id,
                "weight_declared": weight_declared,
                "cost": cost,
            })),
            detail: None,
        });

        Ok(parcel)
    }

    /// 按 ID 查询包裹
    pub fn get_parcel(&self, parcel_id: &str) -> ApiResult<Parcel> {
        self.parcel_repo
            .find_by_id(parcel_id)?
            .ok_or_else(|| ApiError::NotFound(format!("包裹(id={})不存在", parcel_id)))
    }

    /// 按追踪码查询包裹
    pub fn find_by_tracking_id(&self, tracking_id: &str) -> ApiResult<Option<Parcel>> {
        Ok(self.parcel_repo.find_by_tracking_id(tracking_id.trim())?)
    }

    /// 变更物流状态
    ///
    /// # 返回
    /// - Ok(Parcel): 更新后的包裹
    /// - Err(BusinessRuleViolation): 目标为称重结果状态
    /// - Err(InvalidStateTransition): 状态机不允许
    /// - Err(StatusConflict): 包裹状态已被并发修改
    pub fn change_logistic_status(
        &self,
        parcel_id: &str,
        to: LogisticStatus,
        operator: &str,
        reason: Option<&str>,
    ) -> ApiResult<Parcel> {
        let parcel = self.get_parcel(parcel_id)?;
        let from = parcel.logistic_status;

        // weighed / weight_issue 只能由称重录入产生（需同时写入实测重量与称重记录）
        if matches!(to, LogisticStatus::Weighed | LogisticStatus::WeightIssue) {
            return Err(ApiError::BusinessRuleViolation(format!(
                "状态{}只能通过称重录入进入",
                to
            )));
        }

        if !LogisticStatusMachine::is_transition_allowed(from, to) {
            debug!(parcel_id, %from, %to, "状态流转被拒绝");
            return Err(ApiError::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let now = Utc::now();
        self.parcel_repo.update_logistic_status(
            parcel_id,
            from,
            to,
            LogisticStatusMachine::main_status(to),
            now,
        )?;
        info!(parcel_id, %from, %to, operator, "物流状态已变更");

        self.record_action(ActionLog {
            action_id: uuid::Uuid::new_v4().to_string(),
            parcel_id: Some(parcel_id.to_string()),
            action_type: ActionType::StatusChange.to_db_str().to_string(),
            action_ts: now.naive_utc(),
            actor: operator.to_string(),
            payload_json: Some(serde_json::json!({
                "from": from,
                "to": to,
            })),
            detail: reason.map(str::to_string),
        });

        self.get_parcel(parcel_id)
    }

    /// 包裹当前状态的展示信息
    pub fn status_view(&self, parcel_id: &str) -> ApiResult<StatusView> {
        let parcel = self.get_parcel(parcel_id)?;
        Ok(StatusView::of(parcel.logistic_status))
    }

    /// 指定界面应展示的包裹
    pub fn list_for_interface(&self, kind: InterfaceKind) -> ApiResult<Vec<Parcel>> {
        let statuses = LogisticStatusMachine::interface_statuses(kind);
        Ok(self.parcel_repo.list_by_statuses(statuses)?)
    }

    /// 操作日志写入失败只记警告，不影响主操作
    fn record_action(&self, log: ActionLog) {
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(error = %e, action_type = %log.action_type, "记录操作日志失败");
        }
    }
}
