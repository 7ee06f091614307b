// ==========================================
// 包裹物流后台 - 操作日志领域模型
// ==========================================
// 红线: 所有写入必须记录
// 用途: 审计追踪
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,
    pub parcel_id: Option<String>, // 关联包裹 (配置类操作可为 None)
    pub action_type: String,       // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,
    pub actor: String,

    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    CreateParcel, // 创建包裹
    StatusChange, // 物流状态变更
    Weighing,     // 称重
}

impl ActionType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ActionType::CreateParcel => "CREATE_PARCEL",
            ActionType::StatusChange => "STATUS_CHANGE",
            ActionType::Weighing => "WEIGHING",
        }
    }
}
