// ==========================================
// 包裹物流后台 - 包裹领域模型
// ==========================================
// 职责: 包裹实体 + 称重记录
// 红线: weight_declared / cost / tracking_id 创建后不可变
// 红线: status 只由 logistic_status 派生
// ==========================================

use crate::domain::types::{AdjustmentKind, LogisticStatus, MainStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Parcel - 包裹
// ==========================================
// 字段名与文档库中的存储名保持一致 (camelCase / trackingID)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    pub id: String, // 由存储层分配

    #[serde(rename = "trackingID")]
    pub tracking_id: String, // 对外追踪码

    #[serde(alias = "weight")]
    pub weight_declared: f64, // 申报重量 (kg)

    #[serde(default)]
    pub weight_real: Option<f64>, // 实测重量 (kg), 称重前为空

    pub cost: f64, // 下单金额 (EUR)

    #[serde(alias = "logisticsStatus", default)]
    pub logistic_status: LogisticStatus,

    pub status: MainStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Parcel {
    /// 是否已完成称重
    pub fn is_weighed(&self) -> bool {
        self.weight_real.is_some()
    }
}

// ==========================================
// WeighingRecord - 称重记录
// ==========================================
// 每次称重事件一条新记录 (追加写, 不原地修改)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeighingRecord {
    pub record_id: String,
    pub parcel_id: String,
    pub declared_weight: f64,
    pub actual_weight: f64,
    pub adjustment_kind: AdjustmentKind,
    pub supplement_amount: f64,  // 正数补缴, 负数退款, 无调整为 0
    pub total_amount: f64,
    pub weight_difference: f64,
    pub reason: Option<String>,
    pub payment_expires_at: Option<DateTime<Utc>>, // 仅补缴时有值
    pub weighed_at: DateTime<Utc>,
    pub weighed_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_document_with_aliases() {
        let raw = r#"{
            "id": "abc",
            "trackingID": "EU-CD-0001",
            "weight": 2.0,
            "cost": 35.0,
            "logisticsStatus": "received",
            "status": "to_warehouse",
            "createdAt": "2026-01-10T08:00:00Z",
            "updatedAt": "2026-01-10T08:00:00Z"
        }"#;

        let parcel: Parcel = serde_json::from_str(raw).unwrap();
        assert_eq!(parcel.tracking_id, "EU-CD-0001");
        assert_eq!(parcel.weight_declared, 2.0);
        assert_eq!(parcel.weight_real, None);
        assert_eq!(parcel.logistic_status, LogisticStatus::Received);
        assert_eq!(parcel.status, MainStatus::ToWarehouse);
        assert!(!parcel.is_weighed());
    }

    #[test]
    fn test_serialize_uses_canonical_names() {
        let now = Utc::now();
        let parcel = Parcel {
            id: "p1".to_string(),
            tracking_id: "EU-CD-0002".to_string(),
            weight_declared: 1.5,
            weight_real: Some(1.6),
            cost: 20.0,
            logistic_status: LogisticStatus::Weighed,
            status: MainStatus::ToWarehouse,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&parcel).unwrap();
        assert_eq!(value["trackingID"], "EU-CD-0002");
        assert_eq!(value["weightDeclared"], 1.5);
        assert_eq!(value["weightReal"], 1.6);
        assert_eq!(value["logisticStatus"], "weighed");
    }
}
