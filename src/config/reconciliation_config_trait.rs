// ==========================================
// 包裹物流后台 - 对账配置读取 Trait
// ==========================================
// 职责: 定义称重流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::reconciliation_policy::ReconciliationPolicy;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ReconciliationConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ReconciliationConfigReader: Send + Sync {
    /// 获取每公斤补缴费率
    ///
    /// # 默认值
    /// - 2.5
    async fn get_supplement_rate(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 获取重量容差（kg）
    ///
    /// # 默认值
    /// - 0.2
    async fn get_weight_tolerance(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 获取支付链接有效期（小时）
    ///
    /// # 默认值
    /// - 24
    async fn get_payment_expiry_hours(&self) -> Result<i64, Box<dyn Error + Send + Sync>>;

    /// 获取偏差告警阈值（%）
    ///
    /// # 默认值
    /// - 50
    async fn get_weight_anomaly_pct(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 组装完整对账策略
    async fn get_reconciliation_policy(
        &self,
    ) -> Result<ReconciliationPolicy, Box<dyn Error + Send + Sync>> {
        Ok(ReconciliationPolicy {
            supplement_rate: self.get_supplement_rate().await?,
            weight_tolerance: self.get_weight_tolerance().await?,
            payment_expiry_hours: self.get_payment_expiry_hours().await?,
            anomaly_threshold_pct: self.get_weight_anomaly_pct().await?,
        })
    }
}
