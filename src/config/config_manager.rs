// ==========================================
// 包裹物流后台 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::reconciliation_config_trait::ReconciliationConfigReader;
use crate::config::reconciliation_policy::{
    PAYMENT_EXPIRY_HOURS, SUPPLEMENT_RATE, WEIGHT_ANOMALY_PCT, WEIGHT_TOLERANCE,
};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 读取数值配置；缺失或非法时回退默认值
    ///
    /// `accept` 用于排除非有限值、负值等不可用配置
    fn get_f64_or_default(
        &self,
        key: &str,
        default: f64,
        accept: impl Fn(f64) -> bool,
    ) -> ConfigResult<f64> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && accept(v) => Ok(v),
            _ => {
                tracing::warn!(config_key = key, raw_value = %raw, default, "配置值非法，使用默认值");
                Ok(default)
            }
        }
    }
}

// ==========================================
// ReconciliationConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ReconciliationConfigReader for ConfigManager {
    async fn get_supplement_rate(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::SUPPLEMENT_RATE, SUPPLEMENT_RATE, |v| v > 0.0)
    }

    async fn get_weight_tolerance(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::WEIGHT_TOLERANCE_KG, WEIGHT_TOLERANCE, |v| v >= 0.0)
    }

    async fn get_payment_expiry_hours(&self) -> ConfigResult<i64> {
        let value = match self.get_config_value(config_keys::PAYMENT_EXPIRY_HOURS)? {
            Some(v) => v,
            None => return Ok(PAYMENT_EXPIRY_HOURS),
        };

        match value.trim().parse::<i64>() {
            Ok(hours) if hours > 0 => Ok(hours),
            _ => {
                tracing::warn!(
                    config_key = config_keys::PAYMENT_EXPIRY_HOURS,
                    raw_value = %value,
                    "支付有效期配置非法，使用默认值"
                );
                Ok(PAYMENT_EXPIRY_HOURS)
            }
        }
    }

    async fn get_weight_anomaly_pct(&self) -> ConfigResult<f64> {
        self.get_f64_or_default(config_keys::WEIGHT_ANOMALY_PCT, WEIGHT_ANOMALY_PCT, |v| v > 0.0)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 称重对账
    pub const SUPPLEMENT_RATE: &str = "supplement_rate";
    pub const WEIGHT_TOLERANCE_KG: &str = "weight_tolerance_kg";
    pub const WEIGHT_ANOMALY_PCT: &str = "weight_anomaly_pct";

    // 支付
    pub const PAYMENT_EXPIRY_HOURS: &str = "payment_expiry_hours";
}
