// ==========================================
// 包裹物流后台 - 配置层
// ==========================================
// 职责: 系统配置管理,支持 global 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod reconciliation_config_trait;
pub mod reconciliation_policy;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use reconciliation_config_trait::ReconciliationConfigReader;
pub use reconciliation_policy::ReconciliationPolicy;
