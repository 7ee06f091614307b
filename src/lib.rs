// ==========================================
// 包裹物流后台 - 核心库
// ==========================================
// 线路: 欧洲 ↔ 刚果金 (DRC)
// 技术栈: Rust + SQLite
// 核心: 称重对账 + 物流状态机
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AdjustmentKind, InterfaceKind, LogisticStatus, MainStatus};

// 领域实体
pub use domain::{
    ActionLog, ActionType, Parcel, PaymentCalculation, WeighingRecord, WeightAdjustment,
    WeightValidation,
};

// 引擎
pub use engine::{LogisticStatusMachine, WeightReconciliationCore};

// 配置
pub use config::{ConfigManager, ReconciliationConfigReader, ReconciliationPolicy};

// API
pub use api::{ApiError, ApiResult, ParcelApi, WeighingApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "包裹物流后台";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
