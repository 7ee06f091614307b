// ==========================================
// 包裹物流后台 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod parcel;
pub mod payment;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use parcel::{Parcel, WeighingRecord};
pub use payment::{PaymentCalculation, WeightAdjustment, WeightValidation};
pub use types::{AdjustmentKind, InterfaceKind, LogisticStatus, MainStatus};
