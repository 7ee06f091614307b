// ==========================================
// 包裹物流后台 - 引擎层
// ==========================================
// 职责: 实现业务规则,不拼 SQL
// 红线: Engine 不拼 SQL, 所有对账结论必须输出 reason
// ==========================================

pub mod status_machine;
pub mod weight_reconciliation;

// 重导出核心引擎
pub use status_machine::LogisticStatusMachine;
pub use weight_reconciliation::{
    compute_refund, compute_supplement, reconcile, validate_weights, WeightReconciliationCore,
};
