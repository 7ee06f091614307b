// ==========================================
// 包裹物流后台 - 命令行入口
// ==========================================
// 初始化日志 → 打开数据库 → 输出当前对账策略与状态流转表
// ==========================================

use parcel_logistics::app::{get_default_db_path, AppState};
use parcel_logistics::engine::LogisticStatusMachine;
use parcel_logistics::{LogisticStatus, ReconciliationConfigReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    parcel_logistics::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", parcel_logistics::APP_NAME);
    tracing::info!("系统版本: {}", parcel_logistics::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let policy = app_state
        .config_manager
        .get_reconciliation_policy()
        .await
        .map_err(|e| anyhow::anyhow!("读取对账策略失败: {}", e))?;
    tracing::info!(
        supplement_rate = policy.supplement_rate,
        weight_tolerance = policy.weight_tolerance,
        payment_expiry_hours = policy.payment_expiry_hours,
        anomaly_threshold_pct = policy.anomaly_threshold_pct,
        "当前对账策略"
    );

    for status in LogisticStatus::ALL {
        let next: Vec<&str> = LogisticStatusMachine::allowed_transitions(status)
            .iter()
            .map(|s| s.to_db_str())
            .collect();
        println!(
            "{:<20} [{:<24}] {:<24} -> {}",
            status.to_db_str(),
            LogisticStatusMachine::main_status(status).to_db_str(),
            LogisticStatusMachine::label(status),
            if next.is_empty() {
                "(terminal)".to_string()
            } else {
                next.join(", ")
            }
        );
    }

    Ok(())
}
