// ==========================================
// 包裹物流后台 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ParcelApi, WeighingApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::repository::{ActionLogRepository, ParcelRepository, WeighingRecordRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 包裹API
    pub parcel_api: Arc<ParcelApi>,

    /// 称重API
    pub weighing_api: Arc<WeighingApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并建表
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;

        match read_schema_version(&conn) {
            Ok(Some(v)) if v > CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    db_version = v,
                    expected = CURRENT_SCHEMA_VERSION,
                    "数据库 schema 版本高于程序期望版本"
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("读取 schema_version 失败(将继续启动): {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let parcel_repo = Arc::new(ParcelRepository::new(conn.clone()));
        let weighing_record_repo = Arc::new(WeighingRecordRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 创建API实例
        // ==========================================
        let parcel_api = Arc::new(ParcelApi::new(parcel_repo.clone(), action_log_repo.clone()));
        let weighing_api = Arc::new(WeighingApi::new(
            parcel_repo,
            weighing_record_repo,
            action_log_repo.clone(),
            config_manager.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            parcel_api,
            weighing_api,
            config_manager,
            action_log_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先读取环境变量 PARCEL_LOGISTICS_DB_PATH，其次使用用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("PARCEL_LOGISTICS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./parcel_logistics.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("parcel-logistics-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("parcel-logistics");
        }

        ensure_data_dir(&path);
        path = path.join("parcel_logistics.db");
    }

    path.to_string_lossy().to_string()
}

/// 确保数据目录存在；失败只记警告，由后续打开数据库时报错
fn ensure_data_dir(dir: &std::path::Path) -> bool {
    match std::fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "创建数据目录失败");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        assert!(ensure_data_dir(&nested));
        assert!(nested.is_dir());

        // 父路径是普通文件，无法建目录
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(!ensure_data_dir(&file.path().join("sub")));
    }

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }
}
