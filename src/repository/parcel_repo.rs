// ==========================================
// 包裹物流后台 - 包裹数据仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 红线: 状态更新采用比较后写入 (当前状态不符即冲突)
// ==========================================

use crate::domain::parcel::Parcel;
use crate::domain::types::{LogisticStatus, MainStatus};
use crate::repository::error::{invalid_column, RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const PARCEL_COLUMNS: &str = "id, tracking_id, weight_declared, weight_real, cost, \
                              logistic_status, status, created_at, updated_at";

// ==========================================
// ParcelRepository - 包裹仓储
// ==========================================
pub struct ParcelRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ParcelRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Parcel> {
        let logistic_raw: String = row.get(5)?;
        let logistic_status = LogisticStatus::parse(&logistic_raw)
            .ok_or_else(|| invalid_column(5, "logistic_status", &logistic_raw))?;

        let status_raw: String = row.get(6)?;
        let status = MainStatus::parse(&status_raw)
            .ok_or_else(|| invalid_column(6, "status", &status_raw))?;

        Ok(Parcel {
            id: row.get(0)?,
            tracking_id: row.get(1)?,
            weight_declared: row.get(2)?,
            weight_real: row.get(3)?,
            cost: row.get(4)?,
            logistic_status,
            status,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入包裹
    ///
    /// # 返回
    /// - `Err(UniqueConstraintViolation)`: tracking_id 已存在
    pub fn insert(&self, parcel: &Parcel) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            &format!("INSERT INTO parcel ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)", PARCEL_COLUMNS),
            params![
                parcel.id,
                parcel.tracking_id,
                parcel.weight_declared,
                parcel.weight_real,
                parcel.cost,
                parcel.logistic_status.to_db_str(),
                parcel.status.to_db_str(),
                parcel.created_at,
                parcel.updated_at,
            ],
        )?;

        Ok(())
    }

    /// 更新物流状态（比较后写入）
    ///
    /// 同时写入派生主状态。当前状态与 `expected` 不一致时返回 StatusConflict。
    pub fn update_logistic_status(
        &self,
        parcel_id: &str,
        expected: LogisticStatus,
        to: LogisticStatus,
        main_status: MainStatus,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::update_logistic_status_on(&conn, parcel_id, expected, to, main_status, updated_at)
    }

    /// 在给定连接（或事务）上执行状态比较写入
    pub(crate) fn update_logistic_status_on(
        conn: &Connection,
        parcel_id: &str,
        expected: LogisticStatus,
        to: LogisticStatus,
        main_status: MainStatus,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let rows = conn.execute(
            r#"
            UPDATE parcel
            SET logistic_status = ?1, status = ?2, updated_at = ?3
            WHERE id = ?4 AND logistic_status = ?5
            "#,
            params![
                to.to_db_str(),
                main_status.to_db_str(),
                updated_at,
                parcel_id,
                expected.to_db_str(),
            ],
        )?;

        if rows == 1 {
            return Ok(());
        }

        let actual: Option<String> = conn
            .query_row(
                "SELECT logistic_status FROM parcel WHERE id = ?1",
                params![parcel_id],
                |row| row.get(0),
            )
            .optional()?;

        match actual {
            Some(actual) => Err(RepositoryError::StatusConflict {
                parcel_id: parcel_id.to_string(),
                expected: expected.to_db_str().to_string(),
                actual,
            }),
            None => Err(RepositoryError::NotFound {
                entity: "Parcel".to_string(),
                id: parcel_id.to_string(),
            }),
        }
    }

    /// 写入实测重量（仅当尚未称重）
    ///
    /// 只在称重事务内调用，见 `WeighingRecordRepository::commit_weighing`
    pub(crate) fn set_weight_real_on(
        conn: &Connection,
        parcel_id: &str,
        weight_real: f64,
        updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        let rows = conn.execute(
            "UPDATE parcel SET weight_real = ?1, updated_at = ?2 WHERE id = ?3 AND weight_real IS NULL",
            params![weight_real, updated_at, parcel_id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::BusinessRuleViolation(format!(
                "包裹 {} 不存在或已称重",
                parcel_id
            )));
        }

        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, parcel_id: &str) -> RepositoryResult<Option<Parcel>> {
        let conn = self.get_conn()?;

        let parcel = conn
            .query_row(
                &format!("SELECT {} FROM parcel WHERE id = ?1", PARCEL_COLUMNS),
                params![parcel_id],
                Self::map_row,
            )
            .optional()?;

        Ok(parcel)
    }

    pub fn find_by_tracking_id(&self, tracking_id: &str) -> RepositoryResult<Option<Parcel>> {
        let conn = self.get_conn()?;

        let parcel = conn
            .query_row(
                &format!("SELECT {} FROM parcel WHERE tracking_id = ?1", PARCEL_COLUMNS),
                params![tracking_id],
                Self::map_row,
            )
            .optional()?;

        Ok(parcel)
    }

    /// 按物流状态列表查询（按创建时间升序）
    pub fn list_by_statuses(&self, statuses: &[LogisticStatus]) -> RepositoryResult<Vec<Parcel>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;

        let placeholders = (1..=statuses.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM parcel WHERE logistic_status IN ({}) ORDER BY created_at, tracking_id",
            PARCEL_COLUMNS, placeholders
        );

        let values: Vec<&str> = statuses.iter().map(|s| s.to_db_str()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(values), Self::map_row)?;

        let mut parcels = Vec::new();
        for row in rows {
            parcels.push(row?);
        }
        Ok(parcels)
    }
}
