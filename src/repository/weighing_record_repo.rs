// ==========================================
// 包裹物流后台 - 称重记录数据仓储
// ==========================================
// 红线: 追加写，不提供更新/删除
// 红线: 称重三步写入（状态 / 实测重量 / 记录）在同一事务内完成
// ==========================================

use crate::domain::parcel::WeighingRecord;
use crate::domain::types::{AdjustmentKind, LogisticStatus, MainStatus};
use crate::repository::error::{invalid_column, RepositoryError, RepositoryResult};
use crate::repository::parcel_repo::ParcelRepository;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct WeighingRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WeighingRecordRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 提交一次称重（事务）
    ///
    /// # 步骤
    /// 1. 包裹状态 expected → to（比较后写入）
    /// 2. 写入实测重量（仅当尚未称重）
    /// 3. 追加称重记录
    ///
    /// 任一步失败整体回滚，包裹保持原状态且未称重
    pub fn commit_weighing(
        &self,
        record: &WeighingRecord,
        expected: LogisticStatus,
        to: LogisticStatus,
        main_status: MainStatus,
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        ParcelRepository::update_logistic_status_on(
            &tx,
            &record.parcel_id,
            expected,
            to,
            main_status,
            record.weighed_at,
        )?;
        ParcelRepository::set_weight_real_on(
            &tx,
            &record.parcel_id,
            record.actual_weight,
            record.weighed_at,
        )?;
        Self::insert_on(&tx, record)?;

        tx.commit()?;
        Ok(())
    }

    /// 插入称重记录
    ///
    /// # 返回
    /// - `Err(ForeignKeyViolation)`: parcel_id 不存在
    fn insert_on(conn: &Connection, record: &WeighingRecord) -> RepositoryResult<()> {
        conn.execute(
            r#"
            INSERT INTO weighing_record (
                record_id, parcel_id, declared_weight, actual_weight, adjustment_kind,
                supplement_amount, total_amount, weight_difference, reason,
                payment_expires_at, weighed_at, weighed_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                record.record_id,
                record.parcel_id,
                record.declared_weight,
                record.actual_weight,
                record.adjustment_kind.to_db_str(),
                record.supplement_amount,
                record.total_amount,
                record.weight_difference,
                record.reason,
                record.payment_expires_at,
                record.weighed_at,
                record.weighed_by,
            ],
        )?;

        Ok(())
    }

    /// 查询包裹的全部称重记录（时间升序）
    pub fn find_by_parcel(&self, parcel_id: &str) -> RepositoryResult<Vec<WeighingRecord>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT record_id, parcel_id, declared_weight, actual_weight, adjustment_kind,
                   supplement_amount, total_amount, weight_difference, reason,
                   payment_expires_at, weighed_at, weighed_by
            FROM weighing_record
            WHERE parcel_id = ?1
            ORDER BY weighed_at ASC, rowid ASC
            "#,
        )?;

        let records = stmt
            .query_map(params![parcel_id], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records)
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<WeighingRecord> {
        let kind_raw: String = row.get(4)?;
        let adjustment_kind = AdjustmentKind::parse(&kind_raw)
            .ok_or_else(|| invalid_column(4, "adjustment_kind", &kind_raw))?;

        Ok(WeighingRecord {
            record_id: row.get(0)?,
            parcel_id: row.get(1)?,
            declared_weight: row.get(2)?,
            actual_weight: row.get(3)?,
            adjustment_kind,
            supplement_amount: row.get(5)?,
            total_amount: row.get(6)?,
            weight_difference: row.get(7)?,
            reason: row.get(8)?,
            payment_expires_at: row.get(9)?,
            weighed_at: row.get(10)?,
            weighed_by: row.get(11)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn setup() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO parcel (id, tracking_id, weight_declared, cost, logistic_status, status, created_at, updated_at)
             VALUES ('p1', 'T1', 2.0, 35.0, 'received', 'to_warehouse', datetime('now'), datetime('now'))",
            [],
        )
        .unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn make_record(record_id: &str, parcel_id: &str) -> WeighingRecord {
        let now = Utc::now();
        WeighingRecord {
            record_id: record_id.to_string(),
            parcel_id: parcel_id.to_string(),
            declared_weight: 2.0,
            actual_weight: 2.3,
            adjustment_kind: AdjustmentKind::Supplement,
            supplement_amount: 0.25,
            total_amount: 35.25,
            weight_difference: 0.3,
            reason: Some("over".to_string()),
            payment_expires_at: Some(now + Duration::hours(24)),
            weighed_at: now,
            weighed_by: "agent1".to_string(),
        }
    }

    /// 读取包裹的 (logistic_status, weight_real)
    fn parcel_row(conn: &Arc<Mutex<Connection>>, parcel_id: &str) -> (String, Option<f64>) {
        conn.lock()
            .unwrap()
            .query_row(
                "SELECT logistic_status, weight_real FROM parcel WHERE id = ?1",
                params![parcel_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap()
    }

    #[test]
    fn test_commit_weighing_and_find_by_parcel() {
        let conn = setup();
        let repo = WeighingRecordRepository::new(conn.clone());
        let record = make_record("w1", "p1");

        repo.commit_weighing(
            &record,
            LogisticStatus::Received,
            LogisticStatus::WeightIssue,
            MainStatus::ToWarehouse,
        )
        .unwrap();

        let records = repo.find_by_parcel("p1").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].adjustment_kind, AdjustmentKind::Supplement);
        assert_eq!(records[0].payment_expires_at, record.payment_expires_at);
        assert!(repo.find_by_parcel("p2").unwrap().is_empty());

        assert_eq!(parcel_row(&conn, "p1"), ("weight_issue".to_string(), Some(2.3)));
    }

    #[test]
    fn test_commit_weighing_rolls_back_when_record_insert_fails() {
        let conn = setup();
        conn.lock()
            .unwrap()
            .execute_batch(
                "CREATE TRIGGER reject_weighing BEFORE INSERT ON weighing_record
                 BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
            )
            .unwrap();
        let repo = WeighingRecordRepository::new(conn.clone());

        let err = repo
            .commit_weighing(
                &make_record("w1", "p1"),
                LogisticStatus::Received,
                LogisticStatus::WeightIssue,
                MainStatus::ToWarehouse,
            )
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DatabaseQueryError(_)));

        // 状态与实测重量均未落库
        assert_eq!(parcel_row(&conn, "p1"), ("received".to_string(), None));
        assert!(repo.find_by_parcel("p1").unwrap().is_empty());
    }

    #[test]
    fn test_commit_weighing_status_conflict() {
        let conn = setup();
        let repo = WeighingRecordRepository::new(conn.clone());

        let err = repo
            .commit_weighing(
                &make_record("w1", "p1"),
                LogisticStatus::Weighed,
                LogisticStatus::WeightIssue,
                MainStatus::ToWarehouse,
            )
            .unwrap_err();
        assert!(matches!(err, RepositoryError::StatusConflict { .. }));
        assert_eq!(parcel_row(&conn, "p1"), ("received".to_string(), None));

        let err = repo
            .commit_weighing(
                &make_record("w2", "missing"),
                LogisticStatus::Received,
                LogisticStatus::Weighed,
                MainStatus::ToWarehouse,
            )
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound { .. }));
    }

    #[test]
    fn test_record_requires_existing_parcel() {
        let conn = setup();
        let guard = conn.lock().unwrap();
        let err =
            WeighingRecordRepository::insert_on(&guard, &make_record("w1", "missing")).unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }

    #[test]
    fn test_unknown_adjustment_kind_is_rejected() {
        let conn = setup();
        conn.lock()
            .unwrap()
            .execute(
                "INSERT INTO weighing_record (
                    record_id, parcel_id, declared_weight, actual_weight, adjustment_kind,
                    supplement_amount, total_amount, weight_difference, weighed_at, weighed_by
                ) VALUES ('w1', 'p1', 2.0, 2.3, 'discount', 0.0, 35.0, 0.3, datetime('now'), 'agent1')",
                [],
            )
            .unwrap();
        let repo = WeighingRecordRepository::new(conn);

        let err = repo.find_by_parcel("p1").unwrap_err();
        match err {
            RepositoryError::DatabaseQueryError(msg) => assert!(msg.contains("adjustment_kind")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
