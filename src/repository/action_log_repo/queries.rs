use super::core::{ActionLogRepository, ACTION_TS_FORMAT};
use crate::domain::action_log::ActionLog;
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use rusqlite::{params, Result as SqliteResult, Row};

impl ActionLogRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 查询指定包裹的全部操作日志（时间升序）
    pub fn find_by_parcel(&self, parcel_id: &str) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT action_id, parcel_id, action_type, action_ts, actor,
                   payload_json, detail
            FROM action_log
            WHERE parcel_id = ?
            ORDER BY action_ts ASC, rowid ASC
            "#,
        )?;

        let logs = stmt
            .query_map(params![parcel_id], |row| self.map_row(row))?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn map_row(&self, row: &Row) -> SqliteResult<ActionLog> {
        let action_ts_str: String = row.get(3)?;
        let action_ts = NaiveDateTime::parse_from_str(&action_ts_str, ACTION_TS_FORMAT)
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
            })?;

        // JSON 字段解析失败时置空
        let payload_json_str: Option<String> = row.get(5)?;
        let payload_json = payload_json_str.and_then(|s| serde_json::from_str(&s).ok());

        Ok(ActionLog {
            action_id: row.get(0)?,
            parcel_id: row.get(1)?,
            action_type: row.get(2)?,
            action_ts,
            actor: row.get(4)?,
            payload_json,
            detail: row.get(6)?,
        })
    }
}
