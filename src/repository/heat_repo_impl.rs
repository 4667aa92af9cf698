// ==========================================
// 田径运动会分组编排系统 - 分组 Repository 实现
// ==========================================
// 职责: 分组集合的 SQLite 存取（使用 rusqlite）
// 存储: heat 表，每行一个分组，payload_json 为分组的 JSON
// 红线: Repository 不含业务规则，只做数据存取
// ==========================================

use crate::domain::heat::Heat;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::heat_repo::HeatRepository;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// SqliteHeatRepository
// ==========================================
pub struct SqliteHeatRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteHeatRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在事务中追加分组
    fn insert_heats_tx(tx: &Transaction, heats: &[Heat]) -> RepositoryResult<()> {
        let mut stmt = tx.prepare(
            r#"
            INSERT INTO heat (heat_id, event_id, heat_number, payload_json)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )?;

        for heat in heats {
            let payload = serde_json::to_string(heat)?;
            stmt.execute(params![heat.id, heat.event_id, heat.heat_number, payload])?;
        }
        Ok(())
    }

    fn parse_payload(raw: String) -> RepositoryResult<Heat> {
        Ok(serde_json::from_str(&raw)?)
    }
}

impl HeatRepository for SqliteHeatRepository {
    fn load_all(&self) -> RepositoryResult<Vec<Heat>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT payload_json FROM heat ORDER BY seq")?;

        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        payloads.into_iter().map(Self::parse_payload).collect()
    }

    fn load(&self, event_id: &str) -> RepositoryResult<Vec<Heat>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT payload_json FROM heat
            WHERE event_id = ?1
            ORDER BY heat_number, seq
            "#,
        )?;

        let payloads = stmt
            .query_map(params![event_id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<String>, _>>()?;

        payloads.into_iter().map(Self::parse_payload).collect()
    }

    fn find_heat(&self, heat_id: &str) -> RepositoryResult<Option<Heat>> {
        let conn = self.get_conn()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload_json FROM heat WHERE heat_id = ?1",
                params![heat_id],
                |row| row.get(0),
            )
            .optional()?;

        payload.map(Self::parse_payload).transpose()
    }

    fn replace_for_event(&self, event_id: &str, heats: &[Heat]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM heat WHERE event_id = ?1", params![event_id])?;
        Self::insert_heats_tx(&tx, heats)?;

        tx.commit()?;
        tracing::debug!(event_id, heats_count = heats.len(), "项目分组已替换");
        Ok(())
    }

    fn save_all(&self, heats: &[Heat]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM heat", [])?;
        Self::insert_heats_tx(&tx, heats)?;

        tx.commit()?;
        Ok(())
    }

    fn clear(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let removed = conn.execute("DELETE FROM heat", [])?;
        tracing::info!(removed, "已清空全部分组");
        Ok(())
    }
}
