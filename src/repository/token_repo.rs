// ==========================================
// quickLOG 质量模块 - 会话令牌仓储
// ==========================================
// 客户端唯一持久化的状态: 认证令牌
// 存储: local_kv 表 (key = auth_token)
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const AUTH_TOKEN_KEY: &str = "auth_token";

// ==========================================
// TokenRepository - 令牌仓储
// ==========================================
pub struct TokenRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TokenRepository {
    /// 打开 (或创建) 令牌存储文件
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 (会再次应用 PRAGMA 与建表, 幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取已保存的令牌
    pub fn load(&self) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let token = conn
            .query_row(
                "SELECT value FROM local_kv WHERE key = ?1",
                params![AUTH_TOKEN_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(token.filter(|t| !t.trim().is_empty()))
    }

    /// 保存令牌 (覆盖旧值)
    pub fn save(&self, token: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO local_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![AUTH_TOKEN_KEY, token.trim()],
        )?;
        tracing::debug!("auth token saved");
        Ok(())
    }

    /// 清除令牌 (登出)
    ///
    /// 返回是否确实删除了记录
    pub fn clear(&self) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM local_kv WHERE key = ?1",
            params![AUTH_TOKEN_KEY],
        )?;
        Ok(affected > 0)
    }
}
