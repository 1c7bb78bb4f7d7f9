// ==========================================
// 高校建筑面积缺口测算系统 - 配置管理器
// ==========================================
// 职责: 运行参数的读取、覆写与快照
// 存储: config_kv 表 (key-value + scope)
// 优先级: 环境变量 > config_kv > 内置默认值
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

/// 配置键
pub mod config_keys {
    /// 报表导出目录
    pub const EXPORT_DIR: &str = "export_dir";
    /// 单校测算结果表标题
    pub const REPORT_TITLE: &str = "report_title";
}

/// 导出目录环境变量
pub const EXPORT_DIR_ENV: &str = "CAMPUS_AREA_GAP_EXPORT_DIR";

pub const DEFAULT_EXPORT_DIR: &str = "output";
pub const DEFAULT_REPORT_TITLE: &str = "高校建筑规模测算结果";

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 打开数据库并确保 config_kv 存在
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取配置值（scope_id='global'）
    pub fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值（存在则覆盖）
    pub fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(RepositoryError::ValidationError("配置键不能为空".to_string()));
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now', 'localtime')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 全部配置（按键排序）
    pub fn list(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(rows)
    }

    /// 配置快照（JSON）
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        Ok(serde_json::to_string(&self.list()?)?)
    }

    fn get_or_default(&self, key: &str, default: &str) -> RepositoryResult<String> {
        Ok(self
            .get(key)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    // ===== 报表配置 =====

    /// 报表导出目录
    pub fn get_export_dir(&self) -> RepositoryResult<PathBuf> {
        if let Ok(dir) = std::env::var(EXPORT_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        Ok(PathBuf::from(
            self.get_or_default(config_keys::EXPORT_DIR, DEFAULT_EXPORT_DIR)?,
        ))
    }

    /// 单校测算结果表标题
    pub fn get_report_title(&self) -> RepositoryResult<String> {
        self.get_or_default(config_keys::REPORT_TITLE, DEFAULT_REPORT_TITLE)
    }
}
