// ==========================================
// 高校建筑面积缺口测算系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 建表幂等，首次打开即可使用
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// foreign_keys 与 busy_timeout 需要每个连接单独开启，
/// special_subsidies 的级联删除依赖 foreign_keys。
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS school_info (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            school_name TEXT NOT NULL,
            school_type TEXT,
            year INTEGER NOT NULL,

            full_time_undergraduate REAL NOT NULL DEFAULT 0,
            full_time_master REAL NOT NULL DEFAULT 0,
            full_time_doctor REAL NOT NULL DEFAULT 0,
            international_undergraduate REAL NOT NULL DEFAULT 0,
            international_master REAL NOT NULL DEFAULT 0,
            international_doctor REAL NOT NULL DEFAULT 0,
            total_students REAL NOT NULL DEFAULT 0,

            teaching_area REAL NOT NULL DEFAULT 0,
            office_area REAL NOT NULL DEFAULT 0,
            total_living_area REAL NOT NULL DEFAULT 0,
            dormitory_area REAL NOT NULL DEFAULT 0,
            logistics_area REAL NOT NULL DEFAULT 0,

            current_building_area INTEGER NOT NULL DEFAULT 0,
            required_building_area INTEGER NOT NULL DEFAULT 0,
            teaching_area_gap INTEGER NOT NULL DEFAULT 0,
            office_area_gap INTEGER NOT NULL DEFAULT 0,
            dormitory_area_gap INTEGER NOT NULL DEFAULT 0,
            other_living_area_gap INTEGER NOT NULL DEFAULT 0,
            logistics_area_gap INTEGER NOT NULL DEFAULT 0,
            total_area_gap_with_subsidy INTEGER NOT NULL DEFAULT 0,
            total_area_gap_without_subsidy INTEGER NOT NULL DEFAULT 0,
            special_subsidy_total INTEGER NOT NULL DEFAULT 0,
            overall_compliance INTEGER NOT NULL DEFAULT 0,
            calculation_results TEXT,

            remarks TEXT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%f', 'now', 'localtime'))
        );

        CREATE INDEX IF NOT EXISTS idx_school_info_name_year ON school_info(school_name, year);
        CREATE INDEX IF NOT EXISTS idx_school_info_year ON school_info(year);

        CREATE TABLE IF NOT EXISTS special_subsidies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            school_info_id INTEGER NOT NULL,
            subsidy_name TEXT NOT NULL,
            subsidy_area REAL NOT NULL DEFAULT 0,
            FOREIGN KEY (school_info_id) REFERENCES school_info(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_special_subsidies_school ON special_subsidies(school_info_id);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
