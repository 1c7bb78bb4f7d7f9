// ==========================================
// 高校建筑面积缺口测算系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("{entity}(id={id})不存在")]
    NotFound { entity: String, id: String },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("SQLite 执行失败: {0}")]
    DatabaseQueryError(String),

    /// UNIQUE / FOREIGN KEY / CHECK 等约束冲突
    #[error("约束冲突: {0}")]
    ConstraintViolation(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    /// 测算结果 JSON 读写失败
    #[error("测算结果序列化失败: {0}")]
    SerializationError(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RepositoryError::ConstraintViolation(
                    msg.clone().unwrap_or_else(|| err.to_string()),
                )
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SerializationError(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_constraint_violation_mapped() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT UNIQUE)")
            .unwrap();
        conn.execute("INSERT INTO t (name) VALUES ('a')", []).unwrap();

        let err: RepositoryError = conn
            .execute("INSERT INTO t (name) VALUES ('a')", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::ConstraintViolation(_)));
    }

    #[test]
    fn test_missing_table_is_query_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err: RepositoryError = conn
            .execute("DELETE FROM missing_table", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, RepositoryError::DatabaseQueryError(_)));
    }
}
