// ==========================================
// 高校建筑面积缺口测算系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{ReportApi, SchoolApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::repository::SchoolRecordRepository;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "CAMPUS_AREA_GAP_DB_PATH";

const DB_FILE_NAME: &str = "campus_area_gap.db";

/// 应用状态
///
/// 所有仓储共享同一个数据库连接。
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 学校测算API
    pub school_api: Arc<SchoolApi>,

    /// 报表导出API
    pub report_api: Arc<ReportApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 打开数据库、建表并装配 API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;

        match read_schema_version(&conn) {
            Ok(Some(v)) if v > CURRENT_SCHEMA_VERSION => {
                tracing::warn!(
                    "数据库 schema_version={} 高于程序期望的 {}，可能由更新版本创建",
                    v,
                    CURRENT_SCHEMA_VERSION
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("读取 schema_version 失败: {}", e),
        }

        let conn = Arc::new(Mutex::new(conn));

        let repo = Arc::new(SchoolRecordRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("配置管理器初始化失败: {}", e))?,
        );

        let school_api = Arc::new(SchoolApi::new(repo.clone()));
        let report_api = Arc::new(ReportApi::new(repo, config_manager.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            school_api,
            report_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DB_FILE_NAME);

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("campus-area-gap");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
