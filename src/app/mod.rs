// ==========================================
// 高校建筑面积缺口测算系统 - 应用层
// ==========================================
// 职责: 装配数据库连接、仓储与 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
