// ==========================================
// 高校建筑面积缺口测算系统 - 配置层
// ==========================================
// 职责: 运行参数管理（导出目录、报表标题）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

pub use config_manager::{config_keys, ConfigManager};
