// ==========================================
// 高校建筑面积缺口测算系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod school_record_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use school_record_repo::{SchoolRecordRepository, UNCLASSIFIED_TYPE};
