// ==========================================
// 高校建筑面积缺口测算系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行及上层调用
// ==========================================

pub mod error;
pub mod report_api;
pub mod school_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use report_api::{ExportResponse, ReportApi};
pub use school_api::{parse_year_filter, CalculationResponse, ImportResponse, SchoolApi};
