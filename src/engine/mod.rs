// ==========================================
// 高校建筑面积缺口测算系统 - 引擎层
// ==========================================
// 职责: 学校类型解析、面积标准查询、缺口测算
// 红线: 引擎为纯函数，不访问数据库、不写文件
// ==========================================

pub mod category_resolver;
pub mod error;
pub mod gap_calculator;
pub mod standards;

// 重导出核心引擎
pub use category_resolver::{CategoryResolver, ResolutionSource, ResolvedCategory};
pub use error::{CalcError, CalcResult};
pub use gap_calculator::{calculate_building_area_gap, round_half_up, GapCalculator};
pub use standards::AreaStandardsTable;
