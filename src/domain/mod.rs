// ==========================================
// 高校建筑面积缺口测算系统 - 领域层
// ==========================================
// 职责: 测算输入、测算结果、填报记录等领域实体
// ==========================================

pub mod record;
pub mod report;
pub mod school;
pub mod types;

pub use record::{
    OverallStatistics, SchoolRecord, SchoolStatistics, SchoolSubmission, TypeStatistics,
};
pub use report::{CategoryGap, GapReport, GapTotals, PerCategory, StudentTotals};
pub use school::{ExistingArea, SchoolInput, SpecialSubsidy, StudentCounts};
pub use types::{AreaCategory, CalcType, DegreeTier};
