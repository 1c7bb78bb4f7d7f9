// ==========================================
// 高校建筑面积缺口测算系统 - 测算引擎错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 测算失败整体报错，不返回部分结果
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("特殊补助面积无效 (第{index}项 {name}): {value}")]
    InvalidSubsidyArea {
        index: usize,
        name: String,
        value: String,
    },

    #[error("特殊补助面积不能为负数 (第{index}项 {name}): {area}")]
    NegativeSubsidyArea {
        index: usize,
        name: String,
        area: f64,
    },

    #[error("测算结果超出数值范围: {0}")]
    NonFiniteResult(String),
}

pub type CalcResult<T> = Result<T, CalcError>;
