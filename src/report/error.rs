// ==========================================
// 高校建筑面积缺口测算系统 - 报表模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("报表文件写入失败: {0}")]
    Io(String),

    #[error("CSV 写入失败: {0}")]
    Csv(String),

    #[error("没有找到符合条件的数据")]
    NoData,
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::Io(err.to_string())
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::Csv(err.to_string())
    }
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;
