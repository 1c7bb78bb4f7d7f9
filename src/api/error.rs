// ==========================================
// 高校建筑面积缺口测算系统 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为面向用户的错误消息
// ==========================================

use crate::engine::error::CalcError;
use crate::importer::error::ImportError;
use crate::report::error::ReportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 调用方错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("测算失败: {0}")]
    CalculationFailed(String),

    // ===== 存储错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据冲突: {0}")]
    DataConflict(String),

    // ===== 文件错误 =====
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("报表导出失败: {0}")]
    ExportError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            e @ RepositoryError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::ConstraintViolation(msg) => ApiError::DataConflict(msg),
            e @ RepositoryError::SerializationError(_) => ApiError::InternalError(e.to_string()),
            e @ (RepositoryError::LockError(_) | RepositoryError::DatabaseQueryError(_)) => {
                ApiError::DatabaseError(e.to_string())
            }
        }
    }
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        ApiError::CalculationFailed(err.to_string())
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            // JSON 填报数据格式问题属于调用方输入错误
            ImportError::InvalidRecord(msg) => ApiError::InvalidInput(msg),
            // 特殊补助无法换算为面积时，整次测算失败
            e @ (ImportError::InvalidSubsidyEntry { .. }
            | ImportError::InvalidSubsidyList(_)
            | ImportError::TypeConversionError { .. }) => {
                ApiError::CalculationFailed(e.to_string())
            }
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NoData => ApiError::NotFound(err.to_string()),
            other => ApiError::ExportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "school_info".to_string(),
            id: "42".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("school_info"));
                assert!(msg.contains("42"));
            }
            _ => panic!("Expected NotFound"),
        }

        let api_err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        match api_err {
            ApiError::DatabaseError(msg) => assert!(msg.contains("poisoned")),
            _ => panic!("Expected DatabaseError"),
        }
    }

    #[test]
    fn test_calc_and_import_error_conversion() {
        let api_err: ApiError = CalcError::NegativeSubsidyArea {
            index: 1,
            name: "实验室补助".to_string(),
            area: -1.0,
        }
        .into();
        assert!(matches!(api_err, ApiError::CalculationFailed(_)));

        let api_err: ApiError = ImportError::InvalidRecord("缺少学校数据".to_string()).into();
        match api_err {
            ApiError::InvalidInput(msg) => assert_eq!(msg, "缺少学校数据"),
            _ => panic!("Expected InvalidInput"),
        }

        let api_err: ApiError = ImportError::FileNotFound("a.csv".to_string()).into();
        assert!(matches!(api_err, ApiError::ImportError(_)));
    }

    #[test]
    fn test_malformed_subsidy_is_calculation_failure() {
        let api_err: ApiError = ImportError::InvalidSubsidyEntry {
            index: 1,
            message: "补助面积无法解析: 很多".to_string(),
        }
        .into();
        match api_err {
            ApiError::CalculationFailed(msg) => assert!(msg.contains("补助面积无法解析: 很多")),
            _ => panic!("Expected CalculationFailed"),
        }

        let api_err: ApiError = ImportError::TypeConversionError {
            row: 3,
            field: "特殊补助明细".to_string(),
            message: "第1项: 补助面积无法解析: abc".to_string(),
        }
        .into();
        assert!(matches!(api_err, ApiError::CalculationFailed(_)));

        let api_err: ApiError =
            ImportError::InvalidSubsidyList("特殊补助数据应为数组".to_string()).into();
        assert!(matches!(api_err, ApiError::CalculationFailed(_)));
    }

    #[test]
    fn test_report_error_conversion() {
        let api_err: ApiError = ReportError::NoData.into();
        assert!(api_err.to_string().contains("没有找到符合条件的数据"));
    }
}
