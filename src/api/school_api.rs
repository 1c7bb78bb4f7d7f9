// ==========================================
// 高校建筑面积缺口测算系统 - 学校测算 API
// ==========================================
// 职责: 在线测算、保存、批量导入、历史查询与统计
// ==========================================

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::record::{SchoolRecord, SchoolStatistics, SchoolSubmission};
use crate::domain::report::GapReport;
use crate::engine::GapCalculator;
use crate::importer::{FieldMapper, ImportFailure, ImportSummary, SchoolImporter};
use crate::repository::SchoolRecordRepository;

/// 单次测算响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub submission: SchoolSubmission,
    pub report: GapReport,
    /// 统计年份（未填写时为当前年份）
    pub year: i32,
    /// 保存成功时的记录 ID
    pub record_id: Option<i64>,
    /// 保存失败原因（测算结果仍然有效）
    pub save_error: Option<String>,
}

/// 文件导入响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub summary: ImportSummary,
    pub saved_ids: Vec<i64>,
    pub save_failures: Vec<ImportFailure>,
}

// ==========================================
// SchoolApi - 学校测算 API
// ==========================================
pub struct SchoolApi {
    repo: Arc<SchoolRecordRepository>,
    mapper: FieldMapper,
    calculator: GapCalculator,
    importer: SchoolImporter,
}

impl SchoolApi {
    pub fn new(repo: Arc<SchoolRecordRepository>) -> Self {
        Self {
            repo,
            mapper: FieldMapper,
            calculator: GapCalculator::new(),
            importer: SchoolImporter::new(),
        }
    }

    // ==========================================
    // 测算
    // ==========================================

    /// 在线测算（不保存）
    ///
    /// # 参数
    /// - school_data: 中文字段的学校填报对象
    /// - special_subsidies: 特殊补助数组（可为空）
    pub fn calculate(
        &self,
        school_data: &Value,
        special_subsidies: Option<&Value>,
    ) -> ApiResult<CalculationResponse> {
        let submission = self.map_request(school_data, special_subsidies)?;
        let report = self.calculate_submission(&submission)?;

        Ok(CalculationResponse {
            year: submission.resolved_year(),
            submission,
            report,
            record_id: None,
            save_error: None,
        })
    }

    /// 在线测算并保存
    ///
    /// 保存失败不影响测算结果返回，失败原因写入 `save_error`。
    pub fn calculate_and_save(
        &self,
        school_data: &Value,
        special_subsidies: Option<&Value>,
    ) -> ApiResult<CalculationResponse> {
        let mut response = self.calculate(school_data, special_subsidies)?;

        match self.save_submission(&response.submission, &response.report) {
            Ok(id) => response.record_id = Some(id),
            Err(e) => {
                warn!(school = %response.report.school_name, error = %e, "测算结果保存失败");
                response.save_error = Some(format!("保存失败: {}", e));
            }
        }

        Ok(response)
    }

    /// 测算已映射的填报数据
    pub fn calculate_submission(&self, submission: &SchoolSubmission) -> ApiResult<GapReport> {
        Ok(self
            .calculator
            .calculate(&submission.input, &submission.subsidies)?)
    }

    /// 保存填报及测算结果
    pub fn save_submission(
        &self,
        submission: &SchoolSubmission,
        report: &GapReport,
    ) -> ApiResult<i64> {
        Ok(self.repo.insert(submission, report)?)
    }

    /// 导入填报文件，可选逐行保存
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P, save: bool) -> ApiResult<ImportResponse> {
        let summary = self.importer.import_file(file_path)?;

        let mut saved_ids = Vec::new();
        let mut save_failures = Vec::new();
        if save {
            for item in &summary.success {
                match self.save_submission(&item.submission, &item.report) {
                    Ok(id) => saved_ids.push(id),
                    Err(e) => {
                        warn!(row_number = item.row_number, error = %e, "导入行保存失败");
                        save_failures.push(ImportFailure {
                            row_number: item.row_number,
                            reason: e.to_string(),
                        });
                    }
                }
            }
            info!(saved = saved_ids.len(), failed = save_failures.len(), "导入数据已保存");
        }

        Ok(ImportResponse {
            summary,
            saved_ids,
            save_failures,
        })
    }

    fn map_request(
        &self,
        school_data: &Value,
        special_subsidies: Option<&Value>,
    ) -> ApiResult<SchoolSubmission> {
        let mut submission = self.mapper.map_json(school_data)?;
        if let Some(subsidies) = special_subsidies {
            submission.subsidies = self.mapper.map_subsidies_json(subsidies)?;
        }
        Ok(submission)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 历史记录（可按年份筛选）
    pub fn list_history(&self, year: Option<i32>) -> ApiResult<Vec<SchoolRecord>> {
        Ok(self.repo.find_history(year)?)
    }

    /// 某校历史填报
    pub fn school_history(&self, school_name: &str, limit: usize) -> ApiResult<Vec<SchoolRecord>> {
        if school_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("学校名称不能为空".to_string()));
        }
        Ok(self.repo.find_by_school(school_name.trim(), limit)?)
    }

    /// 每校每年最新记录
    pub fn list_latest(
        &self,
        year: Option<i32>,
        school_name: Option<&str>,
    ) -> ApiResult<Vec<SchoolRecord>> {
        Ok(self.repo.find_latest(year, school_name)?)
    }

    pub fn list_all(
        &self,
        year: Option<i32>,
        school_name: Option<&str>,
    ) -> ApiResult<Vec<SchoolRecord>> {
        Ok(self.repo.find_all(year, school_name)?)
    }

    pub fn list_years(&self) -> ApiResult<Vec<i32>> {
        Ok(self.repo.find_available_years()?)
    }

    pub fn get_record(&self, id: i64) -> ApiResult<SchoolRecord> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("记录不存在: id={}", id)))
    }

    pub fn get_statistics(&self, year: Option<i32>) -> ApiResult<SchoolStatistics> {
        Ok(self.repo.statistics(year)?)
    }

    // ==========================================
    // 删除
    // ==========================================

    pub fn delete_record(&self, id: i64) -> ApiResult<()> {
        Ok(self.repo.delete(id)?)
    }

    /// 清空全部数据，返回删除的记录数
    pub fn clear_all(&self) -> ApiResult<usize> {
        Ok(self.repo.clear_all()?)
    }
}

/// 解析年份筛选参数: 空或 "all" 表示不筛选
pub fn parse_year_filter(value: &str) -> ApiResult<Option<i32>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    value
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::InvalidInput(format!("年份格式错误: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_filter() {
        assert_eq!(parse_year_filter("all").unwrap(), None);
        assert_eq!(parse_year_filter("").unwrap(), None);
        assert_eq!(parse_year_filter(" 2024 ").unwrap(), Some(2024));
        assert!(matches!(
            parse_year_filter("二〇二四"),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
