// ==========================================
// 高校建筑面积缺口测算系统 - 报表导出 API
// ==========================================
// 职责: 单校测算结果导出、历史记录导出、批量导出
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::record::{SchoolRecord, SchoolSubmission};
use crate::domain::report::GapReport;
use crate::engine::GapCalculator;
use crate::report::{BatchExport, BatchFilter, CalculationSheet, ReportError, ReportWriter};
use crate::repository::SchoolRecordRepository;

/// 导出响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    /// 生成的文件（主表在前）
    pub files: Vec<PathBuf>,
    pub record_count: usize,
}

// ==========================================
// ReportApi - 报表导出 API
// ==========================================
pub struct ReportApi {
    repo: Arc<SchoolRecordRepository>,
    config: Arc<ConfigManager>,
    calculator: GapCalculator,
}

impl ReportApi {
    pub fn new(repo: Arc<SchoolRecordRepository>, config: Arc<ConfigManager>) -> Self {
        Self {
            repo,
            config,
            calculator: GapCalculator::new(),
        }
    }

    fn writer(&self) -> ApiResult<ReportWriter> {
        Ok(ReportWriter::new(self.config.get_export_dir()?))
    }

    /// 导出在线测算结果
    pub fn export_calculation(
        &self,
        submission: &SchoolSubmission,
        report: &GapReport,
    ) -> ApiResult<ExportResponse> {
        let title = self.config.get_report_title()?;
        let sheet = CalculationSheet::build(
            &submission.input,
            report,
            submission.resolved_year(),
            &title,
        );

        let files = self.writer()?.write_calculation(
            &report.school_name,
            &sheet,
            Local::now().timestamp_millis(),
        )?;

        Ok(ExportResponse {
            files,
            record_count: 1,
        })
    }

    /// 导出已保存的记录
    ///
    /// 优先使用保存时的测算结果；缺失或无法解析时按保存的输入重新测算。
    pub fn export_record(&self, id: i64) -> ApiResult<ExportResponse> {
        let record = self
            .repo
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("记录不存在: id={}", id)))?;

        let report = self.stored_report(&record)?;
        let submission = SchoolSubmission {
            input: record.to_input(),
            subsidies: record.special_subsidies.clone(),
            remarks: record.remarks.clone(),
        };

        info!(id, school = %record.school_name, "导出历史记录");
        self.export_calculation(&submission, &report)
    }

    /// 批量导出（每校每年最新记录）
    ///
    /// # 参数
    /// - year: 年份筛选
    /// - school_type: 学校类型筛选（"all" 表示全部）
    pub fn export_batch(
        &self,
        year: Option<i32>,
        school_type: Option<&str>,
    ) -> ApiResult<ExportResponse> {
        let filter = BatchFilter::new(year, school_type);

        let records: Vec<SchoolRecord> = self
            .repo
            .find_latest(filter.year, None)?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();

        if records.is_empty() {
            return Err(ReportError::NoData.into());
        }

        let now = Local::now();
        let export = BatchExport::build(&records, &filter, now.naive_local());
        let files = self
            .writer()?
            .write_batch(&export, &filter, now.timestamp_millis())?;

        info!(records = records.len(), "批量导出成功");
        Ok(ExportResponse {
            files,
            record_count: records.len(),
        })
    }

    fn stored_report(&self, record: &SchoolRecord) -> ApiResult<GapReport> {
        if let Some(json) = record.calculation_results.as_deref() {
            match serde_json::from_str::<GapReport>(json) {
                Ok(report) => return Ok(report),
                Err(e) => warn!(id = record.id, error = %e, "保存的测算结果无法解析，重新测算"),
            }
        }
        Ok(self
            .calculator
            .calculate(&record.to_input(), &record.special_subsidies)?)
    }
}
