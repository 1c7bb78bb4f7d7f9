// ==========================================
// 高校建筑面积缺口测算系统 - 学校数据批量导入
// ==========================================
// 流程: 文件解析 → 字段映射 → 缺口测算
// 约定: 单行失败只记录原因，不中断整批
// ==========================================

use crate::domain::record::SchoolSubmission;
use crate::domain::report::GapReport;
use crate::engine::GapCalculator;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// 单行导入成功
#[derive(Debug, Clone, Serialize)]
pub struct ImportedSchool {
    pub row_number: usize,
    pub submission: SchoolSubmission,
    pub report: GapReport,
}

/// 单行导入失败
#[derive(Debug, Clone, Serialize)]
pub struct ImportFailure {
    pub row_number: usize,
    pub reason: String,
}

/// 导入汇总
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub success: Vec<ImportedSchool>,
    pub failures: Vec<ImportFailure>,
}

impl ImportSummary {
    pub fn success_count(&self) -> usize {
        self.success.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

// ==========================================
// SchoolImporter
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SchoolImporter {
    mapper: FieldMapper,
    calculator: GapCalculator,
}

impl SchoolImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 导入填报文件（.xlsx/.xls/.csv）
    ///
    /// 文件级错误（不存在、格式不支持、无法解析）直接返回；
    /// 行级错误记入 `failures`。
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportSummary> {
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入学校数据");

        let rows = UniversalFileParser.parse(path)?;
        let mut summary = ImportSummary {
            total_rows: rows.len(),
            ..Default::default()
        };

        for (idx, row) in rows.iter().enumerate() {
            // 表头占第 1 行
            let row_number = idx + 2;

            let submission = match self.mapper.map_row(row, row_number) {
                Ok(s) => s,
                Err(e) => {
                    warn!(row_number, error = %e, "字段映射失败");
                    summary.failures.push(ImportFailure {
                        row_number,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self
                .calculator
                .calculate(&submission.input, &submission.subsidies)
            {
                Ok(report) => summary.success.push(ImportedSchool {
                    row_number,
                    submission,
                    report,
                }),
                Err(e) => {
                    warn!(row_number, school = %submission.input.school_name, error = %e, "测算失败");
                    summary.failures.push(ImportFailure {
                        row_number,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            total_rows = summary.total_rows,
            success = summary.success_count(),
            failed = summary.failure_count(),
            "学校数据导入完成"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::error::ImportError;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_import_reports_per_row_outcomes() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "学校名称,学生总人数,现有教学及辅助用房面积,特殊补助明细").unwrap();
        writeln!(file, "上海大学,1000,12950,无特殊补助").unwrap();
        writeln!(file, ",500,100,").unwrap();
        writeln!(file, "上海音乐学院,100,0,实验室补助:abc").unwrap();
        writeln!(file, "上海体育大学,200,0,场馆补助:50m²").unwrap();

        let summary = SchoolImporter::new().import_file(file.path()).unwrap();

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.success_count(), 2);
        assert_eq!(summary.failure_count(), 2);

        assert_eq!(summary.success[0].row_number, 2);
        assert_eq!(summary.success[0].report.per_category.teaching.gap, 0);
        assert_eq!(summary.success[1].row_number, 5);
        assert_eq!(summary.success[1].report.totals.special_subsidy_total, 50);

        assert_eq!(summary.failures[0].row_number, 3);
        assert_eq!(summary.failures[1].row_number, 4);
    }

    #[test]
    fn test_import_missing_file() {
        let result = SchoolImporter::new().import_file("/nonexistent/schools.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
