// ==========================================
// 高校建筑面积缺口测算系统 - 报表文件写出
// ==========================================
// 格式: UTF-8 + BOM 的 CSV（Excel 可直接打开）
// 命名: <学校名称>_建筑规模测算结果_<时间戳>.csv
//       高校建筑面积缺口批量导出_[<年份>年_][<类型>_]<时间戳>_<工作表>.csv
// ==========================================

use crate::report::batch_export::{BatchExport, BatchFilter};
use crate::report::calc_sheet::CalculationSheet;
use crate::report::error::ReportResult;
use crate::report::Sheet;
use csv::WriterBuilder;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 学校名称为空时的文件名前缀
const FALLBACK_FILE_PREFIX: &str = "在线计算";

#[derive(Debug, Clone)]
pub struct ReportWriter {
    export_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// 写出单校测算结果，返回生成的文件（主表在前）
    pub fn write_calculation(
        &self,
        school_name: &str,
        sheet: &CalculationSheet,
        timestamp_ms: i64,
    ) -> ReportResult<Vec<PathBuf>> {
        let base = calculation_file_stem(school_name, timestamp_ms);
        let mut files = vec![self.write_sheet(&format!("{}.csv", base), &sheet.main)?];
        if let Some(subsidies) = &sheet.subsidies {
            files.push(self.write_sheet(&format!("{}_{}.csv", base, subsidies.name), subsidies)?);
        }

        info!(school = %school_name, files = files.len(), "测算结果已导出");
        Ok(files)
    }

    /// 写出批量导出的三张表
    pub fn write_batch(
        &self,
        export: &BatchExport,
        filter: &BatchFilter,
        timestamp_ms: i64,
    ) -> ReportResult<Vec<PathBuf>> {
        let stem = batch_file_stem(filter, timestamp_ms);
        let files = export
            .sheets()
            .iter()
            .map(|sheet| self.write_sheet(&format!("{}_{}.csv", stem, sheet.name), sheet))
            .collect::<ReportResult<Vec<_>>>()?;

        info!(files = files.len(), "批量导出完成");
        Ok(files)
    }

    /// 写出单张表
    pub fn write_sheet(&self, file_name: &str, sheet: &Sheet) -> ReportResult<PathBuf> {
        fs::create_dir_all(&self.export_dir)?;
        let path = self.export_dir.join(file_name);

        let mut file = File::create(&path)?;
        file.write_all(UTF8_BOM)?;

        let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
        for row in &sheet.rows {
            if row.is_empty() {
                // 空行需写出一个空字段，否则 csv 会拒绝零长度记录
                writer.write_record([""])?;
            } else {
                writer.write_record(row)?;
            }
        }
        writer.flush()?;

        Ok(path)
    }
}

/// 文件名中不允许的字符替换为下划线
pub fn sanitize_file_component(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

pub fn calculation_file_stem(school_name: &str, timestamp_ms: i64) -> String {
    let name = sanitize_file_component(school_name);
    let name = if name.is_empty() {
        FALLBACK_FILE_PREFIX.to_string()
    } else {
        name
    };
    format!("{}_建筑规模测算结果_{}", name, timestamp_ms)
}

pub fn batch_file_stem(filter: &BatchFilter, timestamp_ms: i64) -> String {
    match filter.file_suffix() {
        Some(suffix) => format!(
            "高校建筑面积缺口批量导出_{}_{}",
            sanitize_file_component(&suffix),
            timestamp_ms
        ),
        None => format!("高校建筑面积缺口批量导出_{}", timestamp_ms),
    }
}
